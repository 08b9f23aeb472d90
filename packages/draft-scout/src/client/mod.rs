//! Client implementations.
//!
//! - `ReqwestTransport` - One raw GET over reqwest
//! - `RateLimitedClient` - Polite identity adding throttling, jitter and retries
//! - `RequestWindow` - Sliding window of recent request timestamps

pub mod http;
pub mod rate_limited;
pub mod window;

pub use http::ReqwestTransport;
pub use rate_limited::RateLimitedClient;
pub use window::RequestWindow;
