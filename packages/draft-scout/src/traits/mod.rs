//! Core trait abstractions for the scouting library.
//!
//! These traits define the seams applications plug into: how bytes are
//! fetched, and where pages and finished records are kept.

pub mod store;
pub mod transport;
