//! Data types shared by the client, parser, pipeline and stores.

pub mod config;
pub mod page;
pub mod player;
pub mod position;
