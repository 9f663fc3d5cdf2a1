//! Trello integration: a thin client over the REST API.

mod client;

pub use client::*;
