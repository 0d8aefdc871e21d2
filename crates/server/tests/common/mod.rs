//! Shared integration test support.

pub mod server;

pub use server::{TestServer, json_request};
