//! HTTP request handlers.

pub mod audit;
pub mod auth;
pub mod common;
pub mod consent;
pub mod export;
pub mod health;
pub mod institutions;
pub mod samples;

pub use common::{read_json_body, record_audit, user_agent};
