//! Core domain types for the Helix genomics research portal.
//!
//! This crate carries the vocabulary shared by the metadata store and the
//! HTTP server: roles, consent and sample states, token issuance, password
//! hashing, and configuration.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod password;

pub use error::{Error, Result};

/// Version string reported by the health endpoint.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
