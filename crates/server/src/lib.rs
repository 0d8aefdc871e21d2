//! Helix API server.
//!
//! REST backend for a genomics research data portal: bearer-token sessions,
//! institution- and consent-scoped access to sample metadata, materialized
//! demonstration results, and an append-only audit trail.

pub mod auth;
pub mod error;
pub mod fixtures;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod seed;
pub mod state;
pub mod workflow;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
