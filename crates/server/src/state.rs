//! Shared application state.

use helix_core::auth::TokenIssuer;
use helix_core::config::AppConfig;
use helix_metadata::MetadataStore;
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store (institutions, users, consent, samples, results, audit).
    pub metadata: Arc<dyn MetadataStore>,
    /// Bearer token issuer and verifier.
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: AppConfig, metadata: Arc<dyn MetadataStore>) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.auth));
        Self {
            config: Arc::new(config),
            metadata,
            tokens,
        }
    }
}
