//! Metadata store abstraction and the SQLite implementation for Helix.
//!
//! This crate provides the portal's data model:
//! - Partner institutions and lab users
//! - Informed-consent records and withdrawal state
//! - Sample metadata and lifecycle status
//! - Materialized ancestry results and health markers
//! - The append-only audit trail

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use store::{MetadataStore, SqliteStore};

use helix_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    let store = SqliteStore::new(&config.path).await?;
    Ok(Arc::new(store) as Arc<dyn MetadataStore>)
}
