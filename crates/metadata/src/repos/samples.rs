//! Sample metadata repository.

use crate::error::MetadataResult;
use crate::models::SampleRow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Filter for institution-scoped sample listings.
#[derive(Debug, Clone, Default)]
pub struct SampleFilter {
    /// Restrict to one lifecycle status when set.
    pub status: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// One page of a sample listing plus the unpaged total.
#[derive(Debug, Clone)]
pub struct SamplePage {
    pub samples: Vec<SampleRow>,
    pub total: u64,
}

/// Repository for sample operations.
#[async_trait]
pub trait SampleRepo: Send + Sync {
    /// Create a new sample record.
    async fn create_sample(&self, sample: &SampleRow) -> MetadataResult<()>;

    /// Get a sample by ID.
    async fn get_sample(&self, sample_id: Uuid) -> MetadataResult<Option<SampleRow>>;

    /// List samples belonging to an institution.
    async fn list_samples(
        &self,
        institution_id: Uuid,
        filter: &SampleFilter,
    ) -> MetadataResult<SamplePage>;

    /// Update a sample's lifecycle status; stamps `processed_at` when given.
    async fn update_sample_status(
        &self,
        sample_id: Uuid,
        status: &str,
        processed_at: Option<OffsetDateTime>,
    ) -> MetadataResult<()>;
}
