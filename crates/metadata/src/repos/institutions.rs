//! Partner institution repository.

use crate::error::MetadataResult;
use crate::models::InstitutionRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for institution operations.
#[async_trait]
pub trait InstitutionRepo: Send + Sync {
    /// Create a new institution.
    async fn create_institution(&self, institution: &InstitutionRow) -> MetadataResult<()>;

    /// List all institutions, ordered by name.
    async fn list_institutions(&self) -> MetadataResult<Vec<InstitutionRow>>;

    /// Get an institution by ID.
    async fn get_institution(&self, institution_id: Uuid) -> MetadataResult<Option<InstitutionRow>>;

    /// Count institutions. Zero means the database has never been seeded.
    async fn count_institutions(&self) -> MetadataResult<u64>;
}
