//! Ancestry result and health marker repository.

use crate::error::MetadataResult;
use crate::models::{AncestryResultRow, HealthMarkerRow};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for computed result rows.
///
/// Inserts are idempotent per sample: a row whose natural key already exists
/// is silently skipped, so concurrent first reads of the same sample converge
/// on one row set.
#[async_trait]
pub trait ResultRepo: Send + Sync {
    /// Insert ancestry rows, ignoring duplicates on (sample_id, population_group).
    async fn insert_ancestry_results(&self, results: &[AncestryResultRow]) -> MetadataResult<()>;

    /// List ancestry rows for a sample, highest percentage first.
    async fn list_ancestry_results(
        &self,
        sample_id: Uuid,
    ) -> MetadataResult<Vec<AncestryResultRow>>;

    /// Insert marker rows, ignoring duplicates on (sample_id, gene_name, variant_rsid).
    async fn insert_health_markers(&self, markers: &[HealthMarkerRow]) -> MetadataResult<()>;

    /// List marker rows for a sample, ordered by gene name.
    async fn list_health_markers(&self, sample_id: Uuid) -> MetadataResult<Vec<HealthMarkerRow>>;
}
