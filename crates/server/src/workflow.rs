//! Sample result materialization.
//!
//! Results come from the static fixture tables, keyed by the sample's
//! population hint, and are written into the store on first read. Inserts
//! ignore duplicate natural keys, so two concurrent first reads of the same
//! sample converge on a single row set and both readers serve stored rows.

use crate::error::{ApiError, ApiResult};
use crate::fixtures;
use helix_core::domain::SampleStatus;
use helix_metadata::MetadataStore;
use helix_metadata::models::{AncestryResultRow, HealthMarkerRow, SampleRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Build ancestry rows for a sample from its population-hint profile.
pub fn build_ancestry_rows(sample: &SampleRow, computed_at: OffsetDateTime) -> Vec<AncestryResultRow> {
    fixtures::ancestry_profile(sample.population_hint.as_deref())
        .iter()
        .map(|c| AncestryResultRow {
            result_id: Uuid::new_v4(),
            sample_id: sample.sample_id,
            population_group: c.population_group.to_string(),
            percentage: c.percentage,
            confidence_interval_lower: c.ci_lower,
            confidence_interval_upper: c.ci_upper,
            reference_dataset: fixtures::REFERENCE_DATASET.to_string(),
            reference_sample_size: fixtures::REFERENCE_SAMPLE_SIZE,
            methodology_version: fixtures::METHODOLOGY_VERSION.to_string(),
            computed_at,
        })
        .collect()
}

/// Build health-marker rows for a sample from its population-hint profile.
pub fn build_marker_rows(sample: &SampleRow, computed_at: OffsetDateTime) -> Vec<HealthMarkerRow> {
    fixtures::health_markers(sample.population_hint.as_deref())
        .iter()
        .map(|m| HealthMarkerRow {
            marker_id: Uuid::new_v4(),
            sample_id: sample.sample_id,
            gene_name: m.gene_name.to_string(),
            variant_rsid: m.variant_rsid.to_string(),
            chromosome: m.chromosome.to_string(),
            position: m.position,
            genotype: m.genotype.to_string(),
            phenotype: m.phenotype.to_string(),
            clinical_significance: Some(m.clinical_significance.to_string()),
            population_frequency: Some(m.population_frequency.to_string()),
            disclaimer: fixtures::MARKER_DISCLAIMER.to_string(),
            computed_at,
        })
        .collect()
}

/// Ensure a sample's results exist, advancing its lifecycle as needed.
///
/// A `Received` sample moves to `Processing` before rows are written and to
/// `ResultsAvailable` (with `processed_at` stamped) once they are. A sample
/// that already has rows is returned as-is. The returned sample row reflects
/// the final state.
pub async fn materialize_results(
    metadata: &dyn MetadataStore,
    sample: &SampleRow,
) -> ApiResult<(SampleRow, Vec<AncestryResultRow>, Vec<HealthMarkerRow>)> {
    let status = SampleStatus::parse(&sample.status)?;

    if status == SampleStatus::Received {
        metadata
            .update_sample_status(sample.sample_id, SampleStatus::Processing.as_str(), None)
            .await?;
    }

    let mut ancestry = metadata.list_ancestry_results(sample.sample_id).await?;
    if ancestry.is_empty() {
        let computed_at = OffsetDateTime::now_utc();
        metadata
            .insert_ancestry_results(&build_ancestry_rows(sample, computed_at))
            .await?;
        // Re-read: a concurrent materialization may have won some inserts.
        ancestry = metadata.list_ancestry_results(sample.sample_id).await?;
    }

    let mut markers = metadata.list_health_markers(sample.sample_id).await?;
    if markers.is_empty() {
        let computed_at = OffsetDateTime::now_utc();
        metadata
            .insert_health_markers(&build_marker_rows(sample, computed_at))
            .await?;
        markers = metadata.list_health_markers(sample.sample_id).await?;
    }

    if status != SampleStatus::ResultsAvailable && status != SampleStatus::Archived {
        metadata
            .update_sample_status(
                sample.sample_id,
                SampleStatus::ResultsAvailable.as_str(),
                Some(OffsetDateTime::now_utc()),
            )
            .await?;
        tracing::info!(sample_id = %sample.sample_id, "materialized results");
    }

    let updated = metadata
        .get_sample(sample.sample_id)
        .await?
        .ok_or_else(|| ApiError::Internal("sample vanished during processing".to_string()))?;

    Ok((updated, ancestry, markers))
}
