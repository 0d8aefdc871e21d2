//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Partner institution record.
#[derive(Debug, Clone, FromRow)]
pub struct InstitutionRow {
    pub institution_id: Uuid,
    pub name: String,
    pub country: String,
    pub irb_approval_number: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub data_retention_months: i64,
    pub created_at: OffsetDateTime,
}

/// Lab user record.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    /// Argon2 hash in PHC string form. Never serialized into responses.
    pub password_hash: String,
    pub role: String,
    pub institution_id: Uuid,
    pub mfa_enabled: bool,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}

/// Informed-consent record.
#[derive(Debug, Clone, FromRow)]
pub struct ConsentRow {
    pub consent_id: Uuid,
    pub user_id: Uuid,
    pub consent_version: String,
    pub data_retention_period: String,
    /// JSON object of the four permitted-use booleans.
    pub permitted_uses: String,
    pub withdrawal_status: String,
    pub irb_reference: Option<String>,
    pub notes: Option<String>,
    pub signed_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// Sample metadata record. No genomic data is ever stored.
#[derive(Debug, Clone, FromRow)]
pub struct SampleRow {
    pub sample_id: Uuid,
    /// Lab-assigned label, e.g. "KEN-2024-00523".
    pub sample_code: String,
    pub participant_id: Option<String>,
    pub user_id: Uuid,
    pub institution_id: Uuid,
    pub consent_id: Uuid,
    pub status: String,
    /// Drives which ancestry/marker profile is materialized for the sample.
    pub population_hint: Option<String>,
    pub uploaded_at: OffsetDateTime,
    pub processed_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
}

/// Ancestry composition estimate for one population group of a sample.
///
/// Unique on (sample_id, population_group); concurrent materialization of the
/// same sample converges on a single row set.
#[derive(Debug, Clone, FromRow)]
pub struct AncestryResultRow {
    pub result_id: Uuid,
    pub sample_id: Uuid,
    pub population_group: String,
    pub percentage: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub reference_dataset: String,
    pub reference_sample_size: i64,
    pub methodology_version: String,
    pub computed_at: OffsetDateTime,
}

/// Health-relevant gene variant for a sample.
///
/// Unique on (sample_id, gene_name, variant_rsid).
#[derive(Debug, Clone, FromRow)]
pub struct HealthMarkerRow {
    pub marker_id: Uuid,
    pub sample_id: Uuid,
    pub gene_name: String,
    pub variant_rsid: String,
    pub chromosome: String,
    pub position: i64,
    pub genotype: String,
    pub phenotype: String,
    pub clinical_significance: Option<String>,
    /// JSON map of population -> allele frequency string.
    pub population_frequency: Option<String>,
    pub disclaimer: String,
    pub computed_at: OffsetDateTime,
}

/// Append-only audit trail entry.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogRow {
    pub log_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub resource_accessed: Option<String>,
    pub timestamp: OffsetDateTime,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// JSON payload of action-specific detail.
    pub details: Option<String>,
}
