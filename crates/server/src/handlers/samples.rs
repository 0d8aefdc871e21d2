//! Sample listing, registration, and results handlers.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::fixtures;
use crate::guard::require_same_institution;
use crate::handlers::{read_json_body, record_audit, user_agent};
use crate::state::AppState;
use crate::workflow;
use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use helix_core::domain::{ConsentStatus, SampleStatus};
use helix_metadata::models::{AncestryResultRow, HealthMarkerRow, SampleRow};
use helix_metadata::repos::SampleFilter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

/// Hard cap on page size for sample listings.
const MAX_PAGE_SIZE: u32 = 100;

fn default_page_size() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ListSamplesParams {
    /// Restrict to one lifecycle status.
    pub status: Option<String>,
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub id: Uuid,
    pub sample_code: String,
    pub participant_id: Option<String>,
    pub user_id: Uuid,
    pub institution_id: Uuid,
    pub status: SampleStatus,
    pub population_hint: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub processed_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
}

impl SampleResponse {
    fn from_row(row: &SampleRow) -> ApiResult<Self> {
        Ok(Self {
            id: row.sample_id,
            sample_code: row.sample_code.clone(),
            participant_id: row.participant_id.clone(),
            user_id: row.user_id,
            institution_id: row.institution_id,
            status: SampleStatus::parse(&row.status)?,
            population_hint: row.population_hint.clone(),
            uploaded_at: row.uploaded_at,
            processed_at: row.processed_at,
            notes: row.notes.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SampleListResponse {
    pub samples: Vec<SampleResponse>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// GET /api/v1/samples
///
/// Lists the caller's institution's samples, newest upload first. Every
/// listing is recorded in the audit trail.
pub async fn list_samples(
    State(state): State<AppState>,
    Query(params): Query<ListSamplesParams>,
    req: Request,
) -> ApiResult<Json<SampleListResponse>> {
    let auth = require_auth(&req)?.clone();
    let agent = user_agent(&req);

    let status = match params.status.as_deref() {
        Some(s) => Some(
            SampleStatus::parse(s)
                .map_err(|_| ApiError::Validation(format!("unknown sample status: {s}")))?,
        ),
        None => None,
    };
    let limit = params.limit.clamp(1, MAX_PAGE_SIZE);

    let filter = SampleFilter {
        status: status.map(|s| s.as_str().to_string()),
        limit,
        offset: params.offset,
    };
    let page = state
        .metadata
        .list_samples(auth.institution_id(), &filter)
        .await?;

    record_audit(
        &state,
        auth.user_id(),
        "accessed_samples_list",
        None,
        agent,
        Some(json!({
            "status_filter": status.map(|s| s.as_str()),
            "returned": page.samples.len(),
        })),
    )
    .await?;

    let samples = page
        .samples
        .iter()
        .map(SampleResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(SampleListResponse {
        samples,
        total: page.total,
        limit,
        offset: params.offset,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateSampleRequest {
    /// Lab-assigned label, e.g. "KEN-2024-00523".
    pub sample_code: String,
    pub participant_id: Option<String>,
    /// Consent record covering this sample. Must belong to the caller and
    /// be active.
    pub consent_id: Uuid,
    /// Optional population label used when results are materialized.
    pub population_hint: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/v1/samples
///
/// Registers a sample under an active consent record owned by the caller. A
/// consent record that exists but belongs to someone else is reported as
/// missing, so consent ids cannot be probed across users.
pub async fn create_sample(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<SampleResponse>)> {
    let auth = require_auth(&req)?.clone();
    let agent = user_agent(&req);
    let body: CreateSampleRequest = read_json_body(req).await?;

    if body.sample_code.trim().is_empty() {
        return Err(ApiError::Validation(
            "sample_code must not be empty".to_string(),
        ));
    }

    let consent = state
        .metadata
        .get_consent(body.consent_id)
        .await?
        .filter(|c| c.user_id == auth.user_id())
        .ok_or_else(|| ApiError::NotFound("Consent record not found".to_string()))?;

    if !ConsentStatus::parse(&consent.withdrawal_status)?.is_active() {
        return Err(ApiError::InvalidState("Consent is not active".to_string()));
    }

    let sample = SampleRow {
        sample_id: Uuid::new_v4(),
        sample_code: body.sample_code,
        participant_id: body.participant_id,
        user_id: auth.user_id(),
        institution_id: auth.institution_id(),
        consent_id: consent.consent_id,
        status: SampleStatus::Received.as_str().to_string(),
        population_hint: body.population_hint,
        uploaded_at: OffsetDateTime::now_utc(),
        processed_at: None,
        notes: body.notes,
    };
    state.metadata.create_sample(&sample).await?;

    record_audit(
        &state,
        auth.user_id(),
        "uploaded_sample",
        Some(sample.sample_id.to_string()),
        agent,
        None,
    )
    .await?;

    tracing::info!(sample_id = %sample.sample_id, code = %sample.sample_code, "sample registered");

    Ok((StatusCode::CREATED, Json(SampleResponse::from_row(&sample)?)))
}

#[derive(Debug, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct PopulationComponent {
    pub population_group: String,
    pub percentage: f64,
    pub confidence_interval: ConfidenceInterval,
    pub sample_size_reference: i64,
    pub reference_dataset: String,
}

#[derive(Debug, Serialize)]
pub struct AncestryResponse {
    pub sample_id: Uuid,
    /// Highest percentage first.
    pub primary_populations: Vec<PopulationComponent>,
    pub methodology: String,
    pub limitations: String,
    pub confidence_note: String,
}

#[derive(Debug, Serialize)]
pub struct HealthMarkerResponse {
    pub gene: String,
    pub variant: String,
    pub phenotype: String,
    pub genotype: String,
    pub clinical_significance: Option<String>,
    pub population_frequency: Option<serde_json::Value>,
    pub disclaimer: String,
}

#[derive(Debug, Serialize)]
pub struct SampleResultsResponse {
    pub sample_id: Uuid,
    pub sample_status: SampleStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub results_computed_at: Option<OffsetDateTime>,
    pub disclaimer: String,
    pub ancestry: AncestryResponse,
    pub health_markers: Vec<HealthMarkerResponse>,
}

fn population_component(row: &AncestryResultRow) -> PopulationComponent {
    PopulationComponent {
        population_group: row.population_group.clone(),
        percentage: row.percentage,
        confidence_interval: ConfidenceInterval {
            lower: row.confidence_interval_lower,
            upper: row.confidence_interval_upper,
            unit: "percentage".to_string(),
        },
        sample_size_reference: row.reference_sample_size,
        reference_dataset: row.reference_dataset.clone(),
    }
}

fn health_marker(row: &HealthMarkerRow) -> HealthMarkerResponse {
    HealthMarkerResponse {
        gene: row.gene_name.clone(),
        variant: row.variant_rsid.clone(),
        phenotype: row.phenotype.clone(),
        genotype: row.genotype.clone(),
        clinical_significance: row.clinical_significance.clone(),
        population_frequency: row
            .population_frequency
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok()),
        disclaimer: row.disclaimer.clone(),
    }
}

/// GET /api/v1/samples/{sample_id}/results
///
/// First read materializes the sample's results and advances it to
/// `results_available`; later reads serve the stored rows unchanged. Consent
/// is checked before processing and again before the response is built, so a
/// withdrawal that lands mid-request still blocks disclosure.
pub async fn get_sample_results(
    State(state): State<AppState>,
    Path(sample_id): Path<Uuid>,
    req: Request,
) -> ApiResult<Json<SampleResultsResponse>> {
    let auth = require_auth(&req)?.clone();
    let agent = user_agent(&req);

    let sample = state
        .metadata
        .get_sample(sample_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sample not found".to_string()))?;
    require_same_institution(&auth, sample.institution_id)?;

    let consent = state
        .metadata
        .get_consent(sample.consent_id)
        .await?
        .ok_or_else(|| ApiError::Internal("consent record missing for sample".to_string()))?;
    if !ConsentStatus::parse(&consent.withdrawal_status)?.is_active() {
        return Err(ApiError::InvalidState("Consent is withdrawn".to_string()));
    }

    let (sample, ancestry, markers) = workflow::materialize_results(&*state.metadata, &sample).await?;

    // Re-check: consent may have been withdrawn while results materialized.
    let consent = state
        .metadata
        .get_consent(sample.consent_id)
        .await?
        .ok_or_else(|| ApiError::Internal("consent record missing for sample".to_string()))?;
    if !ConsentStatus::parse(&consent.withdrawal_status)?.is_active() {
        return Err(ApiError::InvalidState("Consent is withdrawn".to_string()));
    }

    record_audit(
        &state,
        auth.user_id(),
        "accessed_results",
        Some(sample.sample_id.to_string()),
        agent,
        None,
    )
    .await?;

    let results_computed_at = ancestry
        .first()
        .map(|r| r.computed_at)
        .or(sample.processed_at);

    Ok(Json(SampleResultsResponse {
        sample_id: sample.sample_id,
        sample_status: SampleStatus::parse(&sample.status)?,
        results_computed_at,
        disclaimer: fixtures::RESULTS_DISCLAIMER.to_string(),
        ancestry: AncestryResponse {
            sample_id: sample.sample_id,
            primary_populations: ancestry.iter().map(population_component).collect(),
            methodology: fixtures::METHODOLOGY.to_string(),
            limitations: fixtures::LIMITATIONS.to_string(),
            confidence_note: fixtures::CONFIDENCE_NOTE.to_string(),
        },
        health_markers: markers.iter().map(health_marker).collect(),
    }))
}
