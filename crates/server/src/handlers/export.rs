//! Data export request handlers.
//!
//! Exports are not produced inline: a request is validated, audited, and
//! acknowledged for offline review. No export pipeline exists behind this
//! endpoint.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{read_json_body, record_audit, user_agent};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Minimum length of the free-text justification.
const MIN_JUSTIFICATION_LEN: usize = 50;

/// Review turnaround quoted to the requester.
const REVIEW_PERIOD: Duration = Duration::days(3);

fn default_export_format() -> String {
    "JSON".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub sample_ids: Vec<Uuid>,
    #[serde(default = "default_export_format")]
    pub export_format: String,
    /// Why the export is needed. Reviewed by a human before release.
    pub justification: String,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub export_id: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub requested_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub estimated_completion: OffsetDateTime,
    pub notification_email: String,
}

/// POST /api/v1/data-export
///
/// Validates that every named sample exists inside the caller's institution,
/// records the request in the audit trail, and acknowledges with 202. A
/// sample outside the institution is reported as missing.
pub async fn request_data_export(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<ExportResponse>)> {
    let auth = require_auth(&req)?.clone();
    let agent = user_agent(&req);
    let body: ExportRequest = read_json_body(req).await?;

    if body.sample_ids.is_empty() {
        return Err(ApiError::Validation(
            "sample_ids must not be empty".to_string(),
        ));
    }
    if body.justification.len() < MIN_JUSTIFICATION_LEN {
        return Err(ApiError::Validation(format!(
            "justification must be at least {MIN_JUSTIFICATION_LEN} characters"
        )));
    }

    for sample_id in &body.sample_ids {
        let sample = state
            .metadata
            .get_sample(*sample_id)
            .await?
            .filter(|s| s.institution_id == auth.institution_id());
        if sample.is_none() {
            return Err(ApiError::NotFound(format!("Sample {sample_id} not found")));
        }
    }

    let now = OffsetDateTime::now_utc();
    let export_id = format!("exp_{}", &Uuid::new_v4().simple().to_string()[..8]);

    record_audit(
        &state,
        auth.user_id(),
        "requested_data_export",
        Some(export_id.clone()),
        agent,
        Some(json!({
            "sample_ids": body.sample_ids,
            "export_format": body.export_format,
            "justification_length": body.justification.len(),
        })),
    )
    .await?;

    tracing::info!(export_id = %export_id, samples = body.sample_ids.len(), "export requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(ExportResponse {
            export_id,
            status: "Pending Review".to_string(),
            requested_at: now,
            estimated_completion: now + REVIEW_PERIOD,
            notification_email: auth.user.email.clone(),
        }),
    ))
}
