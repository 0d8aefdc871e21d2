//! Consent record handlers.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::guard::require_self_or_admin;
use crate::handlers::{read_json_body, record_audit, user_agent};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use helix_core::domain::{ConsentStatus, PermittedUses};
use helix_metadata::models::ConsentRow;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Withdrawn data is purged after this grace period.
const DELETION_GRACE_PERIOD: Duration = Duration::days(7);

#[derive(Debug, Serialize)]
pub struct ConsentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub consent_version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub signed_at: OffsetDateTime,
    pub data_retention_period: String,
    pub permitted_uses: PermittedUses,
    pub withdrawal_status: ConsentStatus,
    pub irb_reference: Option<String>,
}

impl ConsentResponse {
    fn from_row(row: &ConsentRow) -> ApiResult<Self> {
        let permitted_uses: PermittedUses = serde_json::from_str(&row.permitted_uses)
            .map_err(|e| ApiError::Internal(format!("malformed permitted_uses: {e}")))?;
        Ok(Self {
            id: row.consent_id,
            user_id: row.user_id,
            consent_version: row.consent_version.clone(),
            signed_at: row.signed_at,
            data_retention_period: row.data_retention_period.clone(),
            permitted_uses,
            withdrawal_status: ConsentStatus::parse(&row.withdrawal_status)?,
            irb_reference: row.irb_reference.clone(),
        })
    }
}

/// GET /api/v1/consent/{user_id}
///
/// A user may read their own consent records; admins may read anyone's.
pub async fn get_user_consents(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    req: Request,
) -> ApiResult<Json<Vec<ConsentResponse>>> {
    let auth = require_auth(&req)?;
    require_self_or_admin(auth, user_id)?;

    let consents = state.metadata.list_consents_for_user(user_id).await?;
    let consents = consents
        .iter()
        .map(ConsentResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(consents))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub consent_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub consent_id: Uuid,
    pub withdrawal_status: ConsentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub deletion_scheduled_for: OffsetDateTime,
}

/// POST /api/v1/consent/withdraw
///
/// Withdrawal is one-way and idempotent: withdrawing an already-withdrawn
/// record leaves it withdrawn. Results for samples under the record stop
/// being served immediately.
pub async fn withdraw_consent(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<WithdrawResponse>> {
    let auth = require_auth(&req)?.clone();
    let agent = user_agent(&req);
    let body: WithdrawRequest = read_json_body(req).await?;

    let consent = state
        .metadata
        .get_consent(body.consent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Consent not found".to_string()))?;
    require_self_or_admin(&auth, consent.user_id)?;

    state
        .metadata
        .set_withdrawal_status(consent.consent_id, ConsentStatus::Withdrawn.as_str())
        .await?;

    record_audit(
        &state,
        auth.user_id(),
        "withdrew_consent",
        Some(consent.consent_id.to_string()),
        agent,
        Some(json!({ "reason": body.reason })),
    )
    .await?;

    tracing::info!(consent_id = %consent.consent_id, "consent withdrawn");

    Ok(Json(WithdrawResponse {
        consent_id: consent.consent_id,
        withdrawal_status: ConsentStatus::Withdrawn,
        deletion_scheduled_for: OffsetDateTime::now_utc() + DELETION_GRACE_PERIOD,
    }))
}
