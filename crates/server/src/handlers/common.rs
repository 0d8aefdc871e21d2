//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::Request;
use axum::http::header::USER_AGENT;
use helix_metadata::models::AuditLogRow;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use uuid::Uuid;

/// Maximum request body size (256 KiB). All request bodies here are small
/// JSON documents.
const MAX_BODY_SIZE: usize = 256 * 1024;

/// Read and deserialize a JSON request body.
pub async fn read_json_body<T: DeserializeOwned>(req: Request) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| ApiError::Validation(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Validation(format!("invalid JSON: {e}")))
}

/// The request's User-Agent header, for the audit trail.
pub fn user_agent(req: &Request) -> Option<String> {
    req.headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Append an entry to the audit trail.
///
/// Audit writes are part of the operation: if the append fails, the request
/// fails, so no data access goes unrecorded.
pub async fn record_audit(
    state: &AppState,
    user_id: Uuid,
    action: &str,
    resource: Option<String>,
    user_agent: Option<String>,
    details: Option<serde_json::Value>,
) -> ApiResult<()> {
    let entry = AuditLogRow {
        log_id: Uuid::new_v4(),
        user_id,
        action: action.to_string(),
        resource_accessed: resource,
        timestamp: OffsetDateTime::now_utc(),
        ip_address: None,
        user_agent,
        details: details.map(|d| d.to_string()),
    };
    state.metadata.append_audit(&entry).await?;
    Ok(())
}
