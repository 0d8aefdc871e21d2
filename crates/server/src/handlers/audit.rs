//! Audit trail handlers.

use crate::auth::require_auth;
use crate::error::ApiResult;
use crate::guard::require_admin;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, Request, State};
use helix_metadata::repos::AuditFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

const MAX_PAGE_SIZE: u32 = 500;

fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Deserialize)]
pub struct ListAuditParams {
    /// Restrict to entries touching one sample.
    pub sample_id: Option<Uuid>,
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Resolved at read time; `None` if the user row has since vanished.
    pub user_email: Option<String>,
    pub action: String,
    pub resource_accessed: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub logs: Vec<AuditLogResponse>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// GET /api/v1/audit-logs
///
/// Admin-only. Scoped to entries recorded by users of the caller's
/// institution, newest first.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<ListAuditParams>,
    req: Request,
) -> ApiResult<Json<AuditListResponse>> {
    let auth = require_auth(&req)?;
    require_admin(auth)?;

    let limit = params.limit.clamp(1, MAX_PAGE_SIZE);
    let filter = AuditFilter {
        resource: params.sample_id.map(|id| id.to_string()),
        limit,
        offset: params.offset,
    };
    let page = state
        .metadata
        .list_audit_logs(auth.institution_id(), &filter)
        .await?;

    // Resolve acting users' emails once per distinct user.
    let mut emails: HashMap<Uuid, Option<String>> = HashMap::new();
    let mut logs = Vec::with_capacity(page.logs.len());
    for entry in &page.logs {
        let email = match emails.get(&entry.user_id) {
            Some(cached) => cached.clone(),
            None => {
                let email = state
                    .metadata
                    .get_user(entry.user_id)
                    .await?
                    .map(|u| u.email);
                emails.insert(entry.user_id, email.clone());
                email
            }
        };
        logs.push(AuditLogResponse {
            id: entry.log_id,
            user_id: entry.user_id,
            user_email: email,
            action: entry.action.clone(),
            resource_accessed: entry.resource_accessed.clone(),
            timestamp: entry.timestamp,
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            details: entry
                .details
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
        });
    }

    Ok(Json(AuditListResponse {
        logs,
        total: page.total,
        limit,
        offset: params.offset,
    }))
}
