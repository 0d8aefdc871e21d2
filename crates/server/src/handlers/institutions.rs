//! Partner institution handlers.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use helix_metadata::models::InstitutionRow;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct InstitutionResponse {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub irb_approval_number: Option<String>,
    pub contact_person: Option<String>,
    pub data_retention_months: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<InstitutionRow> for InstitutionResponse {
    fn from(row: InstitutionRow) -> Self {
        Self {
            id: row.institution_id,
            name: row.name,
            country: row.country,
            irb_approval_number: row.irb_approval_number,
            contact_person: row.contact_person,
            data_retention_months: row.data_retention_months,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/institutions
///
/// Public directory data; no credential required. Contact emails are not
/// exposed here.
pub async fn list_institutions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<InstitutionResponse>>> {
    let institutions = state.metadata.list_institutions().await?;
    Ok(Json(
        institutions
            .into_iter()
            .map(InstitutionResponse::from)
            .collect(),
    ))
}
