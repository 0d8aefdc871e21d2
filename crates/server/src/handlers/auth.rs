//! Login and logout handlers.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::handlers::read_json_body;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use helix_core::domain::UserRole;
use helix_core::password::verify_password;
use helix_metadata::models::UserRow;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Required when the account has MFA enabled. Any present code is
    /// accepted in this demonstration deployment.
    pub mfa_code: Option<String>,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub institution_id: Uuid,
    pub mfa_enabled: bool,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

impl UserResponse {
    pub fn from_row(user: &UserRow) -> ApiResult<Self> {
        Ok(Self {
            id: user.user_id,
            email: user.email.clone(),
            role: UserRole::parse(&user.role)?,
            institution_id: user.institution_id,
            mfa_enabled: user.mfa_enabled,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login: user.last_login,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<LoginResponse>> {
    let body: LoginRequest = read_json_body(req).await?;

    // The same message covers an unknown email and a wrong password.
    let mut user = state
        .metadata
        .get_user_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("User account is inactive".to_string()));
    }

    if user.mfa_enabled && body.mfa_code.is_none() {
        return Err(ApiError::Forbidden("MFA code required".to_string()));
    }

    let now = OffsetDateTime::now_utc();
    state.metadata.set_last_login(user.user_id, now).await?;
    user.last_login = Some(now);

    let role = UserRole::parse(&user.role)?;
    let access_token = state.tokens.issue_access(user.user_id, &user.email, role)?;
    let refresh_token = state.tokens.issue_refresh(user.user_id)?;

    tracing::info!(user_id = %user.user_id, "login succeeded");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.access_ttl_secs(),
        refresh_token,
        user: UserResponse::from_row(&user)?,
    }))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless, so logout is a client-side discard; the endpoint
/// exists so clients have a uniform call to make.
pub async fn logout(req: Request) -> ApiResult<Json<serde_json::Value>> {
    let _auth = require_auth(&req)?;
    Ok(Json(json!({ "message": "Logged out successfully" })))
}
