//! Bearer token authentication middleware.
//!
//! The middleware verifies the JWT, re-fetches the user row so that role and
//! active-status changes take effect immediately, and attaches an
//! [`AuthenticatedUser`] extension for handlers to consume via
//! [`require_auth`]. Requests without an `Authorization` header pass through
//! unauthenticated so that public routes (login, health) keep working.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use helix_core::domain::UserRole;
use helix_metadata::models::UserRow;
use uuid::Uuid;

/// The verified identity attached to a request.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// The user row as of this request. Re-fetched on every request, never
    /// trusted from token claims alone.
    pub user: UserRow,
    /// Parsed role of the user.
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.user.user_id
    }

    pub fn institution_id(&self) -> Uuid {
        self.user.institution_id
    }
}

/// Extract a bearer token from the Authorization header.
///
/// The `Bearer` scheme is matched case-insensitively per RFC 6750.
pub fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    if value.len() > 7 && value[..7].eq_ignore_ascii_case("bearer ") {
        Some(value[7..].trim())
    } else {
        None
    }
}

/// Authentication middleware.
///
/// A present-but-invalid credential is rejected here; an absent credential is
/// left for the handler to reject via [`require_auth`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_bearer_token(&req) {
        let claims = state
            .tokens
            .verify_access(token)
            .map_err(|e| match e {
                helix_core::Error::TokenExpired => {
                    ApiError::Unauthorized("Token has expired".to_string())
                }
                _ => ApiError::Unauthorized("Could not validate credentials".to_string()),
            })?;

        let user = state
            .metadata
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        if !user.is_active {
            return Err(ApiError::Forbidden("User account is inactive".to_string()));
        }

        let role = UserRole::parse(&user.role)?;
        req.extensions_mut().insert(AuthenticatedUser { user, role });
    }

    Ok(next.run(req).await)
}

/// Require an authenticated user on the request.
pub fn require_auth(req: &Request) -> ApiResult<&AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
}
