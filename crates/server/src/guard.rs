//! Authorization guards shared across handlers.
//!
//! Every scoping rule lives here so the handlers apply them uniformly.
//! Cross-institution denials use the same message as ownership denials, so a
//! caller cannot probe which rule rejected them.

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use uuid::Uuid;

/// Require that the caller belongs to the given institution.
pub fn require_same_institution(auth: &AuthenticatedUser, institution_id: Uuid) -> ApiResult<()> {
    if auth.institution_id() != institution_id {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }
    Ok(())
}

/// Require that the caller is the given user, or an admin of their
/// institution acting on their behalf.
pub fn require_self_or_admin(auth: &AuthenticatedUser, user_id: Uuid) -> ApiResult<()> {
    if auth.user_id() != user_id && !auth.role.is_admin() {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }
    Ok(())
}

/// Require that the caller holds an admin role.
pub fn require_admin(auth: &AuthenticatedUser) -> ApiResult<()> {
    if !auth.role.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}
