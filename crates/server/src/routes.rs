//! Route definitions.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// The auth middleware runs on every route; it only rejects requests that
/// present an invalid credential. Routes that require a caller enforce it
/// themselves, so login, health, and the institution directory stay public.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/v1/institutions",
            get(handlers::institutions::list_institutions),
        )
        .route(
            "/api/v1/samples",
            get(handlers::samples::list_samples).post(handlers::samples::create_sample),
        )
        .route(
            "/api/v1/samples/{sample_id}/results",
            get(handlers::samples::get_sample_results),
        )
        .route(
            "/api/v1/consent/{user_id}",
            get(handlers::consent::get_user_consents),
        )
        .route(
            "/api/v1/consent/withdraw",
            post(handlers::consent::withdraw_consent),
        )
        .route("/api/v1/audit-logs", get(handlers::audit::list_audit_logs))
        .route(
            "/api/v1/data-export",
            post(handlers::export::request_data_export),
        )
        .route("/api/v1/health", get(handlers::health::health_check))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
