//! In-process test server over a temporary SQLite database.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use helix_core::config::AppConfig;
use helix_metadata::models::{ConsentRow, SampleRow, UserRow};
use helix_metadata::repos::SampleFilter;
use helix_server::{AppState, create_router, seed};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

/// A fully seeded server routed in-process, no sockets involved.
pub struct TestServer {
    pub router: Router,
    pub state: AppState,
    pub _temp_dir: TempDir,
}

impl TestServer {
    /// Spawn a server over a fresh database seeded with the demo dataset.
    pub async fn spawn() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::for_testing();
        config.metadata.path = temp_dir.path().join("helix.db");

        let metadata = helix_metadata::from_config(&config.metadata)
            .await
            .unwrap();
        seed::seed_demo_data(metadata.as_ref()).await.unwrap();

        let state = AppState::new(config, metadata);
        let router = create_router(state.clone());
        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Log a seeded demo user in and return their access token.
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = json_request(
            self.router.clone(),
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": seed::DEMO_PASSWORD })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed for {email}: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn user_by_email(&self, email: &str) -> UserRow {
        self.state
            .metadata
            .get_user_by_email(email)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("no user {email}"))
    }

    /// The newest consent record of a seeded user.
    pub async fn consent_for(&self, email: &str) -> ConsentRow {
        let user = self.user_by_email(email).await;
        self.state
            .metadata
            .list_consents_for_user(user.user_id)
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no consent for {email}"))
    }

    /// Find a seeded sample by its lab code.
    pub async fn sample_by_code(&self, code: &str) -> SampleRow {
        let filter = SampleFilter {
            status: None,
            limit: 100,
            offset: 0,
        };
        for institution in self.state.metadata.list_institutions().await.unwrap() {
            let page = self
                .state
                .metadata
                .list_samples(institution.institution_id, &filter)
                .await
                .unwrap();
            if let Some(sample) = page.samples.into_iter().find(|s| s.sample_code == code) {
                return sample;
            }
        }
        panic!("sample {code} not found");
    }
}

/// Send a JSON request through the router and decode the JSON response.
pub async fn json_request(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
