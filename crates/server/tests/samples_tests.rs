//! Sample listing, registration, and results materialization.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestServer, json_request};
use serde_json::{Value, json};
use uuid::Uuid;

async fn create_sample(
    server: &TestServer,
    token: &str,
    consent_id: Uuid,
    code: &str,
    hint: Option<&str>,
) -> (StatusCode, Value) {
    json_request(
        server.router.clone(),
        Method::POST,
        "/api/v1/samples",
        Some(json!({
            "sample_code": code,
            "participant_id": "P20259999",
            "consent_id": consent_id,
            "population_hint": hint,
        })),
        Some(token),
    )
    .await
}

#[tokio::test]
async fn test_list_samples_scoped_to_institution() {
    let server = TestServer::spawn().await;

    // Kenyatta has three seeded samples across two users.
    let token = server.login("jane.kimani@knh.org").await;
    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["samples"].as_array().unwrap().len(), 3);

    // Stellenbosch has one, and none of Kenyatta's leak over.
    let token = server.login("thabo.mthembu@sun.ac.za").await;
    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["samples"][0]["sample_code"], "ZAF-2024-00892");
}

#[tokio::test]
async fn test_list_samples_requires_auth() {
    let server = TestServer::spawn().await;
    let (status, _) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_samples_status_filter() {
    let server = TestServer::spawn().await;
    let token = server.login("jane.kimani@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples?status=results_available",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples?status=received",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, _) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples?status=lost",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_samples_pagination_clamps_limit() {
    let server = TestServer::spawn().await;
    let token = server.login("jane.kimani@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples?limit=10000&offset=1",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["samples"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_sample() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let (status, body) =
        create_sample(&server, &token, consent.consent_id, "KEN-2025-00001", None).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["sample_code"], "KEN-2025-00001");
    assert_eq!(body["status"], "received");
    assert!(body["processed_at"].is_null());

    let (_, body) = json_request(
        server.router.clone(),
        Method::GET,
        "/api/v1/samples",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_create_sample_rejects_foreign_consent() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let janes_consent = server.consent_for("jane.kimani@knh.org").await;

    // Someone else's consent id looks exactly like a missing one.
    let (status, body) =
        create_sample(&server, &token, janes_consent.consent_id, "KEN-2025-00002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Consent record not found");
}

#[tokio::test]
async fn test_create_sample_rejects_unknown_consent() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;

    let (status, body) =
        create_sample(&server, &token, Uuid::new_v4(), "KEN-2025-00003", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Consent record not found");
}

#[tokio::test]
async fn test_create_sample_rejects_withdrawn_consent() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let (status, _) = json_request(
        server.router.clone(),
        Method::POST,
        "/api/v1/consent/withdraw",
        Some(json!({ "consent_id": consent.consent_id })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        create_sample(&server, &token, consent.consent_id, "KEN-2025-00004", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Consent is not active");
}

#[tokio::test]
async fn test_create_sample_rejects_blank_code() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let (status, _) = create_sample(&server, &token, consent.consent_id, "   ", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_results_first_read_materializes() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let (_, created) = create_sample(
        &server,
        &token,
        consent.consent_id,
        "KEN-2025-00010",
        Some("Maasai"),
    )
    .await;
    let sample_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/samples/{sample_id}/results"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["sample_status"], "results_available");
    assert!(body["results_computed_at"].is_string());
    assert!(
        body["disclaimer"]
            .as_str()
            .unwrap()
            .contains("research use only")
    );

    let populations = body["ancestry"]["primary_populations"].as_array().unwrap();
    assert_eq!(populations.len(), 3);
    assert_eq!(populations[0]["population_group"], "Nilotic");
    assert_eq!(populations[0]["percentage"], 78.0);
    assert_eq!(populations[0]["confidence_interval"]["lower"], 71.0);
    assert_eq!(populations[0]["confidence_interval"]["unit"], "percentage");
    assert_eq!(populations[0]["reference_dataset"], "1KG-African-2023");

    let markers = body["health_markers"].as_array().unwrap();
    assert_eq!(markers.len(), 4);
    let hbb = markers.iter().find(|m| m["gene"] == "HBB").unwrap();
    assert_eq!(hbb["phenotype"], "Normal");
    assert_eq!(hbb["variant"], "rs334");

    // Lifecycle advanced and processed_at stamped.
    let row = server.sample_by_code("KEN-2025-00010").await;
    assert_eq!(row.status, "results_available");
    assert!(row.processed_at.is_some());
}

#[tokio::test]
async fn test_results_are_stable_across_reads() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let (_, created) = create_sample(
        &server,
        &token,
        consent.consent_id,
        "KEN-2025-00011",
        Some("Yoruba"),
    )
    .await;
    let uri = format!("/api/v1/samples/{}/results", created["id"].as_str().unwrap());

    let (_, first) = json_request(server.router.clone(), Method::GET, &uri, None, Some(&token)).await;
    let (_, second) =
        json_request(server.router.clone(), Method::GET, &uri, None, Some(&token)).await;

    assert_eq!(first["ancestry"], second["ancestry"]);
    assert_eq!(first["health_markers"], second["health_markers"]);
    assert_eq!(first["results_computed_at"], second["results_computed_at"]);
}

#[tokio::test]
async fn test_results_unknown_hint_uses_default_profile() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let (_, created) =
        create_sample(&server, &token, consent.consent_id, "KEN-2025-00012", None).await;
    let uri = format!("/api/v1/samples/{}/results", created["id"].as_str().unwrap());

    let (status, body) =
        json_request(server.router.clone(), Method::GET, &uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let populations = body["ancestry"]["primary_populations"].as_array().unwrap();
    assert_eq!(populations[0]["population_group"], "Bantu");
    assert_eq!(populations[0]["percentage"], 85.0);
    assert_eq!(body["health_markers"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_results_of_seeded_sample() {
    let server = TestServer::spawn().await;
    let token = server.login("jane.kimani@knh.org").await;
    let sample = server.sample_by_code("KEN-2024-00523").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/samples/{}/results", sample.sample_id),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let populations = body["ancestry"]["primary_populations"].as_array().unwrap();
    assert_eq!(populations[0]["population_group"], "Bantu");
    assert_eq!(populations[0]["percentage"], 92.0);
    assert_eq!(
        body["ancestry"]["methodology"],
        "PCA-based ancestry inference with admixture modeling (STRUCTURE-like)"
    );
}

#[tokio::test]
async fn test_results_cross_institution_denied() {
    let server = TestServer::spawn().await;
    let sample = server.sample_by_code("KEN-2024-00523").await;

    let token = server.login("thabo.mthembu@sun.ac.za").await;
    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/samples/{}/results", sample.sample_id),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_results_unknown_sample() {
    let server = TestServer::spawn().await;
    let token = server.login("jane.kimani@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/samples/{}/results", Uuid::new_v4()),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Sample not found");
}
