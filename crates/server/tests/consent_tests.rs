//! Consent access and withdrawal.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestServer, json_request};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

#[tokio::test]
async fn test_read_own_consents() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let david = server.user_by_email("david.kipchoge@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/consent/{}", david.user_id),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let consents = body.as_array().unwrap();
    assert_eq!(consents.len(), 1);
    assert_eq!(consents[0]["consent_version"], "2.1");
    assert_eq!(consents[0]["withdrawal_status"], "active");
    assert_eq!(consents[0]["data_retention_period"], "60 months");
    assert_eq!(consents[0]["permitted_uses"]["research"], true);
    assert_eq!(consents[0]["permitted_uses"]["third_party_sharing"], false);
}

#[tokio::test]
async fn test_read_other_users_consents_denied() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let jane = server.user_by_email("jane.kimani@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/consent/{}", jane.user_id),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_admin_reads_other_users_consents() {
    let server = TestServer::spawn().await;
    let token = server.login("jane.kimani@knh.org").await;
    let david = server.user_by_email("david.kipchoge@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/consent/{}", david.user_id),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_withdraw_consent() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    let before = OffsetDateTime::now_utc();
    let (status, body) = json_request(
        server.router.clone(),
        Method::POST,
        "/api/v1/consent/withdraw",
        Some(json!({ "consent_id": consent.consent_id, "reason": "leaving study" })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["withdrawal_status"], "withdrawn");
    let scheduled =
        OffsetDateTime::parse(body["deletion_scheduled_for"].as_str().unwrap(), &Rfc3339).unwrap();
    let days_out = (scheduled - before).whole_days();
    assert!((6..=7).contains(&days_out), "deletion in {days_out} days");

    // The record reads back withdrawn.
    let david = server.user_by_email("david.kipchoge@knh.org").await;
    let (_, body) = json_request(
        server.router.clone(),
        Method::GET,
        &format!("/api/v1/consent/{}", david.user_id),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(body[0]["withdrawal_status"], "withdrawn");
}

#[tokio::test]
async fn test_withdraw_unknown_consent() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::POST,
        "/api/v1/consent/withdraw",
        Some(json!({ "consent_id": Uuid::new_v4() })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Consent not found");
}

#[tokio::test]
async fn test_withdraw_other_users_consent_denied() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let janes_consent = server.consent_for("jane.kimani@knh.org").await;

    let (status, body) = json_request(
        server.router.clone(),
        Method::POST,
        "/api/v1/consent/withdraw",
        Some(json!({ "consent_id": janes_consent.consent_id })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn test_withdraw_is_idempotent() {
    let server = TestServer::spawn().await;
    let token = server.login("david.kipchoge@knh.org").await;
    let consent = server.consent_for("david.kipchoge@knh.org").await;

    for _ in 0..2 {
        let (status, body) = json_request(
            server.router.clone(),
            Method::POST,
            "/api/v1/consent/withdraw",
            Some(json!({ "consent_id": consent.consent_id })),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["withdrawal_status"], "withdrawn");
    }
}

#[tokio::test]
async fn test_withdrawal_blocks_results() {
    let server = TestServer::spawn().await;
    let token = server.login("thabo.mthembu@sun.ac.za").await;
    let consent = server.consent_for("thabo.mthembu@sun.ac.za").await;
    let sample = server.sample_by_code("ZAF-2024-00892").await;

    // The seeded sample already has materialized rows.
    let uri = format!("/api/v1/samples/{}/results", sample.sample_id);
    let (status, _) =
        json_request(server.router.clone(), Method::GET, &uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = json_request(
        server.router.clone(),
        Method::POST,
        "/api/v1/consent/withdraw",
        Some(json!({ "consent_id": consent.consent_id })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Stored rows stop being served the moment consent is withdrawn.
    let (status, body) =
        json_request(server.router.clone(), Method::GET, &uri, None, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Consent is withdrawn");
}
