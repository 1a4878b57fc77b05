use axum::http::{StatusCode, header};
use latchkey_adapters::http::routes::{ErrorResponse, SessionResponse};
use serde_json::json;

use crate::helpers::{FRONTEND, TestApp, json_body, location};

#[tokio::test]
async fn verify_returns_session_for_fresh_link() {
    let app = TestApp::new();
    app.request_link("a@x.com").await;
    let token = app.last_link_token().await;

    let response = app
        .get(&format!("/api/v1/auth/verify?token={token}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let session: SessionResponse = json_body(response).await;
    assert_eq!(session.token.split('.').count(), 3);
    assert!(session.onboarding_required);
    assert!(app.tokens.is_empty());
}

#[tokio::test]
async fn link_cannot_be_used_twice() {
    let app = TestApp::new();
    app.request_link("a@x.com").await;
    let token = app.last_link_token().await;
    let uri = format!("/api/v1/auth/verify?token={token}");

    let first = app.get(&uri, None).await;
    let second = app.get(&uri, None).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = json_body(second).await;
    assert_eq!(body.error, "Invalid or expired token");
}

#[tokio::test]
async fn redeem_accepts_token_in_json_body() {
    let app = TestApp::new();
    app.request_link("a@x.com").await;
    let token = app.last_link_token().await;

    let response = app
        .post_json("/api/v1/auth/redeem", json!({ "token": token }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let session: SessionResponse = json_body(response).await;
    let subject = app
        .subjects
        .find_by_email(&latchkey_core::Email::parse("a@x.com").unwrap())
        .await
        .unwrap();
    assert_eq!(session.subject_id, subject.id);
}

#[tokio::test]
async fn garbage_token_is_rejected_without_consuming_live_tokens() {
    let app = TestApp::new();
    app.request_link("a@x.com").await;

    let response = app
        .get("/api/v1/auth/verify?token=garbage-token", None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.tokens.len(), 1);
}

#[tokio::test]
async fn missing_token_is_a_bad_request() {
    let app = TestApp::new();

    let get = app.get("/api/v1/auth/verify", None).await;
    let post = app.post_json("/api/v1/auth/redeem", json!({})).await;

    assert_eq!(get.status(), StatusCode::BAD_REQUEST);
    assert_eq!(post.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn redirect_mode_sends_new_subjects_to_onboarding() {
    let app = TestApp::with_frontend();
    app.request_link("a@x.com").await;
    let token = app.last_link_token().await;

    let response = app
        .get(&format!("/api/v1/auth/verify?token={token}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with(&format!("{FRONTEND}/welcome.html?token=")));
}

#[tokio::test]
async fn redirect_mode_sends_onboarded_subjects_to_dashboard() {
    let app = TestApp::with_frontend();
    let session = app.sign_in("a@x.com").await;
    app.put_json(
        "/api/v1/users/me",
        json!({ "first_name": "Ada", "last_name": "Lovelace" }),
        Some(&session),
    )
    .await;

    app.request_link("a@x.com").await;
    let token = app.last_link_token().await;
    let response = app
        .get(&format!("/api/v1/auth/verify?token={token}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with(&format!("{FRONTEND}/dashboard.html?token=")));
}

#[tokio::test]
async fn redirect_mode_reports_invalid_token_to_signin_page() {
    let app = TestApp::with_frontend();

    let response = app
        .get("/api/v1/auth/verify?token=garbage-token", None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{FRONTEND}/signin.html?error=invalid_token")
    );
}

#[tokio::test]
async fn store_outage_on_verify_is_503() {
    let app = TestApp::with_unavailable_stores(None);

    let response = app.get("/api/v1/auth/verify?token=abc", None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.error, "Service temporarily unavailable");
}

#[tokio::test]
async fn store_outage_on_redeem_is_503() {
    let app = TestApp::with_unavailable_stores(None);

    let response = app
        .post_json("/api/v1/auth/redeem", json!({ "token": "abc" }))
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn redirect_mode_does_not_report_store_outage_as_dead_link() {
    let app = TestApp::with_unavailable_stores(Some(FRONTEND));

    let response = app.get("/api/v1/auth/verify?token=abc", None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().get(header::LOCATION).is_none());
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.error, "Service temporarily unavailable");
}

#[tokio::test]
async fn redirect_mode_missing_token_is_a_bad_request() {
    let app = TestApp::with_frontend();

    let response = app.get("/api/v1/auth/verify", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn redirect_mode_link_survives_rejected_replay_attempt() {
    let app = TestApp::with_frontend();
    app.request_link("a@x.com").await;
    let token = app.last_link_token().await;

    let wrong = app
        .get(&format!("/api/v1/auth/verify?token={token}x"), None)
        .await;
    let right = app
        .get(&format!("/api/v1/auth/verify?token={token}"), None)
        .await;

    assert_eq!(
        location(&wrong),
        format!("{FRONTEND}/signin.html?error=invalid_token")
    );
    assert!(location(&right).starts_with(&format!("{FRONTEND}/welcome.html?token=")));
}
