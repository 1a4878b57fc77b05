use std::time::Duration;

use axum::http::StatusCode;
use latchkey_adapters::{
    MockEmailClient,
    http::routes::{ErrorResponse, MAGIC_LINK_ACKNOWLEDGEMENT, MessageResponse},
};
use latchkey_core::Email;
use serde_json::json;

use crate::helpers::{TestApp, body_bytes, json_body};

#[tokio::test]
async fn should_return_202_with_generic_acknowledgement() {
    let app = TestApp::new();

    let response = app.request_link("a@x.com").await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body: MessageResponse = json_body(response).await;
    assert_eq!(body.message, MAGIC_LINK_ACKNOWLEDGEMENT);
}

#[tokio::test]
async fn known_and_unknown_emails_get_identical_responses() {
    let app = TestApp::new();
    app.request_link("known@x.com").await;

    let known = app.request_link("known@x.com").await;
    let unknown = app.request_link("unknown@x.com").await;

    assert_eq!(known.status(), unknown.status());
    assert_eq!(body_bytes(known).await, body_bytes(unknown).await);
}

#[tokio::test]
async fn repeated_requests_keep_one_subject_with_two_live_tokens() {
    let app = TestApp::new();

    app.request_link("a@x.com").await;
    app.request_link("A@x.com ").await;

    assert_eq!(app.subjects.len().await, 1);
    let subject = app
        .subjects
        .find_by_email(&Email::parse("a@x.com").unwrap())
        .await
        .unwrap();
    assert_eq!(app.tokens.live_tokens_for(&subject.id), 2);
}

#[tokio::test]
async fn link_is_delivered_to_the_requester() {
    let app = TestApp::new();

    app.request_link("a@x.com").await;

    let sent = app.email_client.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, Email::parse("a@x.com").unwrap());
    assert!(
        sent[0]
            .content
            .contains("http://localhost/api/v1/auth/verify?token=")
    );
}

#[tokio::test]
async fn failed_delivery_does_not_change_the_response() {
    let app = TestApp::with_email_client(MockEmailClient::failing());

    let response = app.request_link("a@x.com").await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body: MessageResponse = json_body(response).await;
    assert_eq!(body.message, MAGIC_LINK_ACKNOWLEDGEMENT);
}

#[tokio::test]
async fn should_return_400_for_invalid_email_without_touching_stores() {
    let app = TestApp::new();

    for email in ["", "not-an-email", "@x.com", "a@"] {
        let response = app.request_link(email).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{email}");
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error, "Invalid input: Invalid email address");
    }

    assert!(app.subjects.is_empty().await);
    assert!(app.tokens.is_empty());
    assert!(app.email_client.sent().await.is_empty());
}

#[tokio::test]
async fn should_return_400_when_email_is_missing() {
    let app = TestApp::new();

    let response = app.post_json("/api/v1/auth/magic-link", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.subjects.is_empty().await);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new();

    let response = app.request_link("a@x.com").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn health_check_answers_ok() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn store_outage_is_503_with_generic_body() {
    let app = TestApp::with_unavailable_stores(None);

    let response = app.request_link("a@x.com").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.error, "Service temporarily unavailable");
    assert!(app.email_client.sent().await.is_empty());
}

#[tokio::test]
async fn stalled_store_is_cut_off_with_408() {
    let app = TestApp::with_stalled_subject_store(Duration::from_millis(50));

    let started = std::time::Instant::now();
    let response = app.request_link("a@x.com").await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(app.email_client.sent().await.is_empty());
}
