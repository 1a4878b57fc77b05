use axum::http::StatusCode;
use latchkey_adapters::http::routes::{ErrorResponse, SubjectResponse};
use serde_json::json;

use crate::helpers::{TestApp, json_body};

#[tokio::test]
async fn me_requires_a_session() {
    let app = TestApp::new();

    let response = app.get("/api/v1/users/me", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.error, "Unauthorized");
}

#[tokio::test]
async fn me_rejects_forged_session() {
    let app = TestApp::new();

    let response = app
        .get("/api/v1/users/me", Some("eyJhbGciOiJIUzI1NiJ9.e30.forged"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_signed_in_subject() {
    let app = TestApp::new();
    let session = app.sign_in("a@x.com").await;

    let response = app.get("/api/v1/users/me", Some(&session)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let subject: SubjectResponse = json_body(response).await;
    assert_eq!(subject.email, "a@x.com");
    assert!(subject.first_name.is_none());
}

#[tokio::test]
async fn update_sets_and_clears_names() {
    let app = TestApp::new();
    let session = app.sign_in("a@x.com").await;

    let response = app
        .put_json(
            "/api/v1/users/me",
            json!({ "first_name": " Ada ", "last_name": "Lovelace" }),
            Some(&session),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let subject: SubjectResponse = json_body(response).await;
    assert_eq!(subject.first_name.as_deref(), Some("Ada"));
    assert_eq!(subject.last_name.as_deref(), Some("Lovelace"));

    let response = app
        .put_json(
            "/api/v1/users/me",
            json!({ "first_name": "Ada", "last_name": "" }),
            Some(&session),
        )
        .await;
    let subject: SubjectResponse = json_body(response).await;
    assert!(subject.last_name.is_none());
}

#[tokio::test]
async fn update_rejects_overlong_name() {
    let app = TestApp::new();
    let session = app.sign_in("a@x.com").await;

    let response = app
        .put_json(
            "/api/v1/users/me",
            json!({ "first_name": "a".repeat(101) }),
            Some(&session),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_requires_a_session() {
    let app = TestApp::new();

    let response = app
        .put_json("/api/v1/users/me", json!({ "first_name": "Ada" }), None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
