use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::{DateTime, Utc};
use latchkey_adapters::{
    HashMapSubjectStore, HashMapVerificationStore, JwtSessionConfig, JwtSessionIssuer,
    JwtSessionValidator, MockEmailClient, config::constants::test, http::MagicLinkConfig,
};
use latchkey_core::{
    Email, ProfileUpdate, Subject, SubjectId, SubjectStore, SubjectStoreError, TokenDigest,
    VerificationStore, VerificationStoreError,
};
use latchkey_service::{LatchkeyService, ServiceConfig};
use secrecy::Secret;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

pub const FRONTEND: &str = "https://app.example.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const STALL: Duration = Duration::from_secs(30);

pub struct TestApp {
    router: Router,
    pub subjects: HashMapSubjectStore,
    pub tokens: HashMapVerificationStore,
    pub email_client: MockEmailClient,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None, MockEmailClient::new())
    }

    pub fn with_frontend() -> Self {
        Self::build(Some(FRONTEND.to_string()), MockEmailClient::new())
    }

    pub fn with_email_client(email_client: MockEmailClient) -> Self {
        Self::build(None, email_client)
    }

    /// Every store call fails as if the database pool had timed out.
    /// The in-memory stores on the returned app stay untouched.
    pub fn with_unavailable_stores(frontend_base_url: Option<&str>) -> Self {
        let email_client = MockEmailClient::new();
        Self {
            router: router(
                UnavailableStore,
                UnavailableStore,
                frontend_base_url.map(str::to_string),
                email_client.clone(),
                REQUEST_TIMEOUT,
            ),
            subjects: HashMapSubjectStore::new(),
            tokens: HashMapVerificationStore::new(),
            email_client,
        }
    }

    /// Subject store calls hang for longer than `request_timeout`.
    pub fn with_stalled_subject_store(request_timeout: Duration) -> Self {
        let email_client = MockEmailClient::new();
        Self {
            router: router(
                StalledStore,
                UnavailableStore,
                None,
                email_client.clone(),
                request_timeout,
            ),
            subjects: HashMapSubjectStore::new(),
            tokens: HashMapVerificationStore::new(),
            email_client,
        }
    }

    fn build(frontend_base_url: Option<String>, email_client: MockEmailClient) -> Self {
        let subjects = HashMapSubjectStore::new();
        let tokens = HashMapVerificationStore::new();

        Self {
            router: router(
                subjects.clone(),
                tokens.clone(),
                frontend_base_url,
                email_client.clone(),
                REQUEST_TIMEOUT,
            ),
            subjects,
            tokens,
            email_client,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> Response<Body> {
        let mut request = Request::get(uri);
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn put_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        bearer: Option<&str>,
    ) -> Response<Body> {
        let mut request = Request::put(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn request_link(&self, email: &str) -> Response<Body> {
        self.post_json(
            "/api/v1/auth/magic-link",
            serde_json::json!({ "email": email }),
        )
        .await
    }

    /// Token embedded in the most recently delivered magic link.
    pub async fn last_link_token(&self) -> String {
        let sent = self.email_client.sent().await;
        let content = &sent.last().expect("a magic link was sent").content;
        let start = content.find("token=").expect("link has a token") + "token=".len();
        let end = start + content[start..].find('"').expect("link is quoted");
        content[start..end].to_string()
    }

    /// Runs the full link flow and returns a session credential.
    pub async fn sign_in(&self, email: &str) -> String {
        self.request_link(email).await;
        let token = self.last_link_token().await;
        let response = self
            .post_json("/api/v1/auth/redeem", serde_json::json!({ "token": token }))
            .await;
        let session: serde_json::Value = json_body(response).await;
        session["token"].as_str().unwrap().to_string()
    }
}

fn router<S, V>(
    subjects: S,
    tokens: V,
    frontend_base_url: Option<String>,
    email_client: MockEmailClient,
    request_timeout: Duration,
) -> Router
where
    S: SubjectStore + Clone + 'static,
    V: VerificationStore + Clone + 'static,
{
    let session_config = JwtSessionConfig::new(Secret::new("test-secret".to_string()));

    LatchkeyService::new(
        subjects,
        tokens,
        JwtSessionIssuer::new(session_config.clone()).unwrap(),
        JwtSessionValidator::new(&session_config).unwrap(),
        Arc::new(email_client),
        ServiceConfig {
            magic_link: MagicLinkConfig {
                verify_url: test::VERIFY_URL.to_string(),
                token_ttl: chrono::Duration::minutes(15),
            },
            frontend_base_url,
            request_timeout,
        },
    )
    .as_nested_router(None)
}

const POOL_TIMED_OUT: &str = "pool timed out while waiting for an open connection";

#[derive(Clone)]
pub struct UnavailableStore;

#[async_trait::async_trait]
impl SubjectStore for UnavailableStore {
    async fn upsert_by_email(&self, _email: &Email) -> Result<SubjectId, SubjectStoreError> {
        Err(SubjectStoreError::StoreUnavailable(POOL_TIMED_OUT.to_string()))
    }

    async fn get_subject(&self, _id: &SubjectId) -> Result<Subject, SubjectStoreError> {
        Err(SubjectStoreError::StoreUnavailable(POOL_TIMED_OUT.to_string()))
    }

    async fn update_profile(
        &self,
        _id: &SubjectId,
        _profile: ProfileUpdate,
    ) -> Result<Subject, SubjectStoreError> {
        Err(SubjectStoreError::StoreUnavailable(POOL_TIMED_OUT.to_string()))
    }
}

#[async_trait::async_trait]
impl VerificationStore for UnavailableStore {
    async fn issue(
        &self,
        _subject_id: &SubjectId,
        _digest: &TokenDigest,
        _ttl: chrono::Duration,
    ) -> Result<DateTime<Utc>, VerificationStoreError> {
        Err(VerificationStoreError::StoreUnavailable(POOL_TIMED_OUT.to_string()))
    }

    async fn redeem(&self, _digest: &TokenDigest) -> Result<SubjectId, VerificationStoreError> {
        Err(VerificationStoreError::StoreUnavailable(POOL_TIMED_OUT.to_string()))
    }

    async fn purge_expired(&self) -> Result<u64, VerificationStoreError> {
        Err(VerificationStoreError::StoreUnavailable(POOL_TIMED_OUT.to_string()))
    }
}

#[derive(Clone)]
pub struct StalledStore;

#[async_trait::async_trait]
impl SubjectStore for StalledStore {
    async fn upsert_by_email(&self, email: &Email) -> Result<SubjectId, SubjectStoreError> {
        tokio::time::sleep(STALL).await;
        UnavailableStore.upsert_by_email(email).await
    }

    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, SubjectStoreError> {
        tokio::time::sleep(STALL).await;
        UnavailableStore.get_subject(id).await
    }

    async fn update_profile(
        &self,
        id: &SubjectId,
        profile: ProfileUpdate,
    ) -> Result<Subject, SubjectStoreError> {
        tokio::time::sleep(STALL).await;
        UnavailableStore.update_profile(id, profile).await
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}
