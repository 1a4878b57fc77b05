use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header, request},
    middleware,
    routing::{get, post},
};
use latchkey_adapters::{
    AuthenticatedSubject,
    config::AllowedOrigins,
    http::{
        MagicLinkConfig, MagicLinkState, RedeemState, require_session,
        routes::{get_me, health, redeem, request_magic_link, update_me, verify},
    },
};
use latchkey_core::{AuthValidator, EmailClient, SessionIssuer, SubjectStore, VerificationStore};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// Deployment knobs that shape the router.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub magic_link: MagicLinkConfig,
    /// Browser redirect target for `GET /auth/verify`; JSON responses when `None`.
    pub frontend_base_url: Option<String>,
    /// Requests still running after this are dropped, cancelling in-flight queries.
    pub request_timeout: Duration,
}

/// Magic-link authentication service exposing the `/api/v1` routes
pub struct LatchkeyService {
    router: Router,
}

impl LatchkeyService {
    /// Create a new LatchkeyService from its collaborators
    ///
    /// # Arguments
    /// * `subject_store` - Store for subjects (must be Clone)
    /// * `verification_store` - Store for pending magic-link tokens (must be Clone)
    /// * `session_issuer` - Mints session credentials after redemption
    /// * `session_validator` - Resolves bearer credentials on protected routes
    /// * `email_client` - Delivers magic links
    /// * `config` - Link URL, token lifetime, redirect target and request timeout
    pub fn new<S, V, I, A>(
        subject_store: S,
        verification_store: V,
        session_issuer: I,
        session_validator: A,
        email_client: Arc<dyn EmailClient>,
        config: ServiceConfig,
    ) -> Self
    where
        S: SubjectStore + Clone + 'static,
        V: VerificationStore + Clone + 'static,
        I: SessionIssuer + Clone + 'static,
        A: AuthValidator<RequestParts = request::Parts, Claims = AuthenticatedSubject>,
    {
        let auth_routes = Router::new()
            // Link requests need both stores and the email client
            .route("/magic-link", post(request_magic_link::<S, V>))
            .with_state(MagicLinkState {
                subject_store: subject_store.clone(),
                verification_store: verification_store.clone(),
                email_client,
                link: config.magic_link,
            })
            // Redemption needs the token store, the subject store and the issuer
            .route("/verify", get(verify::<V, S, I>))
            .route("/redeem", post(redeem::<V, S, I>))
            .with_state(RedeemState {
                verification_store,
                subject_store: subject_store.clone(),
                session_issuer,
                frontend_base_url: config.frontend_base_url,
            });

        let user_routes = Router::new()
            .route("/me", get(get_me::<S>).put(update_me::<S>))
            .route_layer(middleware::from_fn_with_state(
                session_validator,
                require_session::<A>,
            ))
            .with_state(subject_store);

        let router = Router::new()
            .nest("/api/v1/auth", auth_routes)
            .nest("/api/v1/users", user_routes)
            .route("/health", get(health))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Convert the LatchkeyService into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins.filter(|origins| !origins.is_empty()) {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Latchkey listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
