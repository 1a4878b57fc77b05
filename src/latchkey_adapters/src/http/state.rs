use std::sync::Arc;

use chrono::Duration;
use latchkey_core::EmailClient;

/// How outgoing magic links are built.
#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    pub verify_url: String,
    pub token_ttl: Duration,
}

/// State for `POST /auth/magic-link`.
#[derive(Clone)]
pub struct MagicLinkState<S, V> {
    pub subject_store: S,
    pub verification_store: V,
    pub email_client: Arc<dyn EmailClient>,
    pub link: MagicLinkConfig,
}

/// State for the token redemption routes.
#[derive(Clone)]
pub struct RedeemState<V, S, I> {
    pub verification_store: V,
    pub subject_store: S,
    pub session_issuer: I,
    /// Redirect target for browser flows; JSON responses when `None`.
    pub frontend_base_url: Option<String>,
}
