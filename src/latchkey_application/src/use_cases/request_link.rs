use chrono::{DateTime, Duration, Utc};
use latchkey_core::{
    Email, PlaintextToken, SubjectId, SubjectStore, SubjectStoreError, TokenCodec,
    TokenCodecError, VerificationStore, VerificationStoreError,
};

/// Default lifetime of a magic-link token, in seconds.
pub const DEFAULT_LINK_TTL_SECONDS: i64 = 15 * 60;

/// A freshly issued magic-link token, ready for out-of-band delivery.
#[derive(Debug)]
pub struct IssuedLink {
    pub subject_id: SubjectId,
    pub token: PlaintextToken,
    pub expires_at: DateTime<Utc>,
}

/// Error types for request link use case
#[derive(Debug, thiserror::Error)]
pub enum RequestLinkError {
    #[error("Subject store error: {0}")]
    SubjectStoreError(#[from] SubjectStoreError),
    #[error("Verification store error: {0}")]
    VerificationStoreError(#[from] VerificationStoreError),
    #[error("Token generation failed: {0}")]
    TokenCodecError(#[from] TokenCodecError),
}

/// Request link use case - signs up or logs in a subject by email
pub struct RequestLinkUseCase<'a, S, V>
where
    S: SubjectStore,
    V: VerificationStore,
{
    subject_store: &'a S,
    verification_store: &'a V,
    token_ttl: Duration,
}

impl<'a, S, V> RequestLinkUseCase<'a, S, V>
where
    S: SubjectStore,
    V: VerificationStore,
{
    pub fn new(subject_store: &'a S, verification_store: &'a V) -> Self {
        Self {
            subject_store,
            verification_store,
            token_ttl: Duration::seconds(DEFAULT_LINK_TTL_SECONDS),
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Execute the request link use case
    ///
    /// # Arguments
    /// * `email` - Validated email address
    ///
    /// # Returns
    /// The plaintext token to deliver. The caller must answer identically
    /// for known and unknown addresses.
    #[tracing::instrument(name = "RequestLinkUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<IssuedLink, RequestLinkError> {
        let subject_id = self.subject_store.upsert_by_email(&email).await?;

        let (token, digest) = TokenCodec::generate()?;

        let expires_at = self
            .verification_store
            .issue(&subject_id, &digest, self.token_ttl)
            .await?;

        tracing::info!(%subject_id, %expires_at, "Magic link issued");

        Ok(IssuedLink {
            subject_id,
            token,
            expires_at,
        })
    }
}
