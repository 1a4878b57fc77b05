use latchkey_core::{
    PlaintextToken, SessionError, SessionIssuer, SessionToken, SubjectId, SubjectStore,
    TokenCodec, VerificationStore, VerificationStoreError,
};

/// Outcome of a successful magic-link redemption.
#[derive(Debug)]
pub struct RedeemedSession {
    pub subject_id: SubjectId,
    pub session: SessionToken,
    /// The subject has not set a first name yet.
    pub onboarding_required: bool,
}

/// Error types for redeem token use case
#[derive(Debug, thiserror::Error)]
pub enum RedeemTokenError {
    #[error("Verification store error: {0}")]
    VerificationStoreError(#[from] VerificationStoreError),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

/// Redeem token use case - consumes a magic-link token and starts a session
pub struct RedeemTokenUseCase<'a, V, S, I>
where
    V: VerificationStore,
    S: SubjectStore,
    I: SessionIssuer,
{
    verification_store: &'a V,
    subject_store: &'a S,
    session_issuer: &'a I,
}

impl<'a, V, S, I> RedeemTokenUseCase<'a, V, S, I>
where
    V: VerificationStore,
    S: SubjectStore,
    I: SessionIssuer,
{
    pub fn new(verification_store: &'a V, subject_store: &'a S, session_issuer: &'a I) -> Self {
        Self {
            verification_store,
            subject_store,
            session_issuer,
        }
    }

    /// Execute the redeem token use case
    ///
    /// # Arguments
    /// * `token` - Plaintext token taken from the magic link
    ///
    /// # Returns
    /// A fresh session credential, or `NotFoundOrExpired` for unknown,
    /// consumed and expired tokens alike.
    #[tracing::instrument(name = "RedeemTokenUseCase::execute", skip_all)]
    pub async fn execute(&self, token: PlaintextToken) -> Result<RedeemedSession, RedeemTokenError> {
        let digest = TokenCodec::digest(&token);

        let subject_id = self.verification_store.redeem(&digest).await?;

        let session = self.session_issuer.issue(&subject_id)?;

        // The token is already spent; a profile read failure must not undo the login.
        let onboarding_required = match self.subject_store.get_subject(&subject_id).await {
            Ok(subject) => subject.requires_onboarding(),
            Err(e) => {
                tracing::warn!(%subject_id, error = %e, "Could not load profile after redemption");
                false
            }
        };

        tracing::info!(%subject_id, "Magic link redeemed");

        Ok(RedeemedSession {
            subject_id,
            session,
            onboarding_required,
        })
    }
}
