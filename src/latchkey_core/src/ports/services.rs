use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{email::Email, session_token::SessionToken, subject::SubjectId};

#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Any validation failure. Never says which check failed.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Session signing is misconfigured: {0}")]
    Misconfigured(String),
    #[error("Failed to sign session token: {0}")]
    SigningFailed(String),
}

impl PartialEq for SessionError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Unauthorized, Self::Unauthorized)
                | (Self::Misconfigured(_), Self::Misconfigured(_))
                | (Self::SigningFailed(_), Self::SigningFailed(_))
        )
    }
}

/// Mints self-contained session credentials for verified subjects.
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, subject_id: &SubjectId) -> Result<SessionToken, SessionError>;
}

/// Resolves a presented session credential back to its subject.
pub trait SessionAuthenticator: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<SubjectId, SessionError>;
}
