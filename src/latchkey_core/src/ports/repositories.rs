use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    subject::{ProfileUpdate, Subject, SubjectId},
    verification_token::TokenDigest,
};

// SubjectStore port trait and errors
#[derive(Debug, Error)]
pub enum SubjectStoreError {
    #[error("Subject not found")]
    SubjectNotFound,
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for SubjectStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::SubjectNotFound, Self::SubjectNotFound)
                | (Self::StoreUnavailable(_), Self::StoreUnavailable(_))
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Inserts a subject for `email`, or touches `last_login_at` if one exists.
    /// Must be a single atomic write; existing names are left untouched.
    async fn upsert_by_email(&self, email: &Email) -> Result<SubjectId, SubjectStoreError>;
    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, SubjectStoreError>;
    async fn update_profile(
        &self,
        id: &SubjectId,
        profile: ProfileUpdate,
    ) -> Result<Subject, SubjectStoreError>;
}

// VerificationStore port trait and errors
#[derive(Debug, Error)]
pub enum VerificationStoreError {
    /// Absent, already consumed, or expired. Deliberately a single case.
    #[error("Invalid or expired token")]
    NotFoundOrExpired,
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for VerificationStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::NotFoundOrExpired, Self::NotFoundOrExpired)
                | (Self::StoreUnavailable(_), Self::StoreUnavailable(_))
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Stores a pending token that expires `ttl` from now. Returns the expiry.
    async fn issue(
        &self,
        subject_id: &SubjectId,
        digest: &TokenDigest,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, VerificationStoreError>;

    /// Atomically finds an unexpired token and deletes it.
    ///
    /// Concurrent callers redeeming the same digest observe exactly one
    /// success; everyone else gets `NotFoundOrExpired`.
    async fn redeem(&self, digest: &TokenDigest) -> Result<SubjectId, VerificationStoreError>;

    /// Deletes expired records and returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, VerificationStoreError>;
}
