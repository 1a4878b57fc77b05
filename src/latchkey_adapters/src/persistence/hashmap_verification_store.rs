use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use latchkey_core::{SubjectId, TokenDigest, VerificationStore, VerificationStoreError};

#[derive(Debug, Clone)]
struct PendingToken {
    subject_id: SubjectId,
    expires_at: DateTime<Utc>,
}

/// In-process verification store.
///
/// `DashMap::remove_if` holds the shard lock across the expiry check and the
/// removal, which gives the same find-and-delete atomicity as the SQL store.
#[derive(Default, Clone)]
pub struct HashMapVerificationStore {
    tokens: Arc<DashMap<TokenDigest, PendingToken>>,
}

impl HashMapVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of unexpired tokens issued to `subject_id`.
    pub fn live_tokens_for(&self, subject_id: &SubjectId) -> usize {
        let now = Utc::now();
        self.tokens
            .iter()
            .filter(|entry| &entry.subject_id == subject_id && entry.expires_at > now)
            .count()
    }
}

#[async_trait::async_trait]
impl VerificationStore for HashMapVerificationStore {
    async fn issue(
        &self,
        subject_id: &SubjectId,
        digest: &TokenDigest,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, VerificationStoreError> {
        let expires_at = Utc::now() + ttl;
        let previous = self.tokens.insert(
            *digest,
            PendingToken {
                subject_id: *subject_id,
                expires_at,
            },
        );
        debug_assert!(previous.is_none(), "token digest collision");
        Ok(expires_at)
    }

    async fn redeem(&self, digest: &TokenDigest) -> Result<SubjectId, VerificationStoreError> {
        let now = Utc::now();
        self.tokens
            .remove_if(digest, |_, pending| pending.expires_at > now)
            .map(|(_, pending)| pending.subject_id)
            .ok_or(VerificationStoreError::NotFoundOrExpired)
    }

    async fn purge_expired(&self) -> Result<u64, VerificationStoreError> {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, pending| pending.expires_at > now);
        Ok(before.saturating_sub(self.tokens.len()) as u64)
    }
}
