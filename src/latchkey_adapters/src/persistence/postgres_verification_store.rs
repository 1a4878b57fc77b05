use chrono::{DateTime, Duration, Utc};
use latchkey_core::{SubjectId, TokenDigest, VerificationStore, VerificationStoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::sqlx_error::verification_store_error;

#[derive(Clone)]
pub struct PostgresVerificationStore {
    pool: PgPool,
}

impl PostgresVerificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VerificationStore for PostgresVerificationStore {
    #[tracing::instrument(name = "Storing verification token in PostgreSQL", skip_all, fields(subject_id = %subject_id))]
    async fn issue(
        &self,
        subject_id: &SubjectId,
        digest: &TokenDigest,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, VerificationStoreError> {
        // Expiry is computed by the database so that issue and redeem share one clock.
        sqlx::query_scalar(
            r#"
                INSERT INTO verification_tokens (token_digest, subject_id, expiry)
                VALUES ($1, $2, NOW() + ($3::BIGINT * INTERVAL '1 millisecond'))
                RETURNING expiry
            "#,
        )
        .bind(digest.as_bytes().as_slice())
        .bind(subject_id.as_uuid())
        .bind(ttl.num_milliseconds())
        .fetch_one(&self.pool)
        .await
        .map_err(verification_store_error)
    }

    #[tracing::instrument(name = "Redeeming verification token in PostgreSQL", skip_all)]
    async fn redeem(&self, digest: &TokenDigest) -> Result<SubjectId, VerificationStoreError> {
        let subject_id: Option<Uuid> = sqlx::query_scalar(
            r#"
                DELETE FROM verification_tokens
                WHERE token_digest = $1 AND expiry > NOW()
                RETURNING subject_id
            "#,
        )
        .bind(digest.as_bytes().as_slice())
        .fetch_optional(&self.pool)
        .await
        .map_err(verification_store_error)?;

        subject_id
            .map(SubjectId::from)
            .ok_or(VerificationStoreError::NotFoundOrExpired)
    }

    #[tracing::instrument(name = "Purging expired verification tokens", skip_all)]
    async fn purge_expired(&self) -> Result<u64, VerificationStoreError> {
        let result = sqlx::query(
            r#"
                DELETE FROM verification_tokens
                WHERE expiry <= NOW()
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(verification_store_error)?;

        tracing::debug!(purged = result.rows_affected(), "Expired tokens purged");
        Ok(result.rows_affected())
    }
}
