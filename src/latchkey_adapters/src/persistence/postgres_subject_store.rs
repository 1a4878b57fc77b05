use chrono::{DateTime, Utc};
use latchkey_core::{
    Email, PersonName, ProfileUpdate, Subject, SubjectId, SubjectStore, SubjectStoreError,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;
use uuid::Uuid;

use super::sqlx_error::subject_store_error;

#[derive(Clone)]
pub struct PostgresSubjectStore {
    pool: PgPool,
}

impl PostgresSubjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubjectRow> for Subject {
    type Error = SubjectStoreError;

    fn try_from(row: SubjectRow) -> Result<Self, Self::Error> {
        let name = |raw: Option<String>| -> Result<Option<PersonName>, SubjectStoreError> {
            match raw {
                Some(raw) => PersonName::parse_optional(&raw)
                    .map_err(|e| SubjectStoreError::UnexpectedError(e.to_string())),
                None => Ok(None),
            }
        };

        Ok(Subject {
            id: SubjectId::from(row.id),
            email: Email::try_from(Secret::from(row.email))
                .map_err(|e| SubjectStoreError::UnexpectedError(e.to_string()))?,
            first_name: name(row.first_name)?,
            last_name: name(row.last_name)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login_at: row.last_login_at,
        })
    }
}

#[async_trait::async_trait]
impl SubjectStore for PostgresSubjectStore {
    #[tracing::instrument(name = "Upserting subject in PostgreSQL", skip_all)]
    async fn upsert_by_email(&self, email: &Email) -> Result<SubjectId, SubjectStoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
                INSERT INTO subjects (id, email)
                VALUES ($1, $2)
                ON CONFLICT (email) DO UPDATE
                SET last_login_at = NOW(), updated_at = NOW()
                RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref().expose_secret())
        .fetch_one(&self.pool)
        .await
        .map_err(subject_store_error)?;

        Ok(SubjectId::from(id))
    }

    #[tracing::instrument(name = "Retrieving subject from PostgreSQL", skip_all, fields(subject_id = %id))]
    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, SubjectStoreError> {
        let row: Option<SubjectRow> = sqlx::query_as(
            r#"
                SELECT id, email, first_name, last_name, created_at, updated_at, last_login_at
                FROM subjects
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(subject_store_error)?;

        let Some(row) = row else {
            return Err(SubjectStoreError::SubjectNotFound);
        };

        Subject::try_from(row)
    }

    #[tracing::instrument(name = "Updating subject profile in PostgreSQL", skip_all, fields(subject_id = %id))]
    async fn update_profile(
        &self,
        id: &SubjectId,
        profile: ProfileUpdate,
    ) -> Result<Subject, SubjectStoreError> {
        let row: Option<SubjectRow> = sqlx::query_as(
            r#"
                UPDATE subjects
                SET first_name = $2, last_name = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING id, email, first_name, last_name, created_at, updated_at, last_login_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(profile.first_name.map(PersonName::into_string))
        .bind(profile.last_name.map(PersonName::into_string))
        .fetch_optional(&self.pool)
        .await
        .map_err(subject_store_error)?;

        let Some(row) = row else {
            return Err(SubjectStoreError::SubjectNotFound);
        };

        Subject::try_from(row)
    }
}
