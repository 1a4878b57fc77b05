use axum::{Extension, Json, extract::State};
use chrono::{DateTime, Utc};
use latchkey_application::{GetCurrentSubjectUseCase, UpdateProfileUseCase};
use latchkey_core::{PersonName, ProfileUpdate, Subject, SubjectId, SubjectStore};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::error::AuthApiError;
use crate::session::jwt_session_validator::AuthenticatedSubject;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub id: SubjectId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            email: subject.email.as_ref().expose_secret().clone(),
            first_name: subject.first_name.map(PersonName::into_string),
            last_name: subject.last_name.map(PersonName::into_string),
            created_at: subject.created_at,
            updated_at: subject.updated_at,
            last_login_at: subject.last_login_at,
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[tracing::instrument(name = "Get current subject", skip_all)]
pub async fn get_me<S>(
    State(subject_store): State<S>,
    Extension(AuthenticatedSubject(subject_id)): Extension<AuthenticatedSubject>,
) -> Result<Json<SubjectResponse>, AuthApiError>
where
    S: SubjectStore + Clone + 'static,
{
    let subject = GetCurrentSubjectUseCase::new(&subject_store)
        .execute(subject_id)
        .await?;

    Ok(Json(subject.into()))
}

#[tracing::instrument(name = "Update profile", skip_all)]
pub async fn update_me<S>(
    State(subject_store): State<S>,
    Extension(AuthenticatedSubject(subject_id)): Extension<AuthenticatedSubject>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<SubjectResponse>, AuthApiError>
where
    S: SubjectStore + Clone + 'static,
{
    let profile = ProfileUpdate {
        first_name: parse_name(request.first_name)?,
        last_name: parse_name(request.last_name)?,
    };

    let subject = UpdateProfileUseCase::new(&subject_store)
        .execute(subject_id, profile)
        .await?;

    Ok(Json(subject.into()))
}

fn parse_name(raw: Option<String>) -> Result<Option<PersonName>, AuthApiError> {
    match raw {
        Some(raw) => Ok(PersonName::parse_optional(&raw)?),
        None => Ok(None),
    }
}
