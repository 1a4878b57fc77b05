use async_trait::async_trait;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use latchkey_core::{AuthValidator, SessionAuthenticator, SessionError, SubjectId};

use super::{claims::SessionClaims, jwt_session_issuer::JwtSessionConfig};

/// Identity resolved from a valid session credential.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSubject(pub SubjectId);

impl AuthenticatedSubject {
    pub fn subject_id(&self) -> SubjectId {
        self.0
    }
}

/// Verifies HS256 session credentials signed with the local secret.
#[derive(Clone)]
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: &JwtSessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.as_bytes()),
            validation,
        })
    }

    fn decode_claims(&self, credential: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        decode::<SessionClaims>(credential, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
    }
}

impl SessionAuthenticator for JwtSessionValidator {
    fn authenticate(&self, credential: &str) -> Result<SubjectId, SessionError> {
        let claims = self.decode_claims(credential).map_err(|e| {
            tracing::debug!(error = %e, "Session credential rejected");
            SessionError::Unauthorized
        })?;

        // jsonwebtoken treats `exp == now` as valid; sessions must not.
        if claims.exp <= Utc::now().timestamp() {
            tracing::debug!("Session credential expired");
            return Err(SessionError::Unauthorized);
        }

        SubjectId::parse(&claims.sub).map_err(|e| {
            tracing::debug!(error = %e, "Session subject is not a valid id");
            SessionError::Unauthorized
        })
    }
}

#[async_trait]
impl AuthValidator for JwtSessionValidator {
    type Claims = AuthenticatedSubject;
    type RequestParts = http::request::Parts;
    type Error = SessionError;

    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error> {
        let bearer = extract_bearer(&parts.headers)?;
        self.authenticate(&bearer).map(AuthenticatedSubject)
    }
}

/// Pulls the credential out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer(headers: &http::HeaderMap) -> Result<String, SessionError> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_owned())
        .ok_or(SessionError::Unauthorized)
}
