use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use latchkey_core::{SessionError, SessionIssuer, SessionToken, SubjectId};
use secrecy::{ExposeSecret, Secret};

use super::claims::SessionClaims;

/// Default session lifetime, in seconds (7 days).
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtSessionConfig {
    pub secret: Secret<String>,
    pub time_to_live_in_seconds: i64,
}

impl JwtSessionConfig {
    pub fn new(secret: Secret<String>) -> Self {
        Self {
            secret,
            time_to_live_in_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    pub fn with_time_to_live(mut self, seconds: i64) -> Self {
        self.time_to_live_in_seconds = seconds;
        self
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    pub(crate) fn validate(&self) -> Result<(), SessionError> {
        if self.secret.expose_secret().trim().is_empty() {
            return Err(SessionError::Misconfigured(
                "session signing secret is empty".to_string(),
            ));
        }
        if self.time_to_live_in_seconds <= 0 {
            return Err(SessionError::Misconfigured(
                "session time to live must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mints HS256 session credentials.
#[derive(Clone)]
pub struct JwtSessionIssuer {
    config: JwtSessionConfig,
    encoding_key: EncodingKey,
}

impl JwtSessionIssuer {
    pub fn new(config: JwtSessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let encoding_key = EncodingKey::from_secret(config.as_bytes());
        Ok(Self {
            config,
            encoding_key,
        })
    }
}

impl SessionIssuer for JwtSessionIssuer {
    #[tracing::instrument(name = "Issuing session token", skip_all, fields(subject_id = %subject_id))]
    fn issue(&self, subject_id: &SubjectId) -> Result<SessionToken, SessionError> {
        let ttl = Duration::try_seconds(self.config.time_to_live_in_seconds).ok_or_else(|| {
            SessionError::Misconfigured("session time to live out of range".to_string())
        })?;

        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| SessionError::SigningFailed("expiry out of range".to_string()))?;

        let claims = SessionClaims {
            sub: subject_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::SigningFailed(e.to_string()))?;

        Ok(SessionToken::new(token, expires_at))
    }
}
