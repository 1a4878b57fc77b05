use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use latchkey_application::{RedeemTokenError, RequestLinkError};
use latchkey_core::{SessionError, SubjectStoreError, ValidationError, VerificationStoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors crossing the HTTP boundary.
///
/// Only the `Display` text of the variant reaches the client; wrapped detail is logged.
#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Subject not found")]
    SubjectNotFound,

    #[error("Service temporarily unavailable")]
    ServiceUnavailable(String),

    #[error("Internal server error")]
    UnexpectedError(String),
}

impl AuthApiError {
    /// The presented token can never be redeemed, so retrying is pointless.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthApiError::InvalidInput(_) | AuthApiError::InvalidOrExpiredToken
        )
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            AuthApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthApiError::InvalidOrExpiredToken | AuthApiError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AuthApiError::SubjectNotFound => StatusCode::NOT_FOUND,
            AuthApiError::ServiceUnavailable(detail) => {
                tracing::error!(error = %detail, "Store unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            AuthApiError::UnexpectedError(detail) => {
                tracing::error!(error = %detail, "Unexpected error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<SubjectStoreError> for AuthApiError {
    fn from(error: SubjectStoreError) -> Self {
        match error {
            SubjectStoreError::SubjectNotFound => AuthApiError::SubjectNotFound,
            SubjectStoreError::StoreUnavailable(e) => AuthApiError::ServiceUnavailable(e),
            SubjectStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<VerificationStoreError> for AuthApiError {
    fn from(error: VerificationStoreError) -> Self {
        match error {
            VerificationStoreError::NotFoundOrExpired => AuthApiError::InvalidOrExpiredToken,
            VerificationStoreError::StoreUnavailable(e) => AuthApiError::ServiceUnavailable(e),
            VerificationStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SessionError> for AuthApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Unauthorized => AuthApiError::Unauthorized,
            SessionError::Misconfigured(e) | SessionError::SigningFailed(e) => {
                AuthApiError::UnexpectedError(e)
            }
        }
    }
}

impl From<RequestLinkError> for AuthApiError {
    fn from(error: RequestLinkError) -> Self {
        match error {
            RequestLinkError::SubjectStoreError(e) => e.into(),
            RequestLinkError::VerificationStoreError(e) => e.into(),
            RequestLinkError::TokenCodecError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<RedeemTokenError> for AuthApiError {
    fn from(error: RedeemTokenError) -> Self {
        match error {
            RedeemTokenError::VerificationStoreError(e) => e.into(),
            RedeemTokenError::SessionError(e) => e.into(),
        }
    }
}
