use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use latchkey_core::AuthValidator;

use super::routes::AuthApiError;

/// Rejects requests without a valid session and hands the resolved identity
/// to downstream handlers through request extensions.
pub async fn require_session<A>(
    State(validator): State<A>,
    request: Request,
    next: Next,
) -> Result<Response, AuthApiError>
where
    A: AuthValidator<RequestParts = http::request::Parts>,
{
    let (mut parts, body) = request.into_parts();

    let claims = validator.validate(&parts).await.map_err(|e| {
        tracing::debug!(error = %e, "Session rejected");
        AuthApiError::Unauthorized
    })?;

    parts.extensions.insert(claims);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
