use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use latchkey_application::{RedeemTokenUseCase, RedeemedSession};
use latchkey_core::{
    PlaintextToken, SessionIssuer, SubjectId, SubjectStore, ValidationError, VerificationStore,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::error::AuthApiError;
use crate::http::state::RedeemState;

const ONBOARDING_PAGE: &str = "welcome.html";
const DASHBOARD_PAGE: &str = "dashboard.html";
const SIGNIN_PAGE: &str = "signin.html";

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub token: Option<Secret<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub subject_id: SubjectId,
    pub expires_at: DateTime<Utc>,
    pub onboarding_required: bool,
}

impl From<RedeemedSession> for SessionResponse {
    fn from(redeemed: RedeemedSession) -> Self {
        Self {
            expires_at: redeemed.session.expires_at(),
            token: redeemed.session.into_string(),
            subject_id: redeemed.subject_id,
            onboarding_required: redeemed.onboarding_required,
        }
    }
}

/// `GET /auth/verify?token=` - the target of the emailed link.
#[tracing::instrument(name = "Verify magic link", skip_all)]
pub async fn verify<V, S, I>(
    State(state): State<RedeemState<V, S, I>>,
    Query(query): Query<VerifyQuery>,
) -> Response
where
    V: VerificationStore + Clone + 'static,
    S: SubjectStore + Clone + 'static,
    I: SessionIssuer + Clone + 'static,
{
    let Some(raw) = query.token.as_deref() else {
        return AuthApiError::from(ValidationError::InvalidToken).into_response();
    };

    match (frontend_base(&state), redeem_token(&state, raw).await) {
        (Some(base), Ok(redeemed)) => {
            let page = if redeemed.onboarding_required {
                ONBOARDING_PAGE
            } else {
                DASHBOARD_PAGE
            };
            Redirect::to(&format!(
                "{base}/{page}?token={}",
                redeemed.session.as_str()
            ))
            .into_response()
        }
        (Some(base), Err(e)) if e.is_token_rejection() => {
            tracing::debug!(error = %e, "Magic link rejected");
            Redirect::to(&format!("{base}/{SIGNIN_PAGE}?error=invalid_token")).into_response()
        }
        // Outages and internal failures keep their status code, never the dead-link redirect.
        (_, Err(e)) => e.into_response(),
        (None, Ok(redeemed)) => Json(SessionResponse::from(redeemed)).into_response(),
    }
}

/// `POST /auth/redeem` - JSON redemption for non-browser clients.
#[tracing::instrument(name = "Redeem token", skip_all)]
pub async fn redeem<V, S, I>(
    State(state): State<RedeemState<V, S, I>>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<SessionResponse>, AuthApiError>
where
    V: VerificationStore + Clone + 'static,
    S: SubjectStore + Clone + 'static,
    I: SessionIssuer + Clone + 'static,
{
    let raw = request
        .token
        .as_ref()
        .map(|token| token.expose_secret().as_str())
        .unwrap_or_default();

    let redeemed = redeem_token(&state, raw).await?;

    Ok(Json(SessionResponse::from(redeemed)))
}

async fn redeem_token<V, S, I>(
    state: &RedeemState<V, S, I>,
    raw: &str,
) -> Result<RedeemedSession, AuthApiError>
where
    V: VerificationStore,
    S: SubjectStore,
    I: SessionIssuer,
{
    let token = PlaintextToken::parse(raw)?;

    let redeemed = RedeemTokenUseCase::new(
        &state.verification_store,
        &state.subject_store,
        &state.session_issuer,
    )
    .execute(token)
    .await?;

    Ok(redeemed)
}

fn frontend_base<V, S, I>(state: &RedeemState<V, S, I>) -> Option<&str> {
    state
        .frontend_base_url
        .as_deref()
        .map(|base| base.trim_end_matches('/'))
        .filter(|base| !base.is_empty())
}
