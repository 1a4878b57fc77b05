use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use latchkey_application::{IssuedLink, RequestLinkUseCase};
use latchkey_core::{Email, EmailClient, SubjectStore, ValidationError, VerificationStore};
use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::error::AuthApiError;
use crate::http::state::MagicLinkState;

/// Returned for every accepted request, known address or not.
pub const MAGIC_LINK_ACKNOWLEDGEMENT: &str = "If you have an account, a link has been sent.";

const MAGIC_LINK_SUBJECT: &str = "Your sign-in link";

#[derive(Deserialize)]
pub struct MagicLinkRequest {
    pub email: Option<Secret<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[tracing::instrument(name = "Request magic link", skip_all)]
pub async fn request_magic_link<S, V>(
    State(state): State<MagicLinkState<S, V>>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: SubjectStore + Clone + 'static,
    V: VerificationStore + Clone + 'static,
{
    let email = request
        .email
        .ok_or(ValidationError::InvalidEmail)
        .and_then(Email::try_from)?;

    let issued = RequestLinkUseCase::new(&state.subject_store, &state.verification_store)
        .with_token_ttl(state.link.token_ttl)
        .execute(email.clone())
        .await?;

    deliver_magic_link(
        state.email_client.as_ref(),
        &email,
        &state.link.verify_url,
        &issued,
    )
    .await;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: MAGIC_LINK_ACKNOWLEDGEMENT.to_string(),
        }),
    ))
}

/// Sends the link out of band. Failures are logged and never change the response.
#[tracing::instrument(name = "Deliver magic link", skip_all, fields(subject_id = %issued.subject_id))]
async fn deliver_magic_link(
    email_client: &dyn EmailClient,
    recipient: &Email,
    verify_url: &str,
    issued: &IssuedLink,
) {
    let link = match build_magic_link(verify_url, issued.token.as_ref()) {
        Ok(link) => link,
        Err(e) => {
            tracing::error!(error = %e, "Invalid magic link verify URL");
            return;
        }
    };

    let content = format!(
        "<p>Click the link below to sign in. It expires at {}.</p><p><a href=\"{link}\">Sign in</a></p>",
        issued.expires_at.format("%H:%M UTC")
    );

    if let Err(e) = email_client
        .send_email(recipient, MAGIC_LINK_SUBJECT, &content)
        .await
    {
        tracing::error!(error = %e, "Failed to deliver magic link");
    }
}

pub fn build_magic_link(verify_url: &str, token: &Secret<String>) -> Result<Url, String> {
    let mut url = Url::parse(verify_url).map_err(|e| e.to_string())?;
    url.query_pairs_mut()
        .append_pair("token", token.expose_secret());
    Ok(url)
}
