use latchkey_core::{Email, EmailClient};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";
const MESSAGE_STREAM: &str = "outbound";
/// Lets the Postmark activity feed filter sign-in mail from everything else.
const MAGIC_LINK_TAG: &str = "magic-link";

#[derive(Debug, Error)]
enum PostmarkError {
    #[error("Invalid Postmark endpoint: {0}")]
    Endpoint(String),
    #[error("Postmark request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Postmark rejected the message ({status}): code {code}, {message}")]
    Rejected {
        status: StatusCode,
        code: i64,
        message: String,
    },
}

/// Delivers magic links through the Postmark `/email` endpoint.
///
/// Click tracking stays off: Postmark would otherwise rewrite the one-time
/// link through its own redirector, which records the token on their side.
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: Url,
    sender: Email,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: Url,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    async fn deliver(&self, message: &PostmarkMessage<'_>) -> Result<(), PostmarkError> {
        let url = self
            .base_url
            .join("/email")
            .map_err(|e| PostmarkError::Endpoint(e.to_string()))?;

        let response = self
            .http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Postmark explains rejections (inactive recipient, unverified sender) in the body
        let rejection = response.json::<PostmarkRejection>().await.unwrap_or_default();
        Err(PostmarkError::Rejected {
            status,
            code: rejection.error_code,
            message: rejection.message,
        })
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending magic link email", skip_all)]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        let message = PostmarkMessage {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject,
            html_body: content,
            text_body: content,
            message_stream: MESSAGE_STREAM,
            tag: MAGIC_LINK_TAG,
            track_links: TrackLinks::None,
            track_opens: false,
        };

        self.deliver(&message).await.map_err(|e| e.to_string())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PostmarkMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
    tag: &'a str,
    track_links: TrackLinks,
    track_opens: bool,
}

#[derive(Serialize, Debug, Clone, Copy)]
enum TrackLinks {
    None,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
struct PostmarkRejection {
    error_code: i64,
    message: String,
}
