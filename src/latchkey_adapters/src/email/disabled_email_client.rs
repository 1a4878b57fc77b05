use latchkey_core::{Email, EmailClient};

/// Drops every message. Used when no delivery provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEmailClient;

#[async_trait::async_trait]
impl EmailClient for DisabledEmailClient {
    async fn send_email(
        &self,
        _recipient: &Email,
        subject: &str,
        _content: &str,
    ) -> Result<(), String> {
        tracing::warn!(subject, "Email delivery is disabled; message dropped");
        Ok(())
    }
}
