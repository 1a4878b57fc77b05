use std::sync::Arc;

use latchkey_core::{Email, EmailClient};
use tokio::sync::Mutex;

/// A message captured by [`MockEmailClient`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: Email,
    pub subject: String,
    pub content: String,
}

/// Records outgoing mail instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    outbox: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        if self.fail {
            return Err("mock delivery failure".to_string());
        }

        self.outbox.lock().await.push(SentEmail {
            recipient: recipient.clone(),
            subject: subject.to_owned(),
            content: content.to_owned(),
        });
        Ok(())
    }
}
