use chrono::{DateTime, Utc};

/// Encoded session credential handed back to the client after redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn into_string(self) -> String {
        self.token
    }
}
