use std::fmt;

use secrecy::{ExposeSecret, Secret};

use super::validation_error::ValidationError;

const MAX_TOKEN_LENGTH: usize = 512;

/// The one-time secret delivered to the user inside a magic link.
///
/// Only its digest is ever stored. The plaintext is wrapped in a `Secret`
/// so it does not leak through `Debug` output or tracing fields.
#[derive(Debug, Clone)]
pub struct PlaintextToken(Secret<String>);

impl PlaintextToken {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_TOKEN_LENGTH {
            return Err(ValidationError::InvalidToken);
        }
        Ok(Self(Secret::new(trimmed.to_owned())))
    }

    pub(crate) fn from_encoded(encoded: String) -> Self {
        Self(Secret::new(encoded))
    }
}

impl AsRef<Secret<String>> for PlaintextToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for PlaintextToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

/// SHA-256 digest of a plaintext token, the only form persisted.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest([u8; 32]);

impl TokenDigest {
    pub const LENGTH: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl TryFrom<&[u8]> for TokenDigest {
    type Error = ValidationError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 32]>::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidToken)
    }
}

// Short prefix only, enough to correlate log lines.
impl fmt::Debug for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenDigest(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}
