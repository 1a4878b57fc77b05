use std::{
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

use super::validation_error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("email regex is valid")
});

/// A validated, normalized email address.
///
/// Addresses are trimmed and lower-cased on parse so that the uniqueness of
/// a subject's email does not depend on how the user typed it.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty()
            || normalized.len() > MAX_EMAIL_LENGTH
            || !EMAIL_REGEX.is_match(&normalized)
        {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self(Secret::new(normalized)))
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = ValidationError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value.expose_secret())
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
