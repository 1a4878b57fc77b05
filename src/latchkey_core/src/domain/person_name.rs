use super::validation_error::ValidationError;

pub const MAX_NAME_LENGTH: usize = 100;

/// A profile name as shown to the user. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Parses optional profile input. Blank input means the name is unset.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::NameTooLong {
                max: MAX_NAME_LENGTH,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
