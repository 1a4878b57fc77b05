use thiserror::Error;

/// Malformed input, rejected before any store access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Missing or malformed token")]
    InvalidToken,
    #[error("Name must be at most {max} characters")]
    NameTooLong { max: usize },
}
