pub mod domain;
pub mod ports;
pub mod strategies;
pub mod token_codec;

// Re-export commonly used types for convenience
pub use domain::{
    email::Email,
    person_name::PersonName,
    session_token::SessionToken,
    subject::{ProfileUpdate, Subject, SubjectId},
    validation_error::ValidationError,
    verification_token::{PlaintextToken, TokenDigest},
};

pub use ports::{
    repositories::{SubjectStore, SubjectStoreError, VerificationStore, VerificationStoreError},
    services::{EmailClient, SessionAuthenticator, SessionError, SessionIssuer},
};

pub use strategies::auth_validator::AuthValidator;

pub use token_codec::{TokenCodec, TokenCodecError};
