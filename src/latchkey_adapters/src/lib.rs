pub mod config;
pub mod email;
pub mod http;
pub mod persistence;
pub mod session;

pub use email::{
    disabled_email_client::DisabledEmailClient,
    mock_email_client::{MockEmailClient, SentEmail},
    postmark_email_client::PostmarkEmailClient,
};
pub use persistence::{
    hashmap_subject_store::HashMapSubjectStore,
    hashmap_verification_store::HashMapVerificationStore,
    postgres_subject_store::PostgresSubjectStore,
    postgres_verification_store::PostgresVerificationStore,
};
pub use session::{
    claims::SessionClaims,
    jwt_session_issuer::{DEFAULT_SESSION_TTL_SECONDS, JwtSessionConfig, JwtSessionIssuer},
    jwt_session_validator::{AuthenticatedSubject, JwtSessionValidator, extract_bearer},
};
