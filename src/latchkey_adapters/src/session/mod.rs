pub mod claims;
pub mod jwt_session_issuer;
pub mod jwt_session_validator;
