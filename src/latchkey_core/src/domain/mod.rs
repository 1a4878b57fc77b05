pub mod email;
pub mod person_name;
pub mod session_token;
pub mod subject;
pub mod validation_error;
pub mod verification_token;
