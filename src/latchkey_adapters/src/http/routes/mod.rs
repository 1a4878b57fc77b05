pub mod error;
pub mod health;
pub mod magic_link;
pub mod me;
pub mod verify;

pub use error::{AuthApiError, ErrorResponse};
pub use health::health;
pub use magic_link::{MAGIC_LINK_ACKNOWLEDGEMENT, MagicLinkRequest, MessageResponse, request_magic_link};
pub use me::{SubjectResponse, UpdateProfileRequest, get_me, update_me};
pub use verify::{RedeemRequest, SessionResponse, VerifyQuery, redeem, verify};
