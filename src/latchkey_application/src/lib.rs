pub mod use_cases;


pub use use_cases::{
    get_current_subject::GetCurrentSubjectUseCase,
    redeem_token::{RedeemTokenError, RedeemTokenUseCase, RedeemedSession},
    request_link::{DEFAULT_LINK_TTL_SECONDS, IssuedLink, RequestLinkError, RequestLinkUseCase},
    update_profile::UpdateProfileUseCase,
};
