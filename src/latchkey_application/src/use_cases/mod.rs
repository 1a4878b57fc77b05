pub mod get_current_subject;
pub mod redeem_token;
pub mod request_link;
pub mod update_profile;
