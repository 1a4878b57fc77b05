pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::require_session;
pub use state::{MagicLinkConfig, MagicLinkState, RedeemState};
