pub mod helpers;
pub mod service;
pub mod tracing;

pub use helpers::{StartupError, get_postgres_pool, run_migrations, spawn_token_purge};
pub use service::{LatchkeyService, ServiceConfig};
pub use self::tracing::init_tracing;
