use std::time::Duration;

use latchkey_adapters::config::settings::PostgresSettings;
use latchkey_core::VerificationStore;
use secrecy::ExposeSecret;
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use thiserror::Error;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Database did not answer within {0:?}")]
    ConnectTimeout(Duration),
    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database migration failed: {0}")]
    Migration(#[from] MigrateError),
}

/// Create a PostgreSQL connection pool
///
/// The initial connection is bounded by `connect_timeout_in_millis`; if the
/// database is not reachable by then, startup fails.
///
/// # Arguments
/// * `settings` - Pool sizing, timeouts and the connection URL
pub async fn get_postgres_pool(settings: &PostgresSettings) -> Result<PgPool, StartupError> {
    let options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout());

    let deadline = settings.connect_timeout();
    let pool = tokio::time::timeout(deadline, options.connect(settings.url.expose_secret()))
        .await
        .map_err(|_| StartupError::ConnectTimeout(deadline))??;

    tracing::info!(
        max_connections = settings.max_connections,
        "Connected to PostgreSQL"
    );

    Ok(pool)
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StartupError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Periodically delete expired magic-link tokens that were never redeemed.
///
/// The first sweep runs immediately. Failures are logged and retried on the next tick.
pub fn spawn_token_purge<V>(store: V, every: Duration) -> JoinHandle<()>
where
    V: VerificationStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired magic-link tokens"),
                Err(e) => tracing::warn!(error = %e, "Expired token purge failed"),
            }
        }
    })
}
