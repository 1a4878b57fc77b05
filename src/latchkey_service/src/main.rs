use std::{env, sync::Arc};

use chrono::Duration;
use color_eyre::eyre::Result;
use latchkey_adapters::{
    DisabledEmailClient, JwtSessionConfig, JwtSessionIssuer, JwtSessionValidator,
    PostgresSubjectStore, PostgresVerificationStore, PostmarkEmailClient,
    config::{LatchkeySettings, env as env_vars},
    http::MagicLinkConfig,
};
use latchkey_core::{Email, EmailClient};
use latchkey_service::{
    LatchkeyService, ServiceConfig, get_postgres_pool, init_tracing, run_migrations,
    spawn_token_purge,
};
use reqwest::{Client as HttpClient, Url};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if env::var(env_vars::ENV).as_deref() != Ok("production") {
        dotenvy::dotenv().ok();
    }

    init_tracing()?;

    // Load configuration
    let settings = LatchkeySettings::load()?;

    // Setup database connection pool and schema
    let pg_pool = get_postgres_pool(&settings.postgres).await?;
    run_migrations(&pg_pool).await?;

    // Create stores
    let subject_store = PostgresSubjectStore::new(pg_pool.clone());
    let verification_store = PostgresVerificationStore::new(pg_pool);

    // Expired links that were never clicked are swept in the background
    if let Some(every) = settings.magic_link.purge_interval() {
        spawn_token_purge(verification_store.clone(), every);
    }

    // Session credentials
    let session_config = JwtSessionConfig::new(settings.session.secret.clone())
        .with_time_to_live(settings.session.time_to_live_in_seconds);
    let session_issuer = JwtSessionIssuer::new(session_config.clone())?;
    let session_validator = JwtSessionValidator::new(&session_config)?;

    // Create email client
    let email_client: Arc<dyn EmailClient> = match &settings.email_client.auth_token {
        Some(auth_token) => {
            let http_client = HttpClient::builder()
                .timeout(settings.email_client.timeout())
                .build()?;

            Arc::new(PostmarkEmailClient::new(
                Url::parse(&settings.email_client.base_url)?,
                Email::parse(&settings.email_client.sender)?,
                auth_token.clone(),
                http_client,
            ))
        }
        None => {
            tracing::warn!("No email provider token configured; magic links will not be delivered");
            Arc::new(DisabledEmailClient)
        }
    };

    let service = LatchkeyService::new(
        subject_store,
        verification_store,
        session_issuer,
        session_validator,
        email_client,
        ServiceConfig {
            magic_link: MagicLinkConfig {
                verify_url: settings.magic_link.verify_url.clone(),
                token_ttl: Duration::seconds(settings.magic_link.time_to_live_in_seconds),
            },
            frontend_base_url: settings.frontend.base_url.clone(),
            request_timeout: settings.server.request_timeout(),
        },
    );

    let listener = tokio::net::TcpListener::bind(&settings.server.address).await?;

    service
        .run_standalone(listener, Some(settings.server.allowed_origins.clone()))
        .await?;

    Ok(())
}
