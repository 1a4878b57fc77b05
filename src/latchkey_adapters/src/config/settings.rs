use std::{collections::HashMap, env, time::Duration};

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use super::constants::{defaults, env as env_vars};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatchkeySettings {
    pub server: ServerSettings,
    pub postgres: PostgresSettings,
    pub session: SessionSettings,
    pub magic_link: MagicLinkSettings,
    #[serde(default)]
    pub frontend: FrontendSettings,
    pub email_client: EmailClientSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub address: String,
    pub request_timeout_in_millis: u64,
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_in_millis: u64,
    pub acquire_timeout_in_millis: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub secret: Secret<String>,
    pub time_to_live_in_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagicLinkSettings {
    pub time_to_live_in_seconds: i64,
    /// Public URL of the verify endpoint; the token is appended as `?token=`.
    pub verify_url: String,
    /// How often expired, unredeemed tokens are deleted. `0` turns the sweep off.
    pub purge_interval_in_seconds: u64,
}

impl MagicLinkSettings {
    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_in_seconds > 0)
            .then(|| Duration::from_secs(self.purge_interval_in_seconds))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontendSettings {
    /// When set, `GET /verify` redirects here instead of answering with JSON.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    /// Without a token, outgoing mail is only logged.
    pub auth_token: Option<Secret<String>>,
    pub timeout_in_millis: u64,
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_in_millis)
    }
}

impl PostgresSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_in_millis)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_in_millis)
    }
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

/// CORS origins allowed to call the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for AllowedOrigins {
    fn from(origins: Vec<String>) -> Self {
        Self(
            origins
                .iter()
                .map(|origin| origin.trim())
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect(),
        )
    }
}

impl LatchkeySettings {
    /// Loads settings from `config/base.json` (optional) and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_sources(Some(defaults::CONFIG_FILE), env::vars().collect())
    }

    /// Builds settings from an optional config file and an explicit environment map.
    ///
    /// `LATCHKEY__SECTION__KEY` variables override file values. `DATABASE_URL`,
    /// `JWT_SECRET` and `PORT` override those in turn.
    pub fn from_sources(
        config_file: Option<&str>,
        environment: HashMap<String, String>,
    ) -> Result<Self, SettingsError> {
        // Required values default to empty so that `validate` can name what is missing.
        let mut builder = Config::builder()
            .set_default("postgres.url", "")?
            .set_default("session.secret", "")?
            .set_default("server.address", defaults::SERVER_ADDRESS)?
            .set_default(
                "server.request_timeout_in_millis",
                defaults::REQUEST_TIMEOUT_IN_MILLIS,
            )?
            .set_default("server.allowed_origins", Vec::<String>::new())?
            .set_default("postgres.max_connections", defaults::MAX_CONNECTIONS)?
            .set_default("postgres.min_connections", defaults::MIN_CONNECTIONS)?
            .set_default(
                "postgres.connect_timeout_in_millis",
                defaults::CONNECT_TIMEOUT_IN_MILLIS,
            )?
            .set_default(
                "postgres.acquire_timeout_in_millis",
                defaults::ACQUIRE_TIMEOUT_IN_MILLIS,
            )?
            .set_default(
                "session.time_to_live_in_seconds",
                defaults::SESSION_TTL_IN_SECONDS,
            )?
            .set_default(
                "magic_link.time_to_live_in_seconds",
                defaults::MAGIC_LINK_TTL_IN_SECONDS,
            )?
            .set_default("magic_link.verify_url", defaults::VERIFY_URL)?
            .set_default(
                "magic_link.purge_interval_in_seconds",
                defaults::PURGE_INTERVAL_IN_SECONDS,
            )?
            .set_default("email_client.base_url", defaults::EMAIL_BASE_URL)?
            .set_default("email_client.sender", defaults::EMAIL_SENDER)?
            .set_default(
                "email_client.timeout_in_millis",
                defaults::EMAIL_TIMEOUT_IN_MILLIS,
            )?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        builder = builder
            .add_source(
                Environment::with_prefix(env_vars::PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true)
                    .source(Some(environment.clone())),
            )
            .set_override_option(
                "postgres.url",
                environment.get(env_vars::DATABASE_URL).cloned(),
            )?
            .set_override_option(
                "session.secret",
                environment.get(env_vars::JWT_SECRET).cloned(),
            )?
            .set_override_option(
                "server.address",
                environment
                    .get(env_vars::PORT)
                    .map(|port| format!("0.0.0.0:{}", port.trim())),
            )?;

        let settings: Self = builder.build()?.try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.postgres.url.expose_secret().trim().is_empty() {
            return Err(SettingsError::Missing("postgres.url"));
        }
        if self.session.secret.expose_secret().trim().is_empty() {
            return Err(SettingsError::Missing("session.secret"));
        }
        if self.magic_link.time_to_live_in_seconds <= 0 {
            return Err(SettingsError::Invalid {
                key: "magic_link.time_to_live_in_seconds",
                reason: "must be positive".to_string(),
            });
        }
        if self.session.time_to_live_in_seconds <= 0 {
            return Err(SettingsError::Invalid {
                key: "session.time_to_live_in_seconds",
                reason: "must be positive".to_string(),
            });
        }
        if self.postgres.max_connections == 0 {
            return Err(SettingsError::Invalid {
                key: "postgres.max_connections",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
