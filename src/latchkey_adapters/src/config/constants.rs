pub mod env {
    pub const PREFIX: &str = "LATCHKEY";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const PORT: &str = "PORT";
    /// Set to `production` to skip loading `.env`.
    pub const ENV: &str = "ENV";
}

pub mod defaults {
    pub const CONFIG_FILE: &str = "config/base";
    pub const SERVER_ADDRESS: &str = "0.0.0.0:4000";
    pub const REQUEST_TIMEOUT_IN_MILLIS: u64 = 10_000;
    pub const MAX_CONNECTIONS: u32 = 25;
    pub const MIN_CONNECTIONS: u32 = 0;
    pub const CONNECT_TIMEOUT_IN_MILLIS: u64 = 5_000;
    pub const ACQUIRE_TIMEOUT_IN_MILLIS: u64 = 3_000;
    pub const SESSION_TTL_IN_SECONDS: i64 = 7 * 24 * 60 * 60;
    pub const MAGIC_LINK_TTL_IN_SECONDS: i64 = 15 * 60;
    pub const PURGE_INTERVAL_IN_SECONDS: u64 = 60 * 60;
    pub const VERIFY_URL: &str = "http://localhost:4000/api/v1/auth/verify";
    pub const EMAIL_BASE_URL: &str = "https://api.postmarkapp.com/";
    pub const EMAIL_SENDER: &str = "no-reply@latchkey.local";
    pub const EMAIL_TIMEOUT_IN_MILLIS: u64 = 10_000;
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const VERIFY_URL: &str = "http://localhost/api/v1/auth/verify";
}
