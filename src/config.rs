use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The minimum accepted length of the JWT signing secret, in bytes.
const MIN_JWT_SECRET_BYTES: usize = 32;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The TCP port the HTTP server binds to.
    pub port: u16,
    /// The deployment environment (`development`, `production`, ...).
    pub app_env: String,
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The secret used to sign and verify session tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// The lifetime of a session token (and its cookie) in days.
    pub session_duration_days: i64,
    /// The directory where log files are written.
    pub log_dir: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -base64 48)")?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            anyhow::bail!(
                "JWT_SECRET must be at least {} bytes long",
                MIN_JWT_SECRET_BYTES
            );
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            jwt_secret: Zeroizing::new(jwt_secret.into_bytes()),
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }

    /// Whether the service runs in production mode.
    ///
    /// Session cookies carry the `Secure` attribute only in production so
    /// local development over plain HTTP keeps working.
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
