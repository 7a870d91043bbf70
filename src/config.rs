use axum_extra::extract::cookie::Key;
use std::env;

use crate::error::AppError;

/// Development-only signing key. The cookie HMAC needs at least 64 bytes of key material.
const LOCAL_SECRET_KEY: &str =
    "super-secret-squirrels?-local-development-signing-key-do-not-deploy-0123456789";

/// AppConfig
///
/// Holds the process-start configuration. It is immutable once loaded and reaches
/// handlers through `AppState` / `FromRef` instead of any global.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and the `Secure` cookie flag.
    pub env: Env,
    // SQLite connection string for the embedded report store.
    pub db_url: String,
    // The single shared admin password, compared by exact string equality.
    pub admin_password: String,
    // Key material for signing the session and flash cookies.
    pub secret_key: String,
    // Verbose logging.
    pub debug: bool,
    pub host: String,
    pub port: u16,
}

/// Env
///
/// Defines the runtime context.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe values for test state setup, without touching environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: "sqlite::memory:".to_string(),
            admin_password: "secret".to_string(),
            secret_key: LOCAL_SECRET_KEY.to_string(),
            debug: false,
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables.
    ///
    /// # Panics
    /// Panics in production when `ADMIN_PASSWORD` or `SECRET_KEY` is missing, so the
    /// board never starts with the development credentials.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let (admin_password, secret_key) = match env {
            Env::Production => (
                env::var("ADMIN_PASSWORD")
                    .expect("FATAL: ADMIN_PASSWORD must be set in production."),
                env::var("SECRET_KEY").expect("FATAL: SECRET_KEY must be set in production."),
            ),
            Env::Local => (
                env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "secret".to_string()),
                env::var("SECRET_KEY").unwrap_or_else(|_| LOCAL_SECRET_KEY.to_string()),
            ),
        };

        let debug = env::var("DEBUG")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);

        Self {
            env,
            db_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://reports.db".to_string()),
            admin_password,
            secret_key,
            debug,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        }
    }

    /// cookie_key
    ///
    /// Builds the signing key for the session and flash cookies.
    pub fn cookie_key(&self) -> Result<Key, AppError> {
        Key::try_from(self.secret_key.as_bytes()).map_err(|e| {
            AppError::Config(format!(
                "SECRET_KEY must be at least 64 bytes ({} given): {}",
                self.secret_key.len(),
                e
            ))
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.env == Env::Production
    }
}
