//! Application configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling
//! `dotenvy::dotenv()`. The token and database sections delegate to their
//! owning modules; this struct only aggregates them with the server and
//! application settings.

use crate::core::auth::jwt::{TokenConfig, TokenError};
use crate::core::db::pool::{DbConfig, DbError};

/// Default HTTP listen port
const DEFAULT_PORT: u16 = 8080;

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl ServerConfig {
    /// Load server settings from `HOST` / `PORT` with defaults
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { host, port }
    }

    /// Socket address string for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Application identity settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application name, echoed by the profile endpoint
    pub name: String,
    /// Deployment environment (development, staging, production)
    pub env: String,
}

impl AppConfig {
    /// Load application settings from `APP_NAME` / `APP_ENV` with defaults
    pub fn from_env() -> Self {
        Self {
            name: std::env::var("APP_NAME").unwrap_or_else(|_| "taskdeck".to_string()),
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub token: TokenConfig,
    pub database: DbConfig,
}

impl Config {
    /// Load all configuration sections from the environment
    ///
    /// Fails when `JWT_SECRET` or `DATABASE_URL` is missing; everything else
    /// has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env(),
            app: AppConfig::from_env(),
            token: TokenConfig::from_env()?,
            database: DbConfig::from_env()?,
        })
    }
}
