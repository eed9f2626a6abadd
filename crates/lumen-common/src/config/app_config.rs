//! Application configuration structs
//!
//! Loads configuration from environment variables and an optional .env file.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub push: PushConfig,
    pub snowflake: SnowflakeConfig,
    pub fanout: FanoutConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Push delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    pub endpoint: String,
    pub service_key: String,
    #[serde(default = "default_push_timeout_secs")]
    pub timeout_secs: u64,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Notification fan-out configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FanoutConfig {
    #[serde(default = "default_fanout_concurrency")]
    pub concurrency: usize,
}

// Default value functions
fn default_app_name() -> String {
    "lumen-messaging".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_push_timeout_secs() -> u64 {
    10
}

fn default_fanout_concurrency() -> usize {
    16
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            push: PushConfig {
                endpoint: env::var("PUSH_ENDPOINT")
                    .map_err(|_| ConfigError::MissingVar("PUSH_ENDPOINT"))?,
                service_key: env::var("PUSH_SERVICE_KEY")
                    .map_err(|_| ConfigError::MissingVar("PUSH_SERVICE_KEY"))?,
                timeout_secs: env::var("PUSH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_push_timeout_secs),
            },
            snowflake: SnowflakeConfig {
                worker_id: env::var("WORKER_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            },
            fanout: FanoutConfig {
                concurrency: env::var("FANOUT_CONCURRENCY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or_else(default_fanout_concurrency),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
