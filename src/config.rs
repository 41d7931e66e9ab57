//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines constants for
//! default paths, logging, and HTTP response headers. `AppConfig` is the root
//! configuration struct containing all settings.

use serde::Deserialize;
use std::path::Path;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "stocktake=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default HTTP bind address (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default inventory table queried by the item listing
pub const DEFAULT_INVENTORY_TABLE: &str = "inventory_count_table";

/// Cache-Control for the item listing - it must always reflect the live table
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Inventory database configuration
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Inventory database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection descriptor as a sqlx URL. Carries the driver scheme, host,
    /// database name, and encryption options (e.g. `?sslmode=require`).
    pub url: String,
    /// Table queried by the item listing and written by count sessions.
    /// Interpolated into SQL, so it must be a plain identifier (validated at load).
    #[serde(default = "DatabaseConfig::default_table")]
    pub table: String,
}

impl DatabaseConfig {
    fn default_table() -> String {
        DEFAULT_INVENTORY_TABLE.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;

        if config.database.url.is_empty() {
            return Err(ConfigError::Validation(
                "database.url must not be empty".to_string(),
            ));
        }

        // The table name cannot be bound as a query parameter, so reject
        // anything that is not a plain (optionally schema-qualified) identifier.
        if !is_table_identifier(&config.database.table) {
            return Err(ConfigError::Validation(format!(
                "database.table {:?} is not a valid table identifier",
                config.database.table
            )));
        }

        Ok(config)
    }
}

/// Accepts `[A-Za-z0-9_]` segments, optionally dot-separated (schema.table).
fn is_table_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('.')
            .all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
            })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
