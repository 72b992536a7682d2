//! Configuration loading and constants.
//!
//! Settings come from three layers: built-in defaults, an optional TOML file,
//! and command line flags (applied last by `main`). `AppConfig` is the root
//! configuration struct; it is built once at startup and shared read-only
//! with every request through `AppState`.

use serde::Deserialize;
use std::path::Path;

use crate::dsn::{self, DsnError};

// =============================================================================
// Defaults
// =============================================================================

/// Default connection string: user `root`, no password, local TCP, `mysql` schema
pub const DEFAULT_DSN: &str = "root:@/mysql";

/// Default listen address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 23306;

/// Default URL path for the status endpoint
pub const DEFAULT_PATH: &str = "/";

/// Whether a server with no replica status counts as healthy
pub const DEFAULT_IGNORE_NON_REPLICA: bool = true;

/// Seconds a replica may lag behind its master
pub const DEFAULT_LAG_THRESHOLD_SECS: u64 = 60;

// =============================================================================
// HTTP
// =============================================================================

/// Status responses must never be served from a cache
pub const CACHE_CONTROL_STATUS: &str = "no-store";

/// Response header carrying the per-request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Seconds to wait for in-flight requests during graceful shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "replica_health=info,tower_http=info";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// MySQL connection settings
    pub database: DatabaseConfig,
    /// HTTP listener settings
    pub http: HttpServerConfig,
    /// Health verdict settings
    pub check: CheckConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// MySQL connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, Go driver DSN syntax or a `mysql://` URL
    #[serde(default = "DatabaseConfig::default_dsn")]
    pub dsn: String,
    /// Deadline for connect + query in seconds. Absent means wait forever.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: Self::default_dsn(),
            timeout_seconds: None,
        }
    }
}

impl DatabaseConfig {
    fn default_dsn() -> String {
        DEFAULT_DSN.to_string()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Path to serve. A trailing slash serves the whole subtree.
    #[serde(default = "HttpServerConfig::default_path")]
    pub path: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            path: Self::default_path(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_PORT
    }

    fn default_path() -> String {
        DEFAULT_PATH.to_string()
    }
}

/// Health verdict settings
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Report OK when the server is not configured as a replica
    #[serde(default = "CheckConfig::default_ignore_non_replica")]
    pub ignore_non_replica: bool,
    /// Lag threshold in seconds. Exceeding it is logged but does not fail the check.
    #[serde(default = "CheckConfig::default_lag_threshold")]
    pub lag_threshold_seconds: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            ignore_non_replica: Self::default_ignore_non_replica(),
            lag_threshold_seconds: Self::default_lag_threshold(),
        }
    }
}

impl CheckConfig {
    fn default_ignore_non_replica() -> bool {
        DEFAULT_IGNORE_NON_REPLICA
    }

    fn default_lag_threshold() -> u64 {
        DEFAULT_LAG_THRESHOLD_SECS
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing keys fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Check the settings that would otherwise only fail on first request or
    /// panic while building the router.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.http.path;
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "http.path must start with '/': {:?}",
                path
            )));
        }
        if path.contains(['{', '}']) {
            return Err(ConfigError::Validation(format!(
                "http.path must not contain '{{' or '}}': {:?}",
                path
            )));
        }

        dsn::connect_options(&self.database.dsn)?;

        Ok(())
    }

    /// Query deadline, if one is configured
    pub fn query_timeout(&self) -> Option<std::time::Duration> {
        self.database
            .timeout_seconds
            .map(std::time::Duration::from_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid connection string: {0}")]
    Dsn(#[from] DsnError),
    #[error("Configuration error: {0}")]
    Validation(String),
}
