//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! the upstream health records endpoint, the recommendation store, logging
//! format, and default paths. `AppConfig` is the root configuration struct.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Recommendations are recomputed and re-persisted on every request.
pub const CACHE_CONTROL_RECOMMENDATIONS: &str = "no-store";

// =============================================================================
// Upstream Health Records Service
// =============================================================================

/// Host of the health records API
pub const HEALTH_RECORDS_HOST: &str = "r7jfk2x654.execute-api.eu-north-1.amazonaws.com";

/// Default base URL for health record lookups. The record id is appended
/// after a `/`, so the trailing slash here yields `//` in the final URL.
pub const DEFAULT_HEALTH_RECORDS_URL: &str =
    formatcp!("https://{}/health-records/", HEALTH_RECORDS_HOST);

/// Graceful shutdown drain period in seconds
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default SQLite database path
pub const DEFAULT_STORE_PATH: &str = "data/recommendations.db";

/// Default table holding stored recommendations
pub const DEFAULT_STORE_TABLE: &str = "Recommondations";

/// Log target of this crate
pub const LOG_TARGET: &str = "vitals_advisor";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=debug", LOG_TARGET);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Health records service
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Recommendation persistence
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub tls: TlsConfig,
}

/// TLS mode for the HTTP listener
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, for development or behind a TLS-terminating proxy
    #[default]
    None,
    /// User-provided PEM certificate and key
    Manual,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Health records service settings
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL; `/<recordId>` is appended verbatim
    #[serde(default = "UpstreamConfig::default_base_url")]
    pub base_url: String,
    /// Overall request timeout. Unset means wait for the upstream indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl UpstreamConfig {
    fn default_base_url() -> String {
        DEFAULT_HEALTH_RECORDS_URL.to_string()
    }
}

/// Which store implementation backs recommendation persistence
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    /// Process-local, lost on restart
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "StoreConfig::default_path")]
    pub path: String,
    #[serde(default = "StoreConfig::default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: Self::default_path(),
            table: Self::default_table(),
        }
    }
}

impl StoreConfig {
    fn default_path() -> String {
        DEFAULT_STORE_PATH.to_string()
    }

    fn default_table() -> String {
        DEFAULT_STORE_TABLE.to_string()
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

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.tls.mode == TlsMode::Manual
            && (self.http.tls.cert_path.is_none() || self.http.tls.key_path.is_none())
        {
            return Err(ConfigError::Validation(
                "TLS mode 'manual' requires http.tls.cert_path and http.tls.key_path".to_string(),
            ));
        }

        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "upstream.base_url must not be empty".to_string(),
            ));
        }

        // Table name is interpolated into SQL, so only plain identifiers are allowed
        if !is_valid_table_name(&self.store.table) {
            return Err(ConfigError::Validation(format!(
                "store.table '{}' must contain only ASCII letters, digits and underscores",
                self.store.table
            )));
        }

        Ok(())
    }
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
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
