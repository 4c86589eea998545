//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub alerts: AlertSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Monitor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSection {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Expected sensor cadence; also sets the default stale cutoff
    #[serde(default = "default_reading_interval")]
    pub reading_interval_secs: u64,

    /// Explicit stale cutoff; omitted means two reading intervals
    #[serde(default)]
    pub stale_after_secs: Option<u64>,
}

fn default_history_capacity() -> usize {
    24 // two hours at one reading per five minutes
}

fn default_reading_interval() -> u64 {
    300 // 5 minutes
}

impl MonitorSection {
    /// Seconds without a reading before the sensor is reported stale.
    ///
    /// When no explicit cutoff is configured this is two reading
    /// intervals: one missed cycle plus a grace period.
    pub fn stale_after_secs(&self) -> u64 {
        self.stale_after_secs
            .unwrap_or(2 * self.reading_interval_secs)
    }
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            reading_interval_secs: default_reading_interval(),
            stale_after_secs: None,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_enable_export")]
    pub enable_export: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

fn default_enable_export() -> bool {
    true
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            enable_export: default_enable_export(),
        }
    }
}

/// Alert log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlertSection {
    #[serde(default = "default_alert_capacity")]
    pub capacity: usize,
}

fn default_alert_capacity() -> usize {
    100
}

impl Default for AlertSection {
    fn default() -> Self {
        Self {
            capacity: default_alert_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("glucowatch").join("config.toml")),
            Some(PathBuf::from("/etc/glucowatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Monitor overrides
        if let Ok(capacity) = std::env::var("GLUCOWATCH_HISTORY_CAPACITY") {
            if let Ok(c) = capacity.parse() {
                self.monitor.history_capacity = c;
            }
        }
        if let Ok(interval) = std::env::var("GLUCOWATCH_READING_INTERVAL_SECS") {
            if let Ok(i) = interval.parse() {
                self.monitor.reading_interval_secs = i;
            }
        }

        // API overrides
        if let Ok(host) = std::env::var("GLUCOWATCH_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("GLUCOWATCH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("GLUCOWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GLUCOWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorSection::default(),
            api: ApiSection::default(),
            alerts: AlertSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Glucowatch Configuration
#
# Environment variables override these settings:
# - GLUCOWATCH_HISTORY_CAPACITY
# - GLUCOWATCH_READING_INTERVAL_SECS
# - GLUCOWATCH_API_HOST
# - GLUCOWATCH_API_PORT
# - GLUCOWATCH_LOG_LEVEL
# - GLUCOWATCH_LOG_FORMAT

[monitor]
# How many readings to keep in memory
history_capacity = 24

# Seconds between sensor readings
reading_interval_secs = 300

# Sensor is reported stale after this many seconds without a reading.
# Defaults to two reading intervals when left unset.
# stale_after_secs = 600

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty = allow all)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

# Enable the data export endpoint
enable_export = true

[alerts]
# How many alert events to keep in memory
capacity = 100

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/glucowatch/glucowatch.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.monitor.history_capacity, 24);
        assert_eq!(config.monitor.reading_interval_secs, 300);
        assert_eq!(config.monitor.stale_after_secs(), 600);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 8090);
        assert!(config.api.cors_origins.is_empty());
        assert!(config.api.enable_export);
        assert_eq!(config.alerts.capacity, 100);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[monitor]
history_capacity = 48
reading_interval_secs = 60
stale_after_secs = 120

[api]
host = "127.0.0.1"
port = 9001
cors_origins = ["http://localhost:3000"]
enable_export = false

[alerts]
capacity = 10

[logging]
level = "debug"
format = "json"
file = "/tmp/glucowatch.log"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.monitor.history_capacity, 48);
        assert_eq!(config.monitor.reading_interval_secs, 60);
        assert_eq!(config.monitor.stale_after_secs(), 120);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.api.port, 9001);
        assert_eq!(config.api.cors_origins, vec!["http://localhost:3000"]);
        assert!(!config.api.enable_export);
        assert_eq!(config.alerts.capacity, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/glucowatch.log"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[api]
port = 9100
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.port, 9100);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.monitor.history_capacity, 24);
        assert_eq!(config.alerts.capacity, 100);
    }

    #[test]
    fn test_stale_cutoff_defaults_to_two_reading_intervals() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[monitor]
reading_interval_secs = 60
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.monitor.stale_after_secs(), 120);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[monitor]
reading_interval_secs = 60
stale_after_secs = 45
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.monitor.stale_after_secs(), 45);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/glucowatch.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not toml [[[").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_generated_config_parses() {
        let generated = generate_default_config();
        let config: Config = toml::from_str(&generated).unwrap();

        assert_eq!(config.api.port, 8090);
        assert_eq!(config.monitor.history_capacity, 24);
    }
}
