//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; secrets such as the admin token
//! and the identity service key come from environment variables only.
//!
//! # Example
//!
//! ```no_run
//! use studiodesk::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::service::{
    AttendanceConfig, IdentityConfig, IdentityProviderKind, ServerConfig, SweepConfig,
};
use crate::error::{ConfigError, Result};

/// Environment variable holding the bearer token for the admin endpoints.
pub const ADMIN_TOKEN_ENV: &str = "STUDIODESK_ADMIN_TOKEN";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: String,

    #[serde(default)]
    pub server: ServerConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    /// Check-in window and upcoming view.
    #[serde(default)]
    pub attendance: AttendanceConfig,

    /// Package expiration sweep.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Loaded from [`ADMIN_TOKEN_ENV`]. When unset the admin endpoints are
    /// open, which is only appropriate behind a trusted proxy.
    #[serde(skip)]
    pub admin_token: Option<String>,
}

fn default_database_path() -> String {
    "studiodesk.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            identity: IdentityConfig::default(),
            attendance: AttendanceConfig::default(),
            sweep: SweepConfig::default(),
            admin_token: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Never from the config file.
        config.admin_token = std::env::var(ADMIN_TOKEN_ENV)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind",
                reason: format!("'{}' is not a socket address", self.server.bind),
            }
            .into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be 'pretty' or 'json'".to_string(),
            }
            .into());
        }
        if self.identity.provider == IdentityProviderKind::Hosted {
            match self.identity.url.as_deref().map(str::trim) {
                None | Some("") => {
                    return Err(ConfigError::MissingField {
                        field: "identity.url",
                    }
                    .into())
                }
                Some(url) => {
                    url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                        field: "identity.url",
                        reason: e.to_string(),
                    })?;
                }
            }
        }
        if self.attendance.check_in_lead_minutes < 0 {
            return Err(ConfigError::InvalidValue {
                field: "attendance.check_in_lead_minutes",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.attendance.upcoming_window_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "attendance.upcoming_window_days",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.database, "studiodesk.db");
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.identity.provider, IdentityProviderKind::Local);
        assert_eq!(config.attendance.check_in_lead_minutes, 60);
        assert_eq!(config.sweep.interval_secs, 3600);
    }

    #[test]
    fn hosted_identity_requires_url() {
        let err = Config::parse_toml("[identity]\nprovider = \"hosted\"\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                field: "identity.url"
            })
        ));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = Config::parse_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "logging.format",
                ..
            })
        ));
    }

    #[test]
    fn sweep_zero_disables_the_task() {
        let config = Config::parse_toml("[sweep]\ninterval_secs = 0\n").unwrap();
        assert!(config.sweep.interval().is_none());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("database = [").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
