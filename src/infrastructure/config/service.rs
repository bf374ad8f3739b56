//! Service configuration for the HTTP server, identity provider, attendance
//! rules and the expiration sweep.

use chrono::Duration;
use serde::Deserialize;

use crate::application::AttendancePolicy;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allow any origin. Leave off unless a browser client is served from
    /// another host.
    #[serde(default)]
    pub cors_permissive: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: false,
        }
    }
}

/// Which identity provider backs student accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderKind {
    /// In-process provider, for development and tests.
    #[default]
    Local,
    /// GoTrue-compatible hosted auth service.
    Hosted,
}

/// Identity provider settings.
///
/// The service role key for the hosted provider is read from
/// `STUDIODESK_SERVICE_ROLE_KEY` at startup, never from this file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub provider: IdentityProviderKind,
    /// Base URL of the hosted auth service.
    #[serde(default)]
    pub url: Option<String>,
}

/// Check-in and upcoming-class settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    #[serde(default = "default_check_in_lead_minutes")]
    pub check_in_lead_minutes: i64,
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
}

const fn default_check_in_lead_minutes() -> i64 {
    crate::domain::class::DEFAULT_CHECK_IN_LEAD_MINUTES
}

const fn default_upcoming_window_days() -> i64 {
    7
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            check_in_lead_minutes: default_check_in_lead_minutes(),
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}

impl From<&AttendanceConfig> for AttendancePolicy {
    fn from(config: &AttendanceConfig) -> Self {
        Self {
            check_in_lead: Duration::minutes(config.check_in_lead_minutes),
            upcoming_window: Duration::days(config.upcoming_window_days),
        }
    }
}

/// Background expiration sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Seconds between sweeps; 0 disables the background task.
    #[serde(default = "default_sweep_interval_secs")]
    pub interval_secs: u64,
}

const fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub fn interval(&self) -> Option<std::time::Duration> {
        (self.interval_secs > 0).then(|| std::time::Duration::from_secs(self.interval_secs))
    }
}
