//! Application configuration.
//!
//! Fixed analysis constants plus the server settings, which can be
//! overridden from the environment (a `.env` file is loaded by the CLI).

use std::env;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum accepted upload size (in bytes).
///
/// 16 MB limit.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// p-value threshold below which the ANOVA result is reported as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Capacity of the log broadcast channel.
pub const LOG_CHANNEL_CAPACITY: usize = 100;

/// Environment variable overriding the server port.
pub const PORT_ENV: &str = "WEATHERSTAT_PORT";

/// Environment variable overriding the upload size limit.
pub const MAX_UPLOAD_ENV: &str = "WEATHERSTAT_MAX_UPLOAD_BYTES";

/// Settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from the process environment.
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup(PORT_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            max_upload_bytes: lookup(MAX_UPLOAD_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    /// Replace the port, keeping the other settings.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
