//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the engine URL.
pub const BASE_URL_ENV: &str = "CHECKERS_API_URL";

/// Settings for the checkers client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct ClientConfig {
    /// Engine root, e.g. `http://localhost:5260/api/checkers`.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    request_timeout_ms: u64,

    /// Name sent for the first (Black) player.
    #[serde(default = "default_player1")]
    player1: String,

    /// Name sent for the second (Red) player.
    #[serde(default = "default_player2")]
    player2: String,

    /// Where logs go while the TUI owns the terminal.
    #[serde(default = "default_log_file")]
    log_file: String,
}

#[instrument]
fn default_base_url() -> String {
    "http://localhost:5260/api/checkers".to_string()
}

#[instrument]
fn default_timeout_ms() -> u64 {
    5000
}

#[instrument]
fn default_player1() -> String {
    "Black".to_string()
}

#[instrument]
fn default_player2() -> String {
    "Red".to_string()
}

#[instrument]
fn default_log_file() -> String {
    "strictly_checkers.log".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_timeout_ms(),
            player1: default_player1(),
            player2: default_player2(),
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise defaults, then applies the
    /// environment override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };
        Ok(config.apply_env())
    }

    /// Applies [`BASE_URL_ENV`] when set.
    #[instrument(skip(self))]
    pub fn apply_env(self) -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                debug!(%url, "Engine URL taken from environment");
                self.with_base_url(url)
            }
            _ => self,
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
