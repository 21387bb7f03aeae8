//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::networking::NetworkingConfig;
use crate::primitives::*;
use crate::store::validate_user;
use chrono::TimeDelta;
use clap::Parser;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    pub const USER: &str = "default";
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const NET_TIMEOUT: &str = "15";
    pub const UNDO_WINDOW: &str = "30";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn user() -> String {
        defaults::USER.to_string()
    }

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn net_timeout() -> u64 {
        15
    }

    pub fn undo_window() -> u64 {
        crate::library::state::DEFAULT_UNDO_WINDOW_SECS
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorIntent {
        ColorIntent::Auto
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Directory holding one library file per user
    #[arg(short, long, env = "MEDIASHELF_DATA_DIR")]
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the local fallback copy of each library
    #[arg(long, env = "MEDIASHELF_CACHE_DIR")]
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Library owner; selects the library file
    #[arg(short, long, env = "MEDIASHELF_USER", default_value = defaults::USER)]
    #[serde(default = "default_fns::user")]
    pub user: String,

    /// Maximum concurrent provider requests
    #[arg(short, long, env = "MEDIASHELF_JOBS")]
    #[serde(default)]
    pub jobs: Option<u32>,

    /// Provider request timeout in seconds
    #[arg(long, env = "MEDIASHELF_NET_TIMEOUT", default_value = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// Seconds a removed record can be restored with `undo`
    #[arg(long, env = "MEDIASHELF_UNDO_WINDOW", default_value = defaults::UNDO_WINDOW)]
    #[serde(default = "default_fns::undo_window")]
    pub undo_window: u64,

    /// TMDB API key (film and TV metadata)
    #[arg(long, env = "MEDIASHELF_TMDB_API_KEY", hide_env_values = true)]
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// RAWG API key (game metadata)
    #[arg(long, env = "MEDIASHELF_RAWG_API_KEY", hide_env_values = true)]
    #[serde(default)]
    pub rawg_api_key: Option<String>,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "MEDIASHELF_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Log format (text, json, yaml)
    #[arg(long, env = "MEDIASHELF_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "MEDIASHELF_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "MEDIASHELF_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color")]
    pub color: ColorIntent,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cache_dir: None,
            user: default_fns::user(),
            jobs: None,
            net_timeout: default_fns::net_timeout(),
            undo_window: default_fns::undo_window(),
            tmdb_api_key: None,
            rawg_api_key: None,
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            color: self.color.resolve(),
        }
    }

    pub fn networking_config(&self) -> NetworkingConfig {
        NetworkingConfig {
            max_jobs: self.jobs,
            timeout_seconds: self.net_timeout,
        }
    }

    pub fn restore_window(&self) -> TimeDelta {
        TimeDelta::seconds(self.undo_window.min(i64::MAX as u64) as i64)
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        // For Option fields, take other if it's Some
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.cache_dir.is_some() {
            self.cache_dir = other.cache_dir;
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
        if other.tmdb_api_key.is_some() {
            self.tmdb_api_key = other.tmdb_api_key;
        }
        if other.rawg_api_key.is_some() {
            self.rawg_api_key = other.rawg_api_key;
        }

        // For primitive fields, take other if it's not the default
        if other.user != default_fns::user() {
            self.user = other.user;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }
        if other.undo_window != default_fns::undo_window() {
            self.undo_window = other.undo_window;
        }

        // For enums, detect if it's non-default
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration and resolve directories
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.jobs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                reason: "jobs must be greater than 0".to_string(),
            });
        }
        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "net-timeout must be greater than 0".to_string(),
            });
        }
        validate_user(&self.user).map_err(|e| ConfigError::ValidationFailed {
            reason: e.to_string(),
        })?;

        // Blank keys from an empty env var count as unset
        for key in [&mut self.tmdb_api_key, &mut self.rawg_api_key] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }

        if self.data_dir.is_none() {
            self.data_dir = Some(
                ProjectDirs::from("", "", "mediashelf")
                    .map(|dirs| dirs.data_dir().to_path_buf())
                    .ok_or(ConfigError::MissingDataDir)?,
            );
        }
        if self.cache_dir.is_none() {
            self.cache_dir = self.data_dir.as_ref().map(|dir| dir.join("cache"));
        }

        Ok(())
    }
}
