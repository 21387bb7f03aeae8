//! Configuration loading
//!
//! Coordinates the configuration sources in precedence order:
//! defaults -> `.env.local`/`.env` -> environment -> CLI arguments.

use crate::primitives::ConfigError;
use clap::Parser;

use super::cli::{Cli, CliConfig};
use super::config::AppConfig;
use super::env::EnvironmentConfig;

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

impl AppConfig {
    /// Load `.env.local` and `.env` into the process environment
    ///
    /// Missing files are fine; unreadable or malformed ones are not. Must
    /// run before argument parsing so clap's `env` fallbacks see them.
    pub fn load_env_files() -> Result<(), ConfigError> {
        for env_file in ENV_FILES {
            if let Err(e) = dotenvy::from_filename(env_file) {
                if !e.not_found() {
                    return Err(ConfigError::EnvFileError {
                        file: env_file.to_string(),
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    /// Layer parsed CLI values over defaults and the color environment
    pub fn resolve(cli: AppConfig) -> Result<Self, ConfigError> {
        Self::resolve_with_env(cli, &EnvironmentConfig::load()?)
    }

    /// [`resolve`](Self::resolve) with an explicit environment
    pub fn resolve_with_env(
        cli: AppConfig,
        env_config: &EnvironmentConfig,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.color = env_config.apply_color_config(config.color);

        // CLI (and clap's env fallbacks) have the final say
        let mut config = config.merge_with(cli);
        config.validate()?;
        Ok(config)
    }
}

impl CliConfig {
    /// Parse the command line into a validated configuration and command
    pub fn load() -> Result<Self, ConfigError> {
        AppConfig::load_env_files()?;
        let cli = Cli::parse();
        Ok(Self {
            app_config: AppConfig::resolve(cli.config)?,
            command: cli.command,
        })
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
