//! Hermetic test environment for E2E testing
//!
//! A [`TestEnvironment`] owns a temporary data directory (and the local
//! cache beside it). Sessions built from it use the real JSON stores, so
//! a library written by one command is what the next session loads.
//! Providers, prompts and the clock stay mocked.

use anyhow::{Context, Result};
use chrono::TimeDelta;
use mediashelf_lib::api::mock::{MockMetadataProvider, MockTrendingProvider};
use mediashelf_lib::api::provider::ProviderSet;
use mediashelf_lib::application::config::AppConfig;
use mediashelf_lib::application::session::live_store;
use mediashelf_lib::application::session_mocks::{
    MockClockProvider, MockCommandSession, MockInteractiveProvider,
};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// User id every hermetic session runs as
pub const TEST_USER: &str = "tester";

/// Hermetic test environment with its own data directory
pub struct TestEnvironment {
    /// Temporary directory for the test environment
    pub temp_dir: TempDir,
    /// Primary library directory
    pub data_dir: PathBuf,
    /// Local cache copy of the library
    pub cache_dir: PathBuf,
    /// Clock shared by every session built from this environment
    pub clock: MockClockProvider,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let data_dir = temp_dir.path().join("data");
        let cache_dir = temp_dir.path().join("cache");

        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            temp_dir,
            data_dir,
            cache_dir,
            clock: MockClockProvider::default(),
        })
    }

    /// Configuration pointing at this environment's directories
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            data_dir: Some(self.data_dir.clone()),
            cache_dir: Some(self.cache_dir.clone()),
            user: TEST_USER.to_string(),
            ..AppConfig::default()
        }
    }

    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", TEST_USER))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", TEST_USER))
    }

    /// The persisted library document, as written by the store
    pub fn read_library(&self) -> Result<Value> {
        let path = self.library_path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Titles of the persisted records, in stored order
    pub fn stored_titles(&self) -> Result<Vec<String>> {
        let document = self.read_library()?;
        let titles = document["items"]
            .as_array()
            .context("library document has no items array")?
            .iter()
            .filter_map(|item| item["title"].as_str().map(str::to_string))
            .collect();
        Ok(titles)
    }

    /// Overwrite the primary library file with raw content
    pub fn write_library_raw(&self, content: &str) -> Result<()> {
        fs::write(self.library_path(), content)?;
        Ok(())
    }

    /// Move the shared clock forward
    pub fn advance(&self, delta: TimeDelta) {
        self.clock.advance(delta);
    }

    /// Start building a session over this environment
    pub fn session(&self) -> HermeticSessionBuilder {
        HermeticSessionBuilder::new(self.app_config(), self.clock.clone())
    }
}

/// Builder for hermetic sessions with coordinated mock providers
pub struct HermeticSessionBuilder {
    app_config: AppConfig,
    clock: MockClockProvider,
    providers: ProviderSet,
    interactive: MockInteractiveProvider,
}

impl HermeticSessionBuilder {
    fn new(app_config: AppConfig, clock: MockClockProvider) -> Self {
        Self {
            app_config,
            clock,
            providers: ProviderSet::new(),
            interactive: MockInteractiveProvider::new(),
        }
    }

    pub fn with_provider(mut self, provider: MockMetadataProvider) -> Self {
        self.providers = self.providers.with_provider(Arc::new(provider));
        self
    }

    pub fn with_trending(mut self, trending: MockTrendingProvider) -> Self {
        self.providers = self.providers.with_trending(Arc::new(trending));
        self
    }

    /// Replace the whole provider set, e.g. with live clients on a mock server
    pub fn with_providers(mut self, providers: ProviderSet) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_undo_window(mut self, seconds: u64) -> Self {
        self.app_config.undo_window = seconds;
        self
    }

    pub fn build(self) -> Result<MockCommandSession> {
        let store = live_store(&self.app_config)?;

        Ok(MockCommandSession::new()
            .with_config(self.app_config)
            .with_clock(self.clock)
            .with_interactive(self.interactive)
            .with_providers(self.providers)
            .with_store(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediashelf_lib::application::session::ClockProvider;

    #[test]
    fn test_environment_creation() {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        assert!(env.data_dir.exists());
        assert!(!env.library_path().exists());
        assert!(env.library_path().starts_with(env.temp_dir.path()));
    }

    #[test]
    fn test_sessions_share_the_clock() {
        let env = TestEnvironment::new().unwrap();
        let first = env.session().build().unwrap();
        let second = env.session().build().unwrap();
        let start = first.clock_provider.now();

        env.advance(TimeDelta::seconds(5));

        assert_eq!(second.clock_provider.now() - start, TimeDelta::seconds(5));
    }
}
