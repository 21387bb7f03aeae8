//! Command session architecture
//!
//! Each command execution creates a session that owns everything the
//! command touches: configuration, display, prompts, the clock, the library
//! store and the metadata providers. Handlers only see `&dyn Session`, so
//! tests swap any of these for mocks.

use crate::api::jikan::JikanProvider;
use crate::api::provider::ProviderSet;
use crate::api::rawg::RawgProvider;
use crate::api::tmdb::TmdbProvider;
use crate::application::config::AppConfig;
use crate::display::{DisplayProvider, LiveDisplayProvider};
use crate::logger::Logger;
use crate::networking::NetworkingManager;
use crate::store::{FallbackStore, JsonFileStore, LibraryStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Provider trait for configuration access
pub trait ConfigProvider {
    fn app_config(&self) -> &AppConfig;
}

/// Provider trait for interactive user input
pub trait InteractiveProvider {
    /// Choose one of `options`; `None` when the user cancels or no
    /// terminal is attached
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>>;

    /// Yes/no question; `default` when no terminal is attached
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Provider trait for the current time
pub trait ClockProvider {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for finish dates
    fn today(&self) -> NaiveDate;
}

/// Session trait implemented by live and mock sessions
pub trait Session {
    fn display(&self) -> &dyn DisplayProvider;

    fn config(&self) -> &dyn ConfigProvider;

    fn interactive(&self) -> &dyn InteractiveProvider;

    fn clock(&self) -> &dyn ClockProvider;

    fn store(&self) -> &dyn LibraryStore;

    fn providers(&self) -> &ProviderSet;

    /// Concurrency bound for provider fan-out
    fn jobs(&self) -> usize;
}

pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

pub struct LiveInteractiveProvider;

impl LiveInteractiveProvider {
    fn is_tty() -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
    }
}

impl InteractiveProvider for LiveInteractiveProvider {
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        if options.is_empty() || !Self::is_tty() {
            return Ok(None);
        }

        use dialoguer::Select;

        Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()
            .context("Failed to read selection")
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if !Self::is_tty() {
            return Ok(default);
        }

        use dialoguer::Confirm;

        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("Failed to read confirmation")
    }
}

pub struct LiveClockProvider;

impl ClockProvider for LiveClockProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Register every provider the configuration has credentials for
///
/// Jikan needs no key and is always present. TMDB also serves trending
/// lists. Books never have a provider.
pub fn live_providers(config: &AppConfig, client: &Client) -> ProviderSet {
    let mut providers =
        ProviderSet::new().with_provider(Arc::new(JikanProvider::new(client.clone())));

    if let Some(key) = &config.tmdb_api_key {
        let tmdb = Arc::new(TmdbProvider::new(client.clone(), key.clone()));
        providers = providers.with_provider(tmdb.clone()).with_trending(tmdb);
    }
    if let Some(key) = &config.rawg_api_key {
        providers = providers.with_provider(Arc::new(RawgProvider::new(client.clone(), key.clone())));
    }

    debug!("Registered providers: {}", providers.names().join(", "));
    providers
}

/// Primary data directory with a local cache copy behind it
pub type LiveStore = FallbackStore<JsonFileStore, JsonFileStore>;

pub fn live_store(config: &AppConfig) -> Result<LiveStore> {
    let data_dir = config
        .data_dir
        .clone()
        .context("No data directory configured")?;
    let cache_dir = config
        .cache_dir
        .clone()
        .unwrap_or_else(|| data_dir.join("cache"));
    Ok(FallbackStore::new(
        JsonFileStore::new(data_dir),
        JsonFileStore::new(cache_dir),
    ))
}

/// CommandSession owns all ephemeral state for a single command execution
pub struct CommandSession<C, I, K, S>
where
    C: ConfigProvider,
    I: InteractiveProvider,
    K: ClockProvider,
    S: LibraryStore,
{
    display_provider: LiveDisplayProvider,
    config_provider: C,
    interactive_provider: I,
    clock_provider: K,
    store: S,
    providers: ProviderSet,
    jobs: usize,
}

impl CommandSession<LiveConfigProvider, LiveInteractiveProvider, LiveClockProvider, LiveStore> {
    /// Create a new command session with owned state (production composition)
    pub fn new(app_config: AppConfig) -> Result<Self> {
        let logger_config = app_config.to_logger_config();
        let color = logger_config.color;
        // A second session in the same process keeps the first subscriber
        let _ = Logger::init(logger_config);

        let networking = NetworkingManager::new(app_config.networking_config())
            .context("Failed to set up HTTP client")?;
        let providers = live_providers(&app_config, networking.client());
        let store = live_store(&app_config)?;

        Ok(Self {
            display_provider: LiveDisplayProvider::new(color),
            config_provider: LiveConfigProvider::new(app_config),
            interactive_provider: LiveInteractiveProvider,
            clock_provider: LiveClockProvider,
            store,
            providers,
            jobs: networking.jobs() as usize,
        })
    }
}

impl<C, I, K, S> CommandSession<C, I, K, S>
where
    C: ConfigProvider,
    I: InteractiveProvider,
    K: ClockProvider,
    S: LibraryStore,
{
    /// Create a session from custom providers (for testing)
    #[cfg(feature = "test-utils")]
    pub fn new_with_providers(
        config_provider: C,
        interactive_provider: I,
        clock_provider: K,
        store: S,
        providers: ProviderSet,
        jobs: usize,
    ) -> Self {
        Self {
            display_provider: LiveDisplayProvider::new(false),
            config_provider,
            interactive_provider,
            clock_provider,
            store,
            providers,
            jobs: jobs.max(1),
        }
    }
}

impl<C, I, K, S> Session for CommandSession<C, I, K, S>
where
    C: ConfigProvider,
    I: InteractiveProvider,
    K: ClockProvider,
    S: LibraryStore,
{
    fn display(&self) -> &dyn DisplayProvider {
        &self.display_provider
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }

    fn interactive(&self) -> &dyn InteractiveProvider {
        &self.interactive_provider
    }

    fn clock(&self) -> &dyn ClockProvider {
        &self.clock_provider
    }

    fn store(&self) -> &dyn LibraryStore {
        &self.store
    }

    fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    fn jobs(&self) -> usize {
        self.jobs
    }
}

#[cfg(test)]
mod tests {
    include!("session.test.rs");
}
