//! Mock implementations of session providers for testing
//!
//! These mocks let command handlers run end to end without a terminal,
//! a network or a real clock.

use crate::api::provider::ProviderSet;
use crate::application::config::AppConfig;
use crate::application::session::{ClockProvider, ConfigProvider, InteractiveProvider, Session};
use crate::display::{DisplayProvider, MockDisplayProvider};
use crate::store::{LibrarySnapshot, LibraryStore, SaveOutcome, StoreError};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock configuration provider
pub struct MockConfigProvider {
    app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Recorded `select` prompt
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCall {
    pub prompt: String,
    pub options: Vec<String>,
}

/// Mock interactive provider with scripted answers
///
/// Selections are answered in order; once the script runs out every
/// further prompt is cancelled.
#[derive(Clone, Default)]
pub struct MockInteractiveProvider {
    select_responses: Arc<Mutex<VecDeque<Option<usize>>>>,
    confirm_response: Arc<Mutex<Option<bool>>>,
    select_calls: Arc<Mutex<Vec<SelectCall>>>,
    confirm_calls: Arc<Mutex<Vec<(String, bool)>>>,
}

impl MockInteractiveProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_select(self, response: usize) -> Self {
        self.select_responses
            .lock()
            .unwrap()
            .push_back(Some(response));
        self
    }

    pub fn with_cancelled_select(self) -> Self {
        self.select_responses.lock().unwrap().push_back(None);
        self
    }

    pub fn with_confirm(self, response: bool) -> Self {
        *self.confirm_response.lock().unwrap() = Some(response);
        self
    }

    pub fn get_select_calls(&self) -> Vec<SelectCall> {
        self.select_calls.lock().unwrap().clone()
    }

    pub fn get_confirm_calls(&self) -> Vec<(String, bool)> {
        self.confirm_calls.lock().unwrap().clone()
    }
}

impl InteractiveProvider for MockInteractiveProvider {
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        self.select_calls.lock().unwrap().push(SelectCall {
            prompt: prompt.to_string(),
            options: options.to_vec(),
        });

        let response = self.select_responses.lock().unwrap().pop_front().flatten();
        Ok(response.filter(|index| *index < options.len()))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.confirm_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), default));
        Ok(self.confirm_response.lock().unwrap().unwrap_or(default))
    }
}

/// Clock that only moves when told to
#[derive(Clone)]
pub struct MockClockProvider {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClockProvider {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Default for MockClockProvider {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }
}

impl ClockProvider for MockClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// In-memory library store
#[derive(Clone, Default)]
pub struct MemoryStore {
    libraries: Arc<Mutex<HashMap<String, LibrarySnapshot>>>,
    failing: Arc<Mutex<Option<String>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(self, user: &str, snapshot: LibrarySnapshot) -> Self {
        self.libraries
            .lock()
            .unwrap()
            .insert(user.to_string(), snapshot);
        self
    }

    /// Make every load and save fail with `message`
    pub fn with_failure(self, message: &str) -> Self {
        *self.failing.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn snapshot(&self, user: &str) -> LibrarySnapshot {
        self.libraries
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failing.lock().unwrap().clone() {
            Some(message) => Err(StoreError::Unavailable { message }),
            None => Ok(()),
        }
    }
}

impl LibraryStore for MemoryStore {
    fn load(&self, user: &str) -> Result<LibrarySnapshot, StoreError> {
        self.check()?;
        Ok(self.snapshot(user))
    }

    fn save(&self, user: &str, snapshot: &LibrarySnapshot) -> Result<SaveOutcome, StoreError> {
        self.check()?;
        *self.saves.lock().unwrap() += 1;
        self.libraries
            .lock()
            .unwrap()
            .insert(user.to_string(), snapshot.clone());
        Ok(SaveOutcome::Saved)
    }

    fn location(&self, user: &str) -> String {
        format!("memory:{}", user)
    }
}

/// Mock command session for testing
pub struct MockCommandSession {
    pub display_provider: MockDisplayProvider,
    pub config_provider: MockConfigProvider,
    pub interactive_provider: MockInteractiveProvider,
    pub clock_provider: MockClockProvider,
    pub store: Box<dyn LibraryStore>,
    pub providers: ProviderSet,
    pub jobs: usize,
}

impl MockCommandSession {
    pub fn new() -> Self {
        Self {
            display_provider: MockDisplayProvider::new(),
            config_provider: MockConfigProvider::new(AppConfig::default()),
            interactive_provider: MockInteractiveProvider::new(),
            clock_provider: MockClockProvider::default(),
            store: Box::new(MemoryStore::new()),
            providers: ProviderSet::new(),
            jobs: 4,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config_provider = MockConfigProvider::new(config);
        self
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive_provider = interactive;
        self
    }

    pub fn with_clock(mut self, clock: MockClockProvider) -> Self {
        self.clock_provider = clock;
        self
    }

    pub fn with_store(mut self, store: impl LibraryStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_providers(mut self, providers: ProviderSet) -> Self {
        self.providers = providers;
        self
    }

    /// The recording display, for assertions
    pub fn display_calls(&self) -> &MockDisplayProvider {
        &self.display_provider
    }
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for MockCommandSession {
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
        self.store.as_ref()
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
    use super::*;

    #[test]
    fn test_scripted_selects_run_in_order_then_cancel() {
        let interactive = MockInteractiveProvider::new()
            .with_select(1)
            .with_cancelled_select();
        let options = vec!["a".to_string(), "b".to_string()];

        assert_eq!(interactive.select("pick", &options).unwrap(), Some(1));
        assert_eq!(interactive.select("pick", &options).unwrap(), None);
        assert_eq!(interactive.select("pick", &options).unwrap(), None);
        assert_eq!(interactive.get_select_calls().len(), 3);
    }

    #[test]
    fn test_out_of_range_select_is_cancelled() {
        let interactive = MockInteractiveProvider::new().with_select(5);
        assert_eq!(
            interactive.select("pick", &["only".to_string()]).unwrap(),
            None
        );
    }

    #[test]
    fn test_confirm_defaults_without_script() {
        let interactive = MockInteractiveProvider::new();
        assert!(interactive.confirm("sure?", true).unwrap());

        let interactive = interactive.with_confirm(false);
        assert!(!interactive.confirm("sure?", true).unwrap());
    }

    #[test]
    fn test_clock_advances_shared_time() {
        let clock = MockClockProvider::default();
        let other = clock.clone();
        let start = clock.now();

        other.advance(TimeDelta::seconds(31));
        assert_eq!(clock.now() - start, TimeDelta::seconds(31));
    }

    #[test]
    fn test_memory_store_round_trip_and_failure() {
        let store = MemoryStore::new();
        let snapshot = LibrarySnapshot::default();

        assert_eq!(store.save("ana", &snapshot).unwrap(), SaveOutcome::Saved);
        assert_eq!(store.save_count(), 1);
        assert!(store.load("ana").unwrap().items.is_empty());

        let broken = MemoryStore::new().with_failure("offline");
        assert!(matches!(
            broken.load("ana"),
            Err(StoreError::Unavailable { .. })
        ));
    }
}
