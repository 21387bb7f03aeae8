//! Debounced search-as-you-type
//!
//! Every query change bumps a generation counter and waits out a quiet
//! period. Only the latest generation reaches the provider, and a response
//! is only applied if the search key (kind plus normalized query) still
//! matches when it arrives. A slow response for an old query can therefore
//! never overwrite the suggestions for the current one.

use crate::api::provider::ProviderSet;
use crate::api::ranked_search::{search_as_you_type, search_failure_message};
use crate::library::fuzzy::normalize_title;
use crate::library::suggest::{Suggestions, query_is_rankable};
use crate::primitives::MediaKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// Quiet period between the last keystroke and the provider call
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(250);

/// Identity of a search, used to detect stale responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    pub kind: MediaKind,
    pub query: String,
}

impl SearchKey {
    pub fn new(kind: MediaKind, query: &str) -> Self {
        Self {
            kind,
            query: normalize_title(query),
        }
    }
}

/// What happened to one query change
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// A newer query arrived first; nothing was applied
    Superseded,
    /// Suggestions for this query are now current
    Updated(Suggestions),
    /// The provider failed; suggestions were cleared
    Failed(String),
}

#[derive(Debug, Default)]
struct FeedState {
    key: Option<SearchKey>,
    suggestions: Suggestions,
}

/// Debounced, staleness-checked suggestion source
pub struct SuggestionFeed {
    providers: ProviderSet,
    quiet_period: Duration,
    generation: AtomicU64,
    state: Mutex<FeedState>,
}

impl SuggestionFeed {
    pub fn new(providers: ProviderSet) -> Self {
        Self {
            providers,
            quiet_period: DEFAULT_QUIET_PERIOD,
            generation: AtomicU64::new(0),
            state: Mutex::new(FeedState::default()),
        }
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// Suggestions for the most recently applied query
    pub async fn suggestions(&self) -> Suggestions {
        self.state.lock().await.suggestions.clone()
    }

    pub async fn current_key(&self) -> Option<SearchKey> {
        self.state.lock().await.key.clone()
    }

    /// Handle a change of the live query text
    ///
    /// Resolves once this change has been applied, superseded or has failed.
    pub async fn query_changed(&self, kind: MediaKind, query: &str) -> FeedOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let key = SearchKey::new(kind, query);

        {
            let mut state = self.state.lock().await;
            state.key = Some(key.clone());
            if !query_is_rankable(query) {
                state.suggestions = Suggestions::default();
                return FeedOutcome::Updated(Suggestions::default());
            }
        }

        tokio::time::sleep(self.quiet_period).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            trace!("Query generation {} superseded before lookup", generation);
            return FeedOutcome::Superseded;
        }

        let result = search_as_you_type(&self.providers, kind, query).await;

        let mut state = self.state.lock().await;
        if state.key.as_ref() != Some(&key) {
            debug!("Dropping stale response for '{}'", key.query);
            return FeedOutcome::Superseded;
        }

        match result {
            Ok(suggestions) => {
                state.suggestions = suggestions.clone();
                FeedOutcome::Updated(suggestions)
            }
            Err(err) => {
                warn!("Suggestion search for '{}' failed: {}", key.query, err);
                state.suggestions = Suggestions::default();
                FeedOutcome::Failed(search_failure_message(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("debounce.test.rs");
}
