//! In-memory providers for tests
//!
//! Responses are registered up front; every call is recorded so tests can
//! assert on what an engine actually asked for.

use crate::api::provider::{MetadataProvider, ProviderError, ProviderFuture, TrendingProvider};
use crate::library::fuzzy::normalize_title;
use crate::primitives::{
    Candidate, CandidateDetails, MediaKind, ProviderFamily, ProviderIds, ScreenMedia,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Search { kind: MediaKind, query: String },
    Details(ProviderIds),
    Similar(ProviderIds),
    Trending(ScreenMedia),
}

type Canned<T> = Result<T, String>;

/// Mock metadata provider for one family
///
/// Unregistered searches and similarity lookups answer with an empty list,
/// unregistered detail lookups with empty details. Failures must be
/// registered explicitly.
#[derive(Clone)]
pub struct MockMetadataProvider {
    family: ProviderFamily,
    latency: Option<Duration>,
    searches: Arc<Mutex<HashMap<String, Canned<Vec<Candidate>>>>>,
    details: Arc<Mutex<HashMap<ProviderIds, Canned<CandidateDetails>>>>,
    similar: Arc<Mutex<HashMap<ProviderIds, Canned<Vec<Candidate>>>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl MockMetadataProvider {
    pub fn new(family: ProviderFamily) -> Self {
        Self {
            family,
            latency: None,
            searches: Arc::new(Mutex::new(HashMap::new())),
            details: Arc::new(Mutex::new(HashMap::new())),
            similar: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Delay every response, for staleness tests under paused time
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Register search results; the query is matched after title normalization
    pub fn with_search_results(self, query: &str, results: Vec<Candidate>) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(normalize_title(query), Ok(results));
        self
    }

    pub fn with_search_error(self, query: &str, message: &str) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(normalize_title(query), Err(message.to_string()));
        self
    }

    pub fn with_details(self, ids: ProviderIds, details: CandidateDetails) -> Self {
        self.details.lock().unwrap().insert(ids, Ok(details));
        self
    }

    pub fn with_details_error(self, ids: ProviderIds, message: &str) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(ids, Err(message.to_string()));
        self
    }

    pub fn with_similar(self, ids: ProviderIds, results: Vec<Candidate>) -> Self {
        self.similar.lock().unwrap().insert(ids, Ok(results));
        self
    }

    pub fn with_similar_error(self, ids: ProviderIds, message: &str) -> Self {
        self.similar
            .lock()
            .unwrap()
            .insert(ids, Err(message.to_string()));
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ProviderCall::Search { .. }))
            .count()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn respond<T>(&self, canned: Option<Canned<T>>, fallback: T) -> Result<T, ProviderError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match canned {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(ProviderError::Unavailable { message }),
            None => Ok(fallback),
        }
    }
}

impl MetadataProvider for MockMetadataProvider {
    fn family(&self) -> ProviderFamily {
        self.family
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn search(&self, kind: MediaKind, query: &str) -> ProviderFuture<'_, Vec<Candidate>> {
        let query = query.to_string();
        self.record(ProviderCall::Search {
            kind,
            query: query.clone(),
        });
        let canned = self
            .searches
            .lock()
            .unwrap()
            .get(&normalize_title(&query))
            .cloned();

        Box::pin(async move { self.respond(canned, Vec::new()).await })
    }

    fn details(&self, ids: ProviderIds) -> ProviderFuture<'_, CandidateDetails> {
        self.record(ProviderCall::Details(ids));
        let canned = self.details.lock().unwrap().get(&ids).cloned();

        Box::pin(async move { self.respond(canned, CandidateDetails::default()).await })
    }

    fn similar(&self, ids: ProviderIds) -> ProviderFuture<'_, Vec<Candidate>> {
        self.record(ProviderCall::Similar(ids));
        let canned = self.similar.lock().unwrap().get(&ids).cloned();

        Box::pin(async move { self.respond(canned, Vec::new()).await })
    }
}

/// Mock trending feed
#[derive(Clone, Default)]
pub struct MockTrendingProvider {
    feeds: Arc<Mutex<HashMap<ScreenMedia, Canned<Vec<Candidate>>>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl MockTrendingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trending(self, media: ScreenMedia, results: Vec<Candidate>) -> Self {
        self.feeds.lock().unwrap().insert(media, Ok(results));
        self
    }

    pub fn with_trending_error(self, media: ScreenMedia, message: &str) -> Self {
        self.feeds
            .lock()
            .unwrap()
            .insert(media, Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl TrendingProvider for MockTrendingProvider {
    fn trending(&self, media: ScreenMedia) -> ProviderFuture<'_, Vec<Candidate>> {
        self.calls.lock().unwrap().push(ProviderCall::Trending(media));
        let canned = self.feeds.lock().unwrap().get(&media).cloned();

        Box::pin(async move {
            match canned {
                Some(Ok(results)) => Ok(results),
                Some(Err(message)) => Err(ProviderError::Unavailable { message }),
                None => Ok(Vec::new()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    include!("mock.test.rs");
}
