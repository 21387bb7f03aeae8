//! Metadata provider abstraction
//!
//! One [`MetadataProvider`] per provider family (film/TV, game, anime/manga)
//! plus an optional film/TV [`TrendingProvider`]. Commands and engines only
//! ever see these traits through a [`ProviderSet`]; the live HTTP clients and
//! the in-memory mocks are interchangeable behind it.

use crate::primitives::{
    Candidate, CandidateDetails, MediaKind, ProviderFamily, ProviderIds, ScreenMedia,
};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Provider call errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("JSON parsing failed: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("{provider} responded with HTTP {status}")]
    HttpStatus { provider: &'static str, status: u16 },

    #[error("{provider} does not carry {kind} metadata")]
    UnsupportedKind {
        provider: &'static str,
        kind: MediaKind,
    },

    #[error("{provider} cannot look up foreign identifier {ids}")]
    ForeignIdentifier {
        provider: &'static str,
        ids: ProviderIds,
    },

    #[error("Provider unavailable: {message}")]
    Unavailable { message: String },
}

/// Boxed future returned by provider methods, keeping the traits object-safe
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Search, detail and similarity lookups for one provider family
pub trait MetadataProvider: Send + Sync {
    /// Family whose identifiers this provider produces and accepts
    fn family(&self) -> ProviderFamily;

    /// Short human-readable provider name for status messages
    fn name(&self) -> &'static str;

    /// Shallow title search
    fn search(&self, kind: MediaKind, query: &str) -> ProviderFuture<'_, Vec<Candidate>>;

    /// Second round-trip for the richer per-candidate fields
    fn details(&self, ids: ProviderIds) -> ProviderFuture<'_, CandidateDetails>;

    /// Items the provider considers related to `ids`
    fn similar(&self, ids: ProviderIds) -> ProviderFuture<'_, Vec<Candidate>>;
}

/// Generic trending feed, film/TV only
pub trait TrendingProvider: Send + Sync {
    fn trending(&self, media: ScreenMedia) -> ProviderFuture<'_, Vec<Candidate>>;
}

/// Registered providers, at most one per family
#[derive(Clone, Default)]
pub struct ProviderSet {
    film_tv: Option<Arc<dyn MetadataProvider>>,
    game: Option<Arc<dyn MetadataProvider>>,
    anime_manga: Option<Arc<dyn MetadataProvider>>,
    trending: Option<Arc<dyn TrendingProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` in the slot of its family, replacing any previous one
    pub fn with_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        let slot = match provider.family() {
            ProviderFamily::FilmTv => &mut self.film_tv,
            ProviderFamily::Game => &mut self.game,
            ProviderFamily::AnimeManga => &mut self.anime_manga,
        };
        *slot = Some(provider);
        self
    }

    pub fn with_trending(mut self, trending: Arc<dyn TrendingProvider>) -> Self {
        self.trending = Some(trending);
        self
    }

    pub fn for_family(&self, family: ProviderFamily) -> Option<&Arc<dyn MetadataProvider>> {
        match family {
            ProviderFamily::FilmTv => self.film_tv.as_ref(),
            ProviderFamily::Game => self.game.as_ref(),
            ProviderFamily::AnimeManga => self.anime_manga.as_ref(),
        }
    }

    /// Provider for a media kind; books never have one
    pub fn for_kind(&self, kind: MediaKind) -> Option<&Arc<dyn MetadataProvider>> {
        kind.provider_family()
            .and_then(|family| self.for_family(family))
    }

    pub fn trending(&self) -> Option<&Arc<dyn TrendingProvider>> {
        self.trending.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.film_tv.is_none()
            && self.game.is_none()
            && self.anime_manga.is_none()
            && self.trending.is_none()
    }

    /// Names of the registered metadata providers, for diagnostics
    pub fn names(&self) -> Vec<&'static str> {
        [&self.film_tv, &self.game, &self.anime_manga]
            .into_iter()
            .flatten()
            .map(|provider| provider.name())
            .collect()
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet")
            .field("providers", &self.names())
            .field("trending", &self.trending.is_some())
            .finish()
    }
}

/// Send `request` and decode a JSON body, mapping non-2xx to [`ProviderError::HttpStatus`]
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        trace!("{} request failed with {}", provider, status);
        return Err(ProviderError::HttpStatus {
            provider,
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    include!("provider.test.rs");
}
