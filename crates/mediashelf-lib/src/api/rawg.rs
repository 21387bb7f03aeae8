//! RAWG game provider
//!
//! RAWG reports playtime in hours; it is stored as minutes like every other
//! runtime.

use crate::api::provider::{MetadataProvider, ProviderError, ProviderFuture, get_json};
use crate::primitives::{Candidate, CandidateDetails, MediaKind, ProviderFamily, ProviderIds};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

pub const RAWG_API_BASE: &str = "https://api.rawg.io";

const PROVIDER: &str = "RAWG";
const PAGE_SIZE: &str = "10";

#[derive(Debug, Deserialize)]
struct RawgPage {
    #[serde(default)]
    results: Vec<RawgGame>,
}

#[derive(Debug, Deserialize)]
struct RawgGame {
    id: u64,
    name: Option<String>,
    released: Option<String>,
    background_image: Option<String>,
    playtime: Option<u32>,
    #[serde(default)]
    genres: Vec<RawgGenre>,
}

#[derive(Debug, Deserialize)]
struct RawgGenre {
    name: String,
}

impl RawgGame {
    fn playtime_minutes(&self) -> Option<u32> {
        self.playtime.filter(|hours| *hours > 0).map(|hours| hours * 60)
    }

    fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }

    fn into_candidate(self) -> Option<Candidate> {
        let title = self.name.clone().filter(|n| !n.trim().is_empty())?;
        let mut candidate = Candidate::new(ProviderIds::Game { rawg_id: self.id }, title)
            .with_genres(self.genre_names());

        candidate.subtitle = self
            .released
            .as_deref()
            .and_then(|date| date.get(..4))
            .map(str::to_string);
        candidate.runtime_minutes = self.playtime_minutes();
        candidate.cover_url = self.background_image.filter(|url| !url.is_empty());
        Some(candidate)
    }

    fn into_details(self) -> CandidateDetails {
        CandidateDetails {
            genres: self.genre_names(),
            runtime_minutes: self.playtime_minutes(),
            progress_total: None,
            cover_url: self.background_image.filter(|url| !url.is_empty()),
        }
    }
}

fn rawg_id(ids: ProviderIds) -> Result<u64, ProviderError> {
    match ids {
        ProviderIds::Game { rawg_id } => Ok(rawg_id),
        other => Err(ProviderError::ForeignIdentifier {
            provider: PROVIDER,
            ids: other,
        }),
    }
}

/// Live RAWG client
pub struct RawgProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RawgProvider {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, RAWG_API_BASE.to_string())
    }

    /// Create client with custom base URL (for testing)
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("key", self.api_key.as_str())])
    }

    async fn fetch_page(&self, request: RequestBuilder) -> Result<Vec<Candidate>, ProviderError> {
        let page: RawgPage = get_json(PROVIDER, request).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(RawgGame::into_candidate)
            .collect())
    }
}

impl MetadataProvider for RawgProvider {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::Game
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn search(&self, kind: MediaKind, query: &str) -> ProviderFuture<'_, Vec<Candidate>> {
        let query = query.to_string();
        Box::pin(async move {
            if kind != MediaKind::Game {
                return Err(ProviderError::UnsupportedKind {
                    provider: PROVIDER,
                    kind,
                });
            }
            debug!("RAWG search '{}'", query);
            let request = self
                .get("/api/games")
                .query(&[("search", query.as_str()), ("page_size", PAGE_SIZE)]);
            self.fetch_page(request).await
        })
    }

    fn details(&self, ids: ProviderIds) -> ProviderFuture<'_, CandidateDetails> {
        Box::pin(async move {
            let id = rawg_id(ids)?;
            let game: RawgGame = get_json(PROVIDER, self.get(&format!("/api/games/{}", id))).await?;
            Ok(game.into_details())
        })
    }

    fn similar(&self, ids: ProviderIds) -> ProviderFuture<'_, Vec<Candidate>> {
        Box::pin(async move {
            let id = rawg_id(ids)?;
            let request = self.get(&format!("/api/games/{}/game-series", id));
            self.fetch_page(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    include!("rawg.test.rs");
}
