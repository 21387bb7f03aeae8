//! TMDB film/TV provider
//!
//! Search, details and recommendations for movies and series, plus the
//! weekly trending feed. Requires an API key.

use crate::api::provider::{
    MetadataProvider, ProviderError, ProviderFuture, TrendingProvider, get_json,
};
use crate::primitives::{
    Candidate, CandidateDetails, MediaKind, ProviderFamily, ProviderIds, ScreenMedia,
};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

pub const TMDB_API_BASE: &str = "https://api.themoviedb.org";
pub const TMDB_POSTER_BASE: &str = "https://image.tmdb.org/t/p/w342";

const PROVIDER: &str = "TMDB";

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default)]
    results: Vec<TmdbResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbResult {
    id: u64,
    title: Option<String>,
    // series use "name" instead of "title"
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbDetails {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    number_of_episodes: Option<u32>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

/// Names for TMDB's fixed genre ids, which list endpoints return instead of names
pub fn genre_name(id: u32) -> Option<&'static str> {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        10759 => "Action & Adventure",
        10762 => "Kids",
        10763 => "News",
        10764 => "Reality",
        10765 => "Sci-Fi & Fantasy",
        10766 => "Soap",
        10767 => "Talk",
        10768 => "War & Politics",
        _ => return None,
    };
    Some(name)
}

fn poster_url(path: Option<String>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", TMDB_POSTER_BASE, p))
}

fn release_year(date: Option<&str>) -> Option<String> {
    date.and_then(|d| d.get(..4))
        .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

impl TmdbResult {
    fn into_candidate(self, media: ScreenMedia) -> Option<Candidate> {
        let title = match media {
            ScreenMedia::Movie => self.title.or(self.name),
            ScreenMedia::Tv => self.name.or(self.title),
        }
        .filter(|t| !t.trim().is_empty())?;

        let date = self.release_date.as_deref().or(self.first_air_date.as_deref());
        let mut candidate = Candidate::new(
            ProviderIds::FilmTv {
                tmdb_id: self.id,
                media,
            },
            title,
        )
        .with_genres(self.genre_ids.iter().filter_map(|id| genre_name(*id)));

        candidate.subtitle = release_year(date);
        candidate.cover_url = poster_url(self.poster_path);
        Some(candidate)
    }
}

fn screen_media(kind: MediaKind) -> Result<ScreenMedia, ProviderError> {
    match kind {
        MediaKind::Movie => Ok(ScreenMedia::Movie),
        MediaKind::Tv => Ok(ScreenMedia::Tv),
        other => Err(ProviderError::UnsupportedKind {
            provider: PROVIDER,
            kind: other,
        }),
    }
}

fn tmdb_ids(ids: ProviderIds) -> Result<(u64, ScreenMedia), ProviderError> {
    match ids {
        ProviderIds::FilmTv { tmdb_id, media } => Ok((tmdb_id, media)),
        other => Err(ProviderError::ForeignIdentifier {
            provider: PROVIDER,
            ids: other,
        }),
    }
}

/// Live TMDB client
pub struct TmdbProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbProvider {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, TMDB_API_BASE.to_string())
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
            .query(&[("api_key", self.api_key.as_str())])
    }

    async fn fetch_list(
        &self,
        request: RequestBuilder,
        media: ScreenMedia,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let page: TmdbPage = get_json(PROVIDER, request).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(|result| result.into_candidate(media))
            .collect())
    }

    async fn search_media(
        &self,
        media: ScreenMedia,
        query: &str,
    ) -> Result<Vec<Candidate>, ProviderError> {
        debug!("TMDB search {} '{}'", media.as_str(), query);
        let request = self
            .get(&format!("/3/search/{}", media.as_str()))
            .query(&[("query", query), ("include_adult", "false")]);
        self.fetch_list(request, media).await
    }

    async fn fetch_details(
        &self,
        tmdb_id: u64,
        media: ScreenMedia,
    ) -> Result<CandidateDetails, ProviderError> {
        let details: TmdbDetails =
            get_json(PROVIDER, self.get(&format!("/3/{}/{}", media.as_str(), tmdb_id))).await?;

        let runtime_minutes = match media {
            ScreenMedia::Movie => details.runtime,
            ScreenMedia::Tv => details.episode_run_time.first().copied(),
        }
        .filter(|minutes| *minutes > 0);

        Ok(CandidateDetails {
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            runtime_minutes,
            progress_total: match media {
                ScreenMedia::Movie => None,
                ScreenMedia::Tv => details.number_of_episodes.filter(|n| *n > 0),
            },
            cover_url: poster_url(details.poster_path),
        })
    }

    async fn fetch_recommendations(
        &self,
        tmdb_id: u64,
        media: ScreenMedia,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let request = self.get(&format!("/3/{}/{}/recommendations", media.as_str(), tmdb_id));
        self.fetch_list(request, media).await
    }
}

impl MetadataProvider for TmdbProvider {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::FilmTv
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn search(&self, kind: MediaKind, query: &str) -> ProviderFuture<'_, Vec<Candidate>> {
        let query = query.to_string();
        Box::pin(async move {
            let media = screen_media(kind)?;
            self.search_media(media, &query).await
        })
    }

    fn details(&self, ids: ProviderIds) -> ProviderFuture<'_, CandidateDetails> {
        Box::pin(async move {
            let (tmdb_id, media) = tmdb_ids(ids)?;
            self.fetch_details(tmdb_id, media).await
        })
    }

    fn similar(&self, ids: ProviderIds) -> ProviderFuture<'_, Vec<Candidate>> {
        Box::pin(async move {
            let (tmdb_id, media) = tmdb_ids(ids)?;
            self.fetch_recommendations(tmdb_id, media).await
        })
    }
}

impl TrendingProvider for TmdbProvider {
    fn trending(&self, media: ScreenMedia) -> ProviderFuture<'_, Vec<Candidate>> {
        Box::pin(async move {
            let request = self.get(&format!("/3/trending/{}/week", media.as_str()));
            self.fetch_list(request, media).await
        })
    }
}

#[cfg(test)]
mod tests {
    include!("tmdb.test.rs");
}
