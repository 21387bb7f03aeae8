//! Jikan (MyAnimeList) anime/manga provider
//!
//! Jikan is an unauthenticated read-only mirror of MyAnimeList, so this
//! provider is always registered.

use crate::api::provider::{MetadataProvider, ProviderError, ProviderFuture, get_json};
use crate::primitives::{
    AnimeMedia, Candidate, CandidateDetails, MediaKind, ProviderFamily, ProviderIds,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const JIKAN_API_BASE: &str = "https://api.jikan.moe";

const PROVIDER: &str = "Jikan";
const SEARCH_LIMIT: &str = "10";

#[derive(Debug, Deserialize)]
struct JikanList<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct JikanSingle<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct JikanEntry {
    mal_id: u64,
    title: Option<String>,
    title_english: Option<String>,
    images: Option<JikanImages>,
    episodes: Option<u32>,
    chapters: Option<u32>,
    volumes: Option<u32>,
    duration: Option<String>,
    year: Option<u32>,
    aired: Option<JikanDates>,
    published: Option<JikanDates>,
    #[serde(default)]
    genres: Vec<JikanNamed>,
    #[serde(default)]
    themes: Vec<JikanNamed>,
}

#[derive(Debug, Deserialize)]
struct JikanImages {
    jpg: Option<JikanImage>,
}

#[derive(Debug, Deserialize)]
struct JikanImage {
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanDates {
    from: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JikanNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct JikanRecommendation {
    entry: JikanEntry,
}

/// Leading minute count of strings like "24 min per ep" or "1 hr 50 min"
fn parse_duration_minutes(duration: &str) -> Option<u32> {
    let mut minutes = 0u32;
    let mut tokens = duration.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let Ok(value) = token.parse::<u32>() else {
            continue;
        };
        match tokens.peek().copied() {
            Some(unit) if unit.starts_with("hr") => minutes += value * 60,
            Some(unit) if unit.starts_with("min") => minutes += value,
            _ => {}
        }
    }

    (minutes > 0).then_some(minutes)
}

impl JikanEntry {
    fn display_title(&self) -> Option<String> {
        self.title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.title_english.clone().filter(|t| !t.trim().is_empty()))
    }

    fn progress_total(&self, media: AnimeMedia) -> Option<u32> {
        match media {
            AnimeMedia::Anime => self.episodes,
            AnimeMedia::Manga => self.chapters.or(self.volumes),
        }
        .filter(|n| *n > 0)
    }

    fn start_year(&self) -> Option<String> {
        if let Some(year) = self.year {
            return Some(year.to_string());
        }
        self.aired
            .as_ref()
            .or(self.published.as_ref())
            .and_then(|dates| dates.from.as_deref())
            .and_then(|from| from.get(..4))
            .map(str::to_string)
    }

    fn cover_url(&self) -> Option<String> {
        self.images
            .as_ref()
            .and_then(|images| images.jpg.as_ref())
            .and_then(|jpg| jpg.image_url.clone())
    }

    fn genre_names(&self) -> Vec<String> {
        self.genres
            .iter()
            .chain(&self.themes)
            .map(|named| named.name.clone())
            .collect()
    }

    fn into_candidate(self, media: AnimeMedia) -> Option<Candidate> {
        let title = self.display_title()?;
        let mut candidate = Candidate::new(
            ProviderIds::AnimeManga {
                mal_id: self.mal_id,
                media,
            },
            title,
        )
        .with_genres(self.genre_names());

        candidate.subtitle = self.start_year();
        candidate.cover_url = self.cover_url();
        candidate.progress_total = self.progress_total(media);
        candidate.runtime_minutes = self.duration.as_deref().and_then(parse_duration_minutes);
        Some(candidate)
    }

    fn into_details(self, media: AnimeMedia) -> CandidateDetails {
        CandidateDetails {
            genres: self.genre_names(),
            runtime_minutes: self.duration.as_deref().and_then(parse_duration_minutes),
            progress_total: self.progress_total(media),
            cover_url: self.cover_url(),
        }
    }
}

fn anime_media(kind: MediaKind) -> Result<AnimeMedia, ProviderError> {
    match kind {
        MediaKind::Anime => Ok(AnimeMedia::Anime),
        MediaKind::Manga => Ok(AnimeMedia::Manga),
        other => Err(ProviderError::UnsupportedKind {
            provider: PROVIDER,
            kind: other,
        }),
    }
}

fn mal_ids(ids: ProviderIds) -> Result<(u64, AnimeMedia), ProviderError> {
    match ids {
        ProviderIds::AnimeManga { mal_id, media } => Ok((mal_id, media)),
        other => Err(ProviderError::ForeignIdentifier {
            provider: PROVIDER,
            ids: other,
        }),
    }
}

/// Live Jikan v4 client
pub struct JikanProvider {
    client: Client,
    base_url: String,
}

impl JikanProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, JIKAN_API_BASE.to_string())
    }

    /// Create client with custom base URL (for testing)
    pub fn with_base_url(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn search_media(
        &self,
        media: AnimeMedia,
        query: &str,
    ) -> Result<Vec<Candidate>, ProviderError> {
        debug!("Jikan search {} '{}'", media.as_str(), query);
        let request = self
            .client
            .get(self.url(&format!("/v4/{}", media.as_str())))
            .query(&[("q", query), ("limit", SEARCH_LIMIT), ("sfw", "true")]);

        let list: JikanList<JikanEntry> = get_json(PROVIDER, request).await?;
        Ok(list
            .data
            .into_iter()
            .filter_map(|entry| entry.into_candidate(media))
            .collect())
    }

    async fn fetch_details(
        &self,
        mal_id: u64,
        media: AnimeMedia,
    ) -> Result<CandidateDetails, ProviderError> {
        let request = self
            .client
            .get(self.url(&format!("/v4/{}/{}/full", media.as_str(), mal_id)));
        let single: JikanSingle<JikanEntry> = get_json(PROVIDER, request).await?;
        Ok(single.data.into_details(media))
    }

    async fn fetch_recommendations(
        &self,
        mal_id: u64,
        media: AnimeMedia,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let request = self.client.get(self.url(&format!(
            "/v4/{}/{}/recommendations",
            media.as_str(),
            mal_id
        )));
        let list: JikanList<JikanRecommendation> = get_json(PROVIDER, request).await?;
        Ok(list
            .data
            .into_iter()
            .filter_map(|rec| rec.entry.into_candidate(media))
            .collect())
    }
}

impl MetadataProvider for JikanProvider {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::AnimeManga
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn search(&self, kind: MediaKind, query: &str) -> ProviderFuture<'_, Vec<Candidate>> {
        let query = query.to_string();
        Box::pin(async move {
            let media = anime_media(kind)?;
            self.search_media(media, &query).await
        })
    }

    fn details(&self, ids: ProviderIds) -> ProviderFuture<'_, CandidateDetails> {
        Box::pin(async move {
            let (mal_id, media) = mal_ids(ids)?;
            self.fetch_details(mal_id, media).await
        })
    }

    fn similar(&self, ids: ProviderIds) -> ProviderFuture<'_, Vec<Candidate>> {
        Box::pin(async move {
            let (mal_id, media) = mal_ids(ids)?;
            self.fetch_recommendations(mal_id, media).await
        })
    }
}

#[cfg(test)]
mod tests {
    include!("jikan.test.rs");
}
