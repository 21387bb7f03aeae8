//! Unconfirmed provider matches
//!
//! Candidates are never persisted. A candidate only influences the library
//! after the user explicitly picks it and it has gone through the resolver.

use super::library::{MediaKind, ProviderFamily, ProviderIds};
use serde::{Deserialize, Serialize};

/// A metadata match proposed by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub ids: ProviderIds,
    pub title: String,
    /// Usually the release year
    pub subtitle: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub runtime_minutes: Option<u32>,
    /// Episode, chapter or volume count when the provider knows it
    pub progress_total: Option<u32>,
}

impl Candidate {
    pub fn new(ids: ProviderIds, title: impl Into<String>) -> Self {
        Self {
            ids,
            title: title.into(),
            subtitle: None,
            cover_url: None,
            genres: Vec::new(),
            runtime_minutes: None,
            progress_total: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_genres<S: Into<String>>(mut self, genres: impl IntoIterator<Item = S>) -> Self {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_progress_total(mut self, total: u32) -> Self {
        self.progress_total = Some(total);
        self
    }

    pub fn with_runtime(mut self, minutes: u32) -> Self {
        self.runtime_minutes = Some(minutes);
        self
    }

    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    pub fn family(&self) -> ProviderFamily {
        self.ids.family()
    }

    pub fn kind(&self) -> MediaKind {
        self.ids.media_kind()
    }

    /// Overlay detail fields onto the shallow search fields
    ///
    /// Detail values win when present; absent detail values never blank a
    /// populated search field.
    pub fn merged_with(&self, details: &CandidateDetails) -> Candidate {
        let mut merged = self.clone();
        if !details.genres.is_empty() {
            merged.genres = details.genres.clone();
        }
        if details.runtime_minutes.is_some() {
            merged.runtime_minutes = details.runtime_minutes;
        }
        if details.progress_total.is_some() {
            merged.progress_total = details.progress_total;
        }
        if details.cover_url.is_some() {
            merged.cover_url = details.cover_url.clone();
        }
        merged
    }

    /// `Title (subtitle)` for menus
    pub fn label(&self) -> String {
        match &self.subtitle {
            Some(subtitle) if !subtitle.is_empty() => format!("{} ({})", self.title, subtitle),
            _ => self.title.clone(),
        }
    }
}

/// Richer per-candidate fields from a second provider round-trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateDetails {
    #[serde(default)]
    pub genres: Vec<String>,
    pub runtime_minutes: Option<u32>,
    pub progress_total: Option<u32>,
    pub cover_url: Option<String>,
}
