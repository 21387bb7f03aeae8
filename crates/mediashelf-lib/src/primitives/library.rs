//! Library record types
//!
//! The persisted unit is [`LibraryItem`]. [`Draft`] carries the same
//! user-facing fields while a record is being composed, and [`ItemUpdate`]
//! is the partial update every mutation is expressed as.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kinds of media a library can track
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[value(alias = "film")]
    Movie,
    #[value(alias = "show", alias = "series")]
    Tv,
    Anime,
    Manga,
    Book,
    Game,
}

impl MediaKind {
    pub const ALL: [MediaKind; 6] = [
        MediaKind::Movie,
        MediaKind::Tv,
        MediaKind::Anime,
        MediaKind::Manga,
        MediaKind::Book,
        MediaKind::Game,
    ];

    /// Kinds whose progress counts episodes, chapters or volumes
    pub fn is_episodic(self) -> bool {
        matches!(self, MediaKind::Tv | MediaKind::Anime | MediaKind::Manga)
    }

    /// Provider family that carries metadata for this kind, if any
    pub fn provider_family(self) -> Option<ProviderFamily> {
        match self {
            MediaKind::Movie | MediaKind::Tv => Some(ProviderFamily::FilmTv),
            MediaKind::Anime | MediaKind::Manga => Some(ProviderFamily::AnimeManga),
            MediaKind::Game => Some(ProviderFamily::Game),
            MediaKind::Book => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
            MediaKind::Book => "book",
            MediaKind::Game => "game",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record sits in the user's backlog
///
/// Every status is reachable from every other; a completed item can be
/// reopened.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[default]
    #[value(alias = "backlog")]
    Planned,
    #[value(alias = "in_progress", alias = "watching")]
    InProgress,
    Dropped,
    Completed,
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchStatus::Planned => write!(f, "planned"),
            WatchStatus::InProgress => write!(f, "in progress"),
            WatchStatus::Dropped => write!(f, "dropped"),
            WatchStatus::Completed => write!(f, "completed"),
        }
    }
}

/// User rating on a 0-10 scale with half-point granularity
///
/// Construction never fails: out-of-range values are clamped and the result
/// is rounded to the nearest half point. Deserialization goes through the
/// same coercion.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Self {
        let clamped = if value.is_finite() {
            value.clamp(0.0, Self::MAX)
        } else {
            0.0
        };
        Self((clamped * 2.0).round() / 2.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Rating {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}/10", self.0)
        } else {
            write!(f, "{:.1}/10", self.0)
        }
    }
}

/// Ordered tag list, unique under case-insensitive comparison
///
/// The first spelling of a tag wins; later duplicates are dropped. Blank
/// tags are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, returning `false` if it was blank or already present
    pub fn insert(&mut self, tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.0.iter().any(|t| t.to_lowercase() == needle)
    }

    /// Tags of `self` followed by the tags of `other` not already present
    pub fn union(&self, other: &TagSet) -> TagSet {
        let mut merged = self.clone();
        for tag in &other.0 {
            merged.insert(tag);
        }
        merged
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

/// One side of a progress pair
///
/// `auto` is filled from provider metadata, `manual` is what the user typed.
/// The manual value always wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<u32>,
}

impl ProgressField {
    pub fn auto(value: u32) -> Self {
        Self {
            auto: Some(value),
            manual: None,
        }
    }

    pub fn manual(value: u32) -> Self {
        Self {
            auto: None,
            manual: Some(value),
        }
    }

    pub fn effective(&self) -> Option<u32> {
        self.manual.or(self.auto)
    }

    pub fn is_unset(&self) -> bool {
        self.effective().is_none()
    }

    /// Raise the effective value to at least `floor`, writing to whichever
    /// side currently takes precedence
    pub fn raise_to(&mut self, floor: u32) {
        match self.manual {
            Some(manual) => self.manual = Some(manual.max(floor)),
            None => self.auto = Some(self.auto.unwrap_or(0).max(floor)),
        }
    }
}

/// External metadata domains; a record is linked to at most one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    FilmTv,
    Game,
    AnimeManga,
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFamily::FilmTv => write!(f, "film/TV"),
            ProviderFamily::Game => write!(f, "game"),
            ProviderFamily::AnimeManga => write!(f, "anime/manga"),
        }
    }
}

/// TMDB keeps separate id spaces for films and series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMedia {
    Movie,
    Tv,
}

impl ScreenMedia {
    pub fn as_str(self) -> &'static str {
        match self {
            ScreenMedia::Movie => "movie",
            ScreenMedia::Tv => "tv",
        }
    }
}

/// MyAnimeList keeps separate id spaces for anime and manga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimeMedia {
    Anime,
    Manga,
}

impl AnimeMedia {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimeMedia::Anime => "anime",
            AnimeMedia::Manga => "manga",
        }
    }
}

/// Provider identifiers, one variant per family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderIds {
    FilmTv { tmdb_id: u64, media: ScreenMedia },
    Game { rawg_id: u64 },
    AnimeManga { mal_id: u64, media: AnimeMedia },
}

impl ProviderIds {
    pub fn family(&self) -> ProviderFamily {
        match self {
            ProviderIds::FilmTv { .. } => ProviderFamily::FilmTv,
            ProviderIds::Game { .. } => ProviderFamily::Game,
            ProviderIds::AnimeManga { .. } => ProviderFamily::AnimeManga,
        }
    }

    /// Media kind implied by the identifier space
    pub fn media_kind(&self) -> MediaKind {
        match self {
            ProviderIds::FilmTv {
                media: ScreenMedia::Movie,
                ..
            } => MediaKind::Movie,
            ProviderIds::FilmTv {
                media: ScreenMedia::Tv,
                ..
            } => MediaKind::Tv,
            ProviderIds::Game { .. } => MediaKind::Game,
            ProviderIds::AnimeManga {
                media: AnimeMedia::Anime,
                ..
            } => MediaKind::Anime,
            ProviderIds::AnimeManga {
                media: AnimeMedia::Manga,
                ..
            } => MediaKind::Manga,
        }
    }
}

impl fmt::Display for ProviderIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderIds::FilmTv { tmdb_id, media } => write!(f, "tmdb:{}/{}", media.as_str(), tmdb_id),
            ProviderIds::Game { rawg_id } => write!(f, "rawg:{}", rawg_id),
            ProviderIds::AnimeManga { mal_id, media } => write!(f, "mal:{}/{}", media.as_str(), mal_id),
        }
    }
}

/// Draft validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Title must not be empty")]
    EmptyTitle,
}

/// A persisted library record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: Uuid,
    pub title: String,
    pub kind: MediaKind,
    #[serde(default)]
    pub status: WatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_finished: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub auto_tags: TagSet,
    #[serde(default)]
    pub manual_tags: TagSet,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub rewatch_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_ids: Option<ProviderIds>,
    #[serde(default)]
    pub progress_current: ProgressField,
    #[serde(default)]
    pub progress_total: ProgressField,
}

impl LibraryItem {
    /// Promote a draft to a record; the title must be non-empty
    pub fn from_draft(draft: Draft, created_at: DateTime<Utc>) -> Result<Self, DraftError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            kind: draft.kind,
            status: draft.status,
            rating: draft.rating,
            date_finished: draft.date_finished,
            note: draft.note,
            auto_tags: draft.auto_tags,
            manual_tags: draft.manual_tags,
            created_at,
            rewatch_count: draft.rewatch_count,
            runtime_minutes: draft.runtime_minutes,
            cover_url: draft.cover_url,
            provider_ids: draft.provider_ids,
            progress_current: draft.progress_current,
            progress_total: draft.progress_total,
        })
    }

    /// Auto-filled tags followed by manually added ones
    pub fn tags(&self) -> TagSet {
        self.auto_tags.union(&self.manual_tags)
    }

    /// Effective `(current, total)`, honoring manual overrides per field
    pub fn effective_progress(&self) -> (Option<u32>, Option<u32>) {
        if self.kind == MediaKind::Movie {
            let current = self.progress_current.effective().unwrap_or(0).min(1);
            return (Some(current), Some(1));
        }
        (
            self.progress_current.effective(),
            self.progress_total.effective(),
        )
    }

    /// Movies have a single unit of progress that mirrors completion
    pub fn mirror_movie_progress(&mut self) {
        if self.kind != MediaKind::Movie {
            return;
        }
        let watched = u32::from(self.status == WatchStatus::Completed);
        self.progress_current = ProgressField::auto(watched);
        self.progress_total = ProgressField::auto(1);
    }

    /// Coerce a record read from storage into a consistent shape
    pub fn sanitize(&mut self) {
        self.title = self.title.trim().to_string();
        if self
            .note
            .as_deref()
            .is_some_and(|note| note.trim().is_empty())
        {
            self.note = None;
        }
        self.auto_tags = self.auto_tags.iter().collect();
        self.manual_tags = self.manual_tags.iter().collect();
        self.mirror_movie_progress();
    }

    /// Lowercased, trimmed title used for duplicate detection
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// A record under composition
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub title: String,
    pub kind: MediaKind,
    pub status: WatchStatus,
    pub rating: Option<Rating>,
    pub date_finished: Option<NaiveDate>,
    pub note: Option<String>,
    pub auto_tags: TagSet,
    pub manual_tags: TagSet,
    pub rewatch_count: u32,
    pub runtime_minutes: Option<u32>,
    pub cover_url: Option<String>,
    pub provider_ids: Option<ProviderIds>,
    pub progress_current: ProgressField,
    pub progress_total: ProgressField,
}

impl Draft {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            title: String::new(),
            kind,
            status: WatchStatus::Planned,
            rating: None,
            date_finished: None,
            note: None,
            auto_tags: TagSet::new(),
            manual_tags: TagSet::new(),
            rewatch_count: 0,
            runtime_minutes: None,
            cover_url: None,
            provider_ids: None,
            progress_current: ProgressField::default(),
            progress_total: ProgressField::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Start an edit session from an existing record
    pub fn from_item(item: &LibraryItem) -> Self {
        Self {
            title: item.title.clone(),
            kind: item.kind,
            status: item.status,
            rating: item.rating,
            date_finished: item.date_finished,
            note: item.note.clone(),
            auto_tags: item.auto_tags.clone(),
            manual_tags: item.manual_tags.clone(),
            rewatch_count: item.rewatch_count,
            runtime_minutes: item.runtime_minutes,
            cover_url: item.cover_url.clone(),
            provider_ids: item.provider_ids,
            progress_current: item.progress_current,
            progress_total: item.progress_total,
        }
    }

    pub fn tags(&self) -> TagSet {
        self.auto_tags.union(&self.manual_tags)
    }
}

/// Partial update to a record
///
/// Every field is optional. Nullable record fields use a nested option: the
/// outer `Some` marks the field as part of the update, the inner value sets
/// or clears it. Progress values are signed so that out-of-range input can
/// be clamped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub kind: Option<MediaKind>,
    pub status: Option<WatchStatus>,
    pub rating: Option<Option<f64>>,
    pub date_finished: Option<Option<NaiveDate>>,
    pub note: Option<Option<String>>,
    pub manual_tags: Option<TagSet>,
    pub rewatch_count: Option<i64>,
    pub runtime_minutes: Option<Option<u32>>,
    pub cover_url: Option<Option<String>>,
    pub progress_current: Option<Option<i64>>,
    pub progress_total: Option<Option<i64>>,
}

impl ItemUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: WatchStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(Some(rating));
        self
    }

    pub fn with_progress_current(mut self, current: i64) -> Self {
        self.progress_current = Some(Some(current));
        self
    }

    pub fn with_progress_total(mut self, total: i64) -> Self {
        self.progress_total = Some(Some(total));
        self
    }

    pub fn with_date_finished(mut self, date: NaiveDate) -> Self {
        self.date_finished = Some(Some(date));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(Some(note.into()));
        self
    }

    pub fn with_manual_tags(mut self, tags: TagSet) -> Self {
        self.manual_tags = Some(tags);
        self
    }

    /// Whether the update names a status, even one equal to the current one
    pub fn sets_status(&self) -> bool {
        self.status.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    include!("library.test.rs");
}
