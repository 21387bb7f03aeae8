//! Recommendation engine
//!
//! A run has four stages:
//!
//! 1. [`TasteProfile::from_library`] weighs tags from the best-rated
//!    completed records and measures the recent media-kind mix
//! 2. [`gather_pool`] asks providers for items similar to up to ten seed
//!    records, plus the film/TV trending feed, then de-duplicates and drops
//!    anything already in the library
//! 3. every pool entry is enriched with its detail response (bounded
//!    concurrency) and scored against the profile
//! 4. the scored list is either diversified into a ranked list or sampled
//!    once with a roulette wheel
//!
//! Provider failures never abort a run. They lower a candidate's score or
//! shrink the pool, and surface as notices next to the result.

use crate::api::provider::{MetadataProvider, ProviderError, ProviderSet};
use crate::networking::run_bounded;
use crate::primitives::{
    Candidate, CandidateDetails, LibraryItem, MediaKind, ProviderIds, ScreenMedia, TagSet,
    WatchStatus,
};
use crate::progress_span;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{Instrument, debug, trace, warn};

/// Completed records considered for tag weights
pub const TASTE_SOURCE_LIMIT: usize = 12;
/// Tags kept in the profile
pub const TOP_TAG_LIMIT: usize = 12;
/// Most recent records considered for the kind mix
pub const KIND_WINDOW: usize = 30;
/// Records whose similar items seed the pool
pub const SEED_LIMIT: usize = 10;
/// Pool size bound before enrichment
pub const POOL_CAP: usize = 80;
/// Ranked-list length
pub const RANKED_LIMIT: usize = 8;
/// Ranked entries allowed per primary tag
pub const MAX_PER_PRIMARY_TAG: usize = 2;
/// Top entries entering the roulette wheel
pub const RANDOM_POOL: usize = 30;

const OVERLAP_WEIGHT: f64 = 0.65;
const KIND_WEIGHT: f64 = 0.35;
const OVERLAP_DENOMINATOR_CAP: usize = 8;
const UNTAGGED_BASE: f64 = 0.15;
const FAILED_DETAIL_SCORE: f64 = 0.1;
const ROULETTE_EPSILON: f64 = 0.001;

pub const EMPTY_POOL_MESSAGE: &str =
    "No recommendations yet. Link and rate a few titles, or configure a film/TV provider for trending picks.";

/// Output shape requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecommendMode {
    #[default]
    Ranked,
    Random,
}

/// Tag weights and media-kind mix derived from the library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasteProfile {
    top_tags: Vec<(String, f64)>,
    kind_preference: HashMap<MediaKind, f64>,
}

impl TasteProfile {
    pub fn from_library(items: &[LibraryItem]) -> Self {
        Self {
            top_tags: weigh_tags(items),
            kind_preference: kind_mix(items),
        }
    }

    /// Heaviest tags first, at most [`TOP_TAG_LIMIT`]
    pub fn top_tags(&self) -> &[(String, f64)] {
        &self.top_tags
    }

    pub fn has_tags(&self) -> bool {
        !self.top_tags.is_empty()
    }

    /// Share of recent records with this kind, in `[0, 1]`
    pub fn kind_preference(&self, kind: MediaKind) -> f64 {
        self.kind_preference.get(&kind).copied().unwrap_or(0.0)
    }

    fn is_top_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.top_tags.iter().any(|(top, _)| top.to_lowercase() == tag)
    }

    /// Score a candidate from its merged tags
    pub fn score(&self, kind: MediaKind, tags: &TagSet) -> f64 {
        let kind_preference = self.kind_preference(kind);
        if tags.is_empty() || !self.has_tags() {
            return UNTAGGED_BASE + KIND_WEIGHT * kind_preference;
        }

        let overlap = tags.iter().filter(|tag| self.is_top_tag(tag)).count();
        let denominator = self.top_tags.len().min(OVERLAP_DENOMINATOR_CAP);
        let ratio = (overlap as f64 / denominator as f64).min(1.0);
        OVERLAP_WEIGHT * ratio + KIND_WEIGHT * kind_preference
    }
}

fn rating_of(item: &LibraryItem) -> f64 {
    item.rating.map(|r| r.value()).unwrap_or(0.0)
}

fn by_rating_desc(a: &&LibraryItem, b: &&LibraryItem) -> std::cmp::Ordering {
    rating_of(b).total_cmp(&rating_of(a))
}

fn weigh_tags(items: &[LibraryItem]) -> Vec<(String, f64)> {
    let mut completed: Vec<&LibraryItem> = items
        .iter()
        .filter(|item| item.status == WatchStatus::Completed)
        .collect();
    completed.sort_by(by_rating_desc);

    // (first spelling, weight), kept in first-seen order
    let mut weights: Vec<(String, f64)> = Vec::new();
    for item in completed.into_iter().take(TASTE_SOURCE_LIMIT) {
        let weight = rating_of(item) / 10.0;
        for tag in item.tags().iter() {
            let key = tag.to_lowercase();
            match weights.iter_mut().find(|(seen, _)| seen.to_lowercase() == key) {
                Some((_, total)) => *total += weight,
                None => weights.push((tag.to_string(), weight)),
            }
        }
    }

    weights.retain(|(_, weight)| *weight > 0.0);
    weights.sort_by(|a, b| b.1.total_cmp(&a.1));
    weights.truncate(TOP_TAG_LIMIT);
    weights
}

fn kind_mix(items: &[LibraryItem]) -> HashMap<MediaKind, f64> {
    let mut recent: Vec<&LibraryItem> = items.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(KIND_WINDOW);

    let mut counts: HashMap<MediaKind, usize> = HashMap::new();
    for item in &recent {
        *counts.entry(item.kind).or_default() += 1;
    }

    let total = recent.len() as f64;
    counts
        .into_iter()
        .map(|(kind, count)| (kind, count as f64 / total))
        .collect()
}

/// Records whose similar items seed the pool
///
/// Rated, provider-linked records, highest rating first. When no linked
/// record is rated, any linked record qualifies.
pub fn seeds(items: &[LibraryItem]) -> Vec<&LibraryItem> {
    let linked = items.iter().filter(|item| item.provider_ids.is_some());

    let mut rated: Vec<&LibraryItem> = linked.clone().filter(|item| item.rating.is_some()).collect();
    if rated.is_empty() {
        return linked.take(SEED_LIMIT).collect();
    }
    rated.sort_by(by_rating_desc);
    rated.truncate(SEED_LIMIT);
    rated
}

/// Candidates gathered before enrichment, plus notices for failed lookups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePool {
    pub candidates: Vec<Candidate>,
    pub notices: Vec<String>,
}

struct PoolFilter {
    titles: HashSet<String>,
    ids: HashSet<ProviderIds>,
    seen: HashSet<ProviderIds>,
}

impl PoolFilter {
    fn new(items: &[LibraryItem]) -> Self {
        Self {
            titles: items.iter().map(LibraryItem::title_key).collect(),
            ids: items.iter().filter_map(|item| item.provider_ids).collect(),
            seen: HashSet::new(),
        }
    }

    fn admit(&mut self, candidate: &Candidate) -> bool {
        if self.ids.contains(&candidate.ids)
            || self.titles.contains(&candidate.title.trim().to_lowercase())
        {
            return false;
        }
        self.seen.insert(candidate.ids)
    }
}

/// Collect similar and trending items, de-duplicated and capped at [`POOL_CAP`]
pub async fn gather_pool(providers: &ProviderSet, items: &[LibraryItem]) -> CandidatePool {
    let mut pool = CandidatePool::default();
    let mut gathered: Vec<Candidate> = Vec::new();

    for seed in seeds(items) {
        let Some(ids) = seed.provider_ids else {
            continue;
        };
        let Some(provider) = providers.for_family(ids.family()) else {
            debug!("No {} provider for seed '{}'", ids.family(), seed.title);
            continue;
        };

        match provider.similar(ids).await {
            Ok(similar) => {
                trace!("{} similar items for '{}'", similar.len(), seed.title);
                gathered.extend(similar);
            }
            Err(err) => {
                warn!("Similar lookup for '{}' failed: {}", seed.title, err);
                pool.notices
                    .push(format!("Couldn't load titles similar to \"{}\"", seed.title));
            }
        }
    }

    if let Some(trending) = providers.trending() {
        for media in [ScreenMedia::Movie, ScreenMedia::Tv] {
            match trending.trending(media).await {
                Ok(found) => gathered.extend(found),
                Err(err) => {
                    warn!("Trending {} lookup failed: {}", media.as_str(), err);
                    pool.notices
                        .push(format!("Couldn't load trending {} titles", media.as_str()));
                }
            }
        }
    }

    let mut filter = PoolFilter::new(items);
    pool.candidates = gathered
        .into_iter()
        .filter(|candidate| filter.admit(candidate))
        .take(POOL_CAP)
        .collect();

    debug!("Candidate pool holds {} entries", pool.candidates.len());
    pool
}

/// A scored pool entry
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedCandidate {
    /// Search fields overlaid with the detail response
    pub candidate: Candidate,
    pub tags: TagSet,
    pub score: f64,
}

impl RecommendedCandidate {
    /// Lowercased first tag, used for diversification
    pub fn primary_tag(&self) -> Option<String> {
        self.tags.first().map(str::to_lowercase)
    }
}

/// Score one candidate from its detail response
///
/// A failed detail fetch yields a flat low score instead of removing the
/// candidate.
pub fn score_candidate(
    profile: &TasteProfile,
    candidate: Candidate,
    details: Result<CandidateDetails, ProviderError>,
) -> RecommendedCandidate {
    match details {
        Ok(details) => {
            let merged = candidate.merged_with(&details);
            let tags: TagSet = merged.genres.iter().collect();
            let score = profile.score(merged.kind(), &tags);
            RecommendedCandidate {
                candidate: merged,
                tags,
                score,
            }
        }
        Err(err) => {
            debug!("Details for '{}' failed: {}", candidate.title, err);
            let tags: TagSet = candidate.genres.iter().collect();
            RecommendedCandidate {
                candidate,
                tags,
                score: FAILED_DETAIL_SCORE,
            }
        }
    }
}

/// Sort descending by score; ties keep pool order
pub fn sort_by_score(scored: &mut [RecommendedCandidate]) {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Walk a score-sorted list keeping at most [`MAX_PER_PRIMARY_TAG`] entries
/// per primary tag, up to [`RANKED_LIMIT`]
///
/// Untagged entries are not limited. Falls back to the plain top entries
/// when the walk keeps nothing.
pub fn diversify(sorted: &[RecommendedCandidate]) -> Vec<RecommendedCandidate> {
    let mut per_tag: HashMap<String, usize> = HashMap::new();
    let mut kept = Vec::new();

    for entry in sorted {
        if kept.len() == RANKED_LIMIT {
            break;
        }
        if let Some(tag) = entry.primary_tag() {
            let count = per_tag.entry(tag).or_default();
            if *count >= MAX_PER_PRIMARY_TAG {
                continue;
            }
            *count += 1;
        }
        kept.push(entry.clone());
    }

    if kept.is_empty() {
        return sorted.iter().take(RANKED_LIMIT).cloned().collect();
    }
    kept
}

/// Roulette-wheel selection over the top [`RANDOM_POOL`] of a score-sorted list
pub fn roulette<R: Rng>(
    sorted: &[RecommendedCandidate],
    rng: &mut R,
) -> Option<RecommendedCandidate> {
    let wheel = &sorted[..sorted.len().min(RANDOM_POOL)];
    let weights: Vec<f64> = wheel
        .iter()
        .map(|entry| entry.score.max(ROULETTE_EPSILON))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut needle = rng.random::<f64>() * total;
    for (entry, weight) in wheel.iter().zip(&weights) {
        if needle < *weight {
            return Some(entry.clone());
        }
        needle -= weight;
    }
    wheel.last().cloned()
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Ranked(Vec<RecommendedCandidate>),
    Pick(RecommendedCandidate),
    Empty { message: String },
}

/// A recommendation plus the recoverable failures met along the way
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationReport {
    pub recommendation: Recommendation,
    pub notices: Vec<String>,
}

type EnrichInput = (Candidate, Option<Arc<dyn MetadataProvider>>);

async fn enrich(
    candidate: Candidate,
    provider: Option<Arc<dyn MetadataProvider>>,
) -> (Candidate, Result<CandidateDetails, ProviderError>) {
    let Some(provider) = provider else {
        return (candidate, Ok(CandidateDetails::default()));
    };

    // A lookup that panics fails only its own candidate
    let ids = candidate.ids;
    let details = match tokio::spawn(async move { provider.details(ids).await }).await {
        Ok(details) => details,
        Err(err) => Err(ProviderError::Unavailable {
            message: format!("detail lookup for {} aborted: {}", ids, err),
        }),
    };
    (candidate, details)
}

/// Gather, enrich and score the pool; the result is sorted by score
pub async fn score_pool(
    providers: &ProviderSet,
    items: &[LibraryItem],
    jobs: usize,
) -> (Vec<RecommendedCandidate>, Vec<String>) {
    let profile = TasteProfile::from_library(items);
    trace!("Taste profile: {:?}", profile.top_tags());

    let CandidatePool {
        candidates,
        mut notices,
    } = gather_pool(providers, items).await;
    if candidates.is_empty() {
        return (Vec::new(), notices);
    }

    let inputs: Vec<EnrichInput> = candidates
        .into_iter()
        .map(|candidate| {
            let provider = providers.for_family(candidate.family()).cloned();
            (candidate, provider)
        })
        .collect();

    let span = progress_span!("enrich", total = inputs.len());
    let enrichment = run_bounded(jobs, inputs, |(candidate, provider): EnrichInput| {
        enrich(candidate, provider)
    });
    let enriched = match enrichment.instrument(span).await {
        Ok(enriched) => enriched,
        Err(err) => {
            warn!("Detail enrichment aborted: {}", err);
            notices.push("Couldn't load recommendation details".to_string());
            return (Vec::new(), notices);
        }
    };

    let failed = enriched.iter().filter(|(_, details)| details.is_err()).count();
    if failed > 0 {
        warn!("{} detail lookups failed during recommendation", failed);
        notices.push(format!(
            "Couldn't load details for {} of {} candidates",
            failed,
            enriched.len()
        ));
    }

    let mut scored: Vec<RecommendedCandidate> = enriched
        .into_iter()
        .map(|(candidate, details)| score_candidate(&profile, candidate, details))
        .collect();
    sort_by_score(&mut scored);
    (scored, notices)
}

/// Run the engine with the thread-local generator for random picks
pub async fn recommend(
    providers: &ProviderSet,
    items: &[LibraryItem],
    mode: RecommendMode,
    jobs: usize,
) -> RecommendationReport {
    let (scored, notices) = score_pool(providers, items, jobs).await;
    select(scored, notices, mode, &mut rand::rng())
}

/// Run the engine with a caller-supplied generator
pub async fn recommend_with_rng<R: Rng>(
    providers: &ProviderSet,
    items: &[LibraryItem],
    mode: RecommendMode,
    jobs: usize,
    rng: &mut R,
) -> RecommendationReport {
    let (scored, notices) = score_pool(providers, items, jobs).await;
    select(scored, notices, mode, rng)
}

fn select<R: Rng>(
    scored: Vec<RecommendedCandidate>,
    notices: Vec<String>,
    mode: RecommendMode,
    rng: &mut R,
) -> RecommendationReport {
    let recommendation = match mode {
        RecommendMode::Ranked => {
            let ranked = diversify(&scored);
            if ranked.is_empty() {
                Recommendation::Empty {
                    message: EMPTY_POOL_MESSAGE.to_string(),
                }
            } else {
                Recommendation::Ranked(ranked)
            }
        }
        RecommendMode::Random => match roulette(&scored, rng) {
            Some(pick) => Recommendation::Pick(pick),
            None => Recommendation::Empty {
                message: EMPTY_POOL_MESSAGE.to_string(),
            },
        },
    };

    RecommendationReport {
        recommendation,
        notices,
    }
}

#[cfg(test)]
mod tests {
    include!("recommend.test.rs");
}
