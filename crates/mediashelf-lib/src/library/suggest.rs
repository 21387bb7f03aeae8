//! Suggestion ranking for search-as-you-type
//!
//! Orders provider candidates by title similarity to the live query and
//! decides whether an inline ghost completion should be offered. Ranking
//! only proposes; picking a suggestion is a separate, explicit step.

use crate::library::fuzzy::{normalize_title, normalized_similarity};
use crate::primitives::Candidate;

/// Maximum suggestions shown for one query
pub const MAX_SUGGESTIONS: usize = 7;

/// Shorter normalized queries produce no ranking at all
pub const MIN_QUERY_CHARS: usize = 2;

/// Candidate with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// Result of ranking one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    /// At most [`MAX_SUGGESTIONS`], best first
    pub ranked: Vec<ScoredCandidate>,
    /// Literal title of the top candidate when it completes the query
    pub ghost: Option<String>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn top(&self) -> Option<&Candidate> {
        self.ranked.first().map(|scored| &scored.candidate)
    }

    /// 1-based pick, matching what menus display
    pub fn pick(&self, position: usize) -> Option<&Candidate> {
        position
            .checked_sub(1)
            .and_then(|index| self.ranked.get(index))
            .map(|scored| &scored.candidate)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.ranked.iter().map(|scored| &scored.candidate)
    }
}

/// Whether a query is long enough to be worth ranking
pub fn query_is_rankable(query: &str) -> bool {
    normalize_title(query).chars().count() >= MIN_QUERY_CHARS
}

/// Rank `candidates` against `query`
///
/// Sorting is stable, so equally scored candidates keep provider order.
pub fn rank(query: &str, candidates: Vec<Candidate>) -> Suggestions {
    let normalized_query = normalize_title(query);
    if normalized_query.chars().count() < MIN_QUERY_CHARS {
        return Suggestions::default();
    }

    let mut ranked: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = normalized_similarity(&normalized_query, &normalize_title(&candidate.title));
            ScoredCandidate { candidate, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(MAX_SUGGESTIONS);

    let ghost = ranked
        .first()
        .filter(|top| normalize_title(&top.candidate.title).starts_with(&normalized_query))
        .map(|top| top.candidate.title.clone());

    tracing::trace!(
        query = %normalized_query,
        count = ranked.len(),
        ghost = ghost.as_deref().unwrap_or(""),
        "ranked suggestions"
    );

    Suggestions { ranked, ghost }
}

#[cfg(test)]
mod tests {
    include!("suggest.test.rs");
}
