//! Ranked search integration combining a metadata provider with fuzzy ranking
//!
//! This is the search-as-you-type entry point: one provider round-trip,
//! then [`rank`](crate::library::suggest::rank) over the results.

use crate::api::provider::{ProviderError, ProviderSet};
use crate::library::suggest::{Suggestions, query_is_rankable, rank};
use crate::primitives::MediaKind;
use tracing::debug;

/// Search `kind` for `query` and rank the results
///
/// Queries too short to rank never reach the provider. Kinds without a
/// registered provider (books always, others when no key is configured)
/// produce no suggestions rather than an error.
pub async fn search_as_you_type(
    providers: &ProviderSet,
    kind: MediaKind,
    query: &str,
) -> Result<Suggestions, ProviderError> {
    if !query_is_rankable(query) {
        return Ok(Suggestions::default());
    }

    let Some(provider) = providers.for_kind(kind) else {
        debug!("No provider registered for {}", kind);
        return Ok(Suggestions::default());
    };

    let candidates = provider.search(kind, query.trim()).await?;
    debug!(
        "{} returned {} candidates for '{}'",
        provider.name(),
        candidates.len(),
        query
    );

    Ok(rank(query, candidates))
}

/// Short user-facing text for a failed search
pub fn search_failure_message(error: &ProviderError) -> String {
    format!("Search unavailable: {}", error)
}

#[cfg(test)]
mod tests {
    include!("ranked_search.test.rs");
}
