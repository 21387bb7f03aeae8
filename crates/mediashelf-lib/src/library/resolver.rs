//! Metadata resolution: merging a picked candidate into a draft
//!
//! Resolution runs only after an explicit pick. It overwrites what the
//! provider is authoritative for and leaves user-entered values alone:
//!
//! - title always; cover and runtime only when the provider has them
//! - provider identifiers, replacing any other family's
//! - auto tags wholesale; manual tags are never touched
//! - the progress total from an episode/chapter/volume hint, when unset

use crate::api::provider::{ProviderError, ProviderSet};
use crate::primitives::{Candidate, CandidateDetails, Draft, MediaKind, TagSet, WatchStatus};
use tracing::{debug, warn};

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub draft: Draft,
    /// Recoverable status text when the detail fetch failed
    pub notice: Option<String>,
}

/// Status text for a failed detail fetch
pub fn details_failure_notice(title: &str) -> String {
    format!("Couldn't load details for \"{}\"; using search result", title)
}

/// Merge `candidate` (and its detail response, if it succeeded) into `draft`
pub fn resolve(
    mut draft: Draft,
    candidate: &Candidate,
    details: Result<CandidateDetails, ProviderError>,
) -> Resolution {
    let (merged, notice) = match details {
        Ok(details) => (candidate.merged_with(&details), None),
        Err(err) => {
            warn!("Detail fetch for '{}' failed: {}", candidate.title, err);
            (
                candidate.clone(),
                Some(details_failure_notice(&candidate.title)),
            )
        }
    };

    draft.title = merged.title.clone();
    if merged.cover_url.as_deref().is_some_and(|url| !url.is_empty()) {
        draft.cover_url = merged.cover_url.clone();
    }
    if merged.runtime_minutes.is_some() {
        draft.runtime_minutes = merged.runtime_minutes;
    }

    if let Some(previous) = draft.provider_ids.filter(|ids| ids.family() != merged.family()) {
        debug!("Replacing {} identifiers {}", previous.family(), previous);
    }
    draft.provider_ids = Some(merged.ids);
    let kind = merged.kind();
    if kind != draft.kind {
        // Auto progress inferred for the old kind no longer applies
        debug!("Kind changed from {} to {}", draft.kind, kind);
        draft.progress_total.auto = None;
        draft.progress_current.auto = None;
        draft.kind = kind;
    }

    draft.auto_tags = merged.genres.iter().collect::<TagSet>();

    if draft.progress_total.is_unset() {
        match merged.progress_total {
            Some(hint) if hint > 0 => draft.progress_total.auto = Some(hint),
            _ if draft.kind == MediaKind::Movie => draft.progress_total.auto = Some(1),
            _ => {}
        }
    }

    if draft.status == WatchStatus::Completed && draft.progress_current.is_unset() {
        if let Some(total) = draft.progress_total.effective() {
            draft.progress_current.auto = Some(total);
        }
    }

    debug!(
        "Resolved '{}' as {} with {} auto tags",
        draft.title,
        merged.ids,
        draft.auto_tags.len()
    );

    Resolution { draft, notice }
}

/// Fetch details for `candidate` from its family's provider, then [`resolve`]
///
/// A candidate whose family has no registered provider resolves from the
/// search fields alone, without a notice.
pub async fn resolve_with(providers: &ProviderSet, draft: Draft, candidate: &Candidate) -> Resolution {
    let details = match providers.for_family(candidate.family()) {
        Some(provider) => provider.details(candidate.ids).await,
        None => Ok(CandidateDetails::default()),
    };
    resolve(draft, candidate, details)
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
