//! Status and progress state machine
//!
//! Every mutation of a record, whether a direct edit, a drag to another
//! status column or a progress step, is an [`ItemUpdate`] run through
//! [`apply`]. The rules, in order:
//!
//! 1. merge the update into the record
//! 2. entering `completed` without a finish date stamps today
//! 3. effective progress is the manual override, else the auto value
//! 4. if the update did not name a status and effective current reached a
//!    positive effective total, promote to `completed` (and apply rule 2)
//! 5. a `completed` movie is `(1, 1)`; a `completed` episodic record has
//!    its current raised to the total, never lowered
//!
//! Out-of-range input (negative counts, ratings past 10) is clamped, never
//! rejected.

use crate::primitives::{
    Draft, DraftError, ItemUpdate, LibraryItem, MediaKind, ProgressField, Rating, WatchStatus,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, trace};

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Apply `update` to `item`, returning the normalized record
pub fn apply(item: &LibraryItem, update: &ItemUpdate, today: NaiveDate) -> LibraryItem {
    let previous_status = item.status;
    let mut next = item.clone();
    merge(&mut next, update);
    normalize(next, previous_status, update.sets_status(), today)
}

/// Promote a draft to a normalized record
///
/// The draft's status counts as explicitly chosen, and as a transition from
/// a non-completed state, so a draft created as `completed` is stamped with
/// today's date.
pub fn create(
    draft: Draft,
    created_at: DateTime<Utc>,
    today: NaiveDate,
) -> Result<LibraryItem, DraftError> {
    let item = LibraryItem::from_draft(draft, created_at)?;
    Ok(normalize(item, WatchStatus::Planned, true, today))
}

/// Update advancing effective current progress by one
///
/// Clamped to the total when one is known, without lowering a current that
/// already exceeds it.
pub fn increment(item: &LibraryItem) -> ItemUpdate {
    let (current, total) = item.effective_progress();
    let current = current.unwrap_or(0);
    let mut next = i64::from(current) + 1;
    if let Some(total) = total.filter(|t| *t > 0) {
        next = next.min(i64::from(total.max(current)));
    }
    ItemUpdate::new().with_progress_current(next)
}

/// Update stepping effective current progress back by one, never below zero
pub fn decrement(item: &LibraryItem) -> ItemUpdate {
    let (current, total) = item.effective_progress();
    let mut next = (i64::from(current.unwrap_or(0)) - 1).max(0);
    if let Some(total) = total.filter(|t| *t > 0) {
        next = next.min(i64::from(total));
    }
    ItemUpdate::new().with_progress_current(next)
}

/// Rule 1: field-wise merge
fn merge(item: &mut LibraryItem, update: &ItemUpdate) {
    if let Some(title) = update.title.as_deref() {
        let title = title.trim();
        if title.is_empty() {
            debug!("Ignoring empty title in update for {}", item.id);
        } else {
            item.title = title.to_string();
        }
    }

    if let Some(kind) = update.kind {
        if item.kind == MediaKind::Movie && kind != MediaKind::Movie {
            item.progress_current = ProgressField::default();
            item.progress_total = ProgressField::default();
        }
        item.kind = kind;
    }

    if let Some(status) = update.status {
        item.status = status;
    }
    if let Some(rating) = update.rating {
        item.rating = rating.map(Rating::new);
    }
    if let Some(date) = update.date_finished {
        item.date_finished = date;
    }
    if let Some(note) = &update.note {
        item.note = non_blank(note.clone());
    }
    if let Some(tags) = &update.manual_tags {
        item.manual_tags = tags.clone();
    }
    if let Some(count) = update.rewatch_count {
        item.rewatch_count = clamp_count(count);
    }
    if let Some(runtime) = update.runtime_minutes {
        item.runtime_minutes = runtime;
    }
    if let Some(cover) = &update.cover_url {
        item.cover_url = non_blank(cover.clone());
    }
    if let Some(current) = update.progress_current {
        item.progress_current.manual = current.map(clamp_count);
    }
    if let Some(total) = update.progress_total {
        item.progress_total.manual = total.map(clamp_count);
    }
}

/// Rules 2 through 5
fn normalize(
    mut item: LibraryItem,
    previous_status: WatchStatus,
    status_explicit: bool,
    today: NaiveDate,
) -> LibraryItem {
    stamp_completion(&mut item, previous_status, today);

    if !status_explicit && item.status != WatchStatus::Completed {
        let reached = match item.effective_progress() {
            (Some(current), Some(total)) if total > 0 && current >= total => Some((current, total)),
            _ => None,
        };
        if let Some((current, total)) = reached {
            debug!(
                "Auto-completing '{}' at {}/{}",
                item.title, current, total
            );
            item.status = WatchStatus::Completed;
            stamp_completion(&mut item, previous_status, today);
        }
    }

    if item.kind == MediaKind::Movie {
        item.mirror_movie_progress();
    } else if item.status == WatchStatus::Completed && item.kind.is_episodic() {
        if let Some(total) = item.progress_total.effective().filter(|t| *t > 0) {
            item.progress_current.raise_to(total);
        }
    }

    trace!(
        "Normalized '{}': {} {:?}",
        item.title,
        item.status,
        item.effective_progress()
    );
    item
}

/// Rule 2
fn stamp_completion(item: &mut LibraryItem, previous_status: WatchStatus, today: NaiveDate) {
    if previous_status != WatchStatus::Completed
        && item.status == WatchStatus::Completed
        && item.date_finished.is_none()
    {
        item.date_finished = Some(today);
    }
}

#[cfg(test)]
mod tests {
    include!("progress.test.rs");
}
