//! The record set and its single-slot undo buffer
//!
//! [`LibraryState`] is the only owner of the active records. Mutations are
//! whole-record replacements; removal parks the record in an expiring
//! [`PendingRestore`] slot that the next removal overwrites.

use crate::library::progress;
use crate::primitives::{DraftError, ItemUpdate, LibraryItem};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};
use uuid::Uuid;

/// Default restore window after a removal, in seconds
pub const DEFAULT_UNDO_WINDOW_SECS: u64 = 30;

/// Shortest id prefix accepted when looking a record up
const MIN_ID_PREFIX: usize = 4;

/// Record lookup and mutation errors
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("No record matches '{query}'")]
    NotFound { query: String },

    #[error("'{query}' matches {count} records; use the id instead")]
    Ambiguous { query: String, count: usize },

    #[error("No record with id {id}")]
    UnknownId { id: Uuid },

    #[error("Invalid draft: {source}")]
    InvalidDraft {
        #[from]
        source: DraftError,
    },
}

/// A removed record waiting out its restore window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRestore {
    /// Position the record occupied before removal
    pub index: usize,
    pub item: LibraryItem,
    pub expires_at: DateTime<Utc>,
}

impl PendingRestore {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}

/// Result of an undo request
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The record is back at its original position (or the end, if the list shrank)
    Restored(LibraryItem),
    /// The window had passed; the slot is now empty
    Expired,
    /// Nothing was pending
    Nothing,
}

/// Active records plus the pending-restore slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    items: Vec<LibraryItem>,
    pending_restore: Option<PendingRestore>,
}

impl LibraryState {
    pub fn new(items: Vec<LibraryItem>, pending_restore: Option<PendingRestore>) -> Self {
        Self {
            items,
            pending_restore,
        }
    }

    pub fn items(&self) -> &[LibraryItem] {
        &self.items
    }

    pub fn pending_restore(&self) -> Option<&PendingRestore> {
        self.pending_restore.as_ref()
    }

    pub fn into_parts(self) -> (Vec<LibraryItem>, Option<PendingRestore>) {
        (self.items, self.pending_restore)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&LibraryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn position(&self, id: Uuid) -> Result<usize, LibraryError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(LibraryError::UnknownId { id })
    }

    /// Whether a record with this title (case-insensitive, trimmed) exists
    pub fn contains_title(&self, title: &str) -> bool {
        let key = title.trim().to_lowercase();
        self.items.iter().any(|item| item.title_key() == key)
    }

    /// Look a record up by exact title (case-insensitive) or id prefix
    pub fn find(&self, query: &str) -> Result<&LibraryItem, LibraryError> {
        let key = query.trim().to_lowercase();

        let by_title: Vec<&LibraryItem> = self
            .items
            .iter()
            .filter(|item| item.title_key() == key)
            .collect();
        match by_title.len() {
            1 => return Ok(by_title[0]),
            0 => {}
            count => {
                return Err(LibraryError::Ambiguous {
                    query: query.to_string(),
                    count,
                });
            }
        }

        if key.len() >= MIN_ID_PREFIX {
            let by_id: Vec<&LibraryItem> = self
                .items
                .iter()
                .filter(|item| item.id.to_string().starts_with(&key))
                .collect();
            match by_id.len() {
                1 => return Ok(by_id[0]),
                0 => {}
                count => {
                    return Err(LibraryError::Ambiguous {
                        query: query.to_string(),
                        count,
                    });
                }
            }
        }

        Err(LibraryError::NotFound {
            query: query.to_string(),
        })
    }

    /// Append a new record
    pub fn insert(&mut self, item: LibraryItem) {
        trace!("Inserting '{}' ({})", item.title, item.id);
        self.items.push(item);
    }

    /// Replace the record with the same id, keeping its position
    pub fn replace(&mut self, item: LibraryItem) -> Result<(), LibraryError> {
        let index = self.position(item.id)?;
        self.items[index] = item;
        Ok(())
    }

    /// Run `update` through the status/progress engine and store the result
    pub fn update(
        &mut self,
        id: Uuid,
        update: &ItemUpdate,
        today: NaiveDate,
    ) -> Result<&LibraryItem, LibraryError> {
        let index = self.position(id)?;
        self.items[index] = progress::apply(&self.items[index], update, today);
        Ok(&self.items[index])
    }

    /// Remove a record, parking it in the restore slot until `now + window`
    ///
    /// A previous pending record is discarded.
    pub fn remove(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Result<LibraryItem, LibraryError> {
        let index = self.position(id)?;
        let item = self.items.remove(index);

        if let Some(previous) = &self.pending_restore {
            debug!("Discarding pending restore of '{}'", previous.item.title);
        }
        self.pending_restore = Some(PendingRestore {
            index,
            item: item.clone(),
            expires_at: now + window,
        });

        Ok(item)
    }

    /// Re-insert the last removed record if its window is still open
    pub fn restore(&mut self, now: DateTime<Utc>) -> RestoreOutcome {
        let Some(pending) = self.pending_restore.take() else {
            return RestoreOutcome::Nothing;
        };

        if !pending.is_live(now) {
            debug!("Restore window for '{}' has passed", pending.item.title);
            return RestoreOutcome::Expired;
        }

        let index = pending.index.min(self.items.len());
        self.items.insert(index, pending.item.clone());
        RestoreOutcome::Restored(pending.item)
    }

    /// Drop the restore slot once it can no longer be used
    pub fn prune_expired(&mut self, now: DateTime<Utc>) {
        if self
            .pending_restore
            .as_ref()
            .is_some_and(|pending| !pending.is_live(now))
        {
            self.pending_restore = None;
        }
    }
}

#[cfg(test)]
mod tests {
    include!("state.test.rs");
}
