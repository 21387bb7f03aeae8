//! Library persistence
//!
//! A store maps a user id to a [`LibrarySnapshot`]. Records are validated
//! one at a time on load: a malformed record is skipped with a warning
//! instead of failing the whole library.

use crate::library::{LibraryState, PendingRestore};
use crate::primitives::LibraryItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// On-disk format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid user id '{user}': use letters, digits, '-' or '_'")]
    InvalidUser { user: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Library file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode library: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

/// Everything persisted for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub items: Vec<LibraryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_restore: Option<PendingRestore>,
    /// Recoverable problems met while loading; never persisted
    #[serde(skip)]
    pub notices: Vec<String>,
}

impl LibrarySnapshot {
    pub fn from_state(state: &LibraryState) -> Self {
        Self {
            items: state.items().to_vec(),
            pending_restore: state.pending_restore().cloned(),
            notices: Vec::new(),
        }
    }

    pub fn into_state(self) -> LibraryState {
        LibraryState::new(self.items, self.pending_restore)
    }

    /// Decode a snapshot record by record
    ///
    /// Accepts the versioned object form as well as a bare array of records.
    pub fn from_value(value: Value) -> Self {
        let (raw_items, raw_pending) = match value {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => {
                let items = match map.remove("items") {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        warn!("Ignoring non-array 'items' field: {}", other);
                        Vec::new()
                    }
                    None => Vec::new(),
                };
                (items, map.remove("pending_restore"))
            }
            other => {
                warn!("Ignoring library document of unexpected shape: {}", other);
                (Vec::new(), None)
            }
        };

        let mut snapshot = LibrarySnapshot::default();
        let mut skipped = 0;
        for (index, raw) in raw_items.into_iter().enumerate() {
            match serde_json::from_value::<LibraryItem>(raw) {
                Ok(mut item) => {
                    item.sanitize();
                    if item.title.is_empty() {
                        warn!("Skipping record {} with an empty title", index);
                        skipped += 1;
                        continue;
                    }
                    snapshot.items.push(item);
                }
                Err(err) => {
                    warn!("Skipping invalid record {}: {}", index, err);
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            snapshot
                .notices
                .push(format!("Skipped {} unreadable records", skipped));
        }

        snapshot.pending_restore = match raw_pending {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<PendingRestore>(raw) {
                Ok(mut pending) => {
                    pending.item.sanitize();
                    Some(pending)
                }
                Err(err) => {
                    warn!("Dropping unreadable restore slot: {}", err);
                    None
                }
            },
        };

        snapshot
    }
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    version: u32,
    items: &'a [LibraryItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    pending_restore: Option<&'a PendingRestore>,
}

/// Result of a save that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Written somewhere, but not everywhere; the text is user-facing
    Degraded(String),
}

/// Load/save boundary for one user's library
pub trait LibraryStore {
    fn load(&self, user: &str) -> Result<LibrarySnapshot, StoreError>;

    fn save(&self, user: &str, snapshot: &LibrarySnapshot) -> Result<SaveOutcome, StoreError>;

    /// Where the data lives, for status output
    fn location(&self, user: &str) -> String;
}

/// Reject user ids that would escape the data directory
pub fn validate_user(user: &str) -> Result<(), StoreError> {
    let valid = !user.is_empty()
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidUser {
            user: user.to_string(),
        })
    }
}

/// One pretty-printed `<user>.json` per user
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, user: &str) -> Result<PathBuf, StoreError> {
        validate_user(user)?;
        Ok(self.root.join(format!("{}.json", user)))
    }
}

impl LibraryStore for JsonFileStore {
    fn load(&self, user: &str) -> Result<LibrarySnapshot, StoreError> {
        let path = self.path_for(user)?;
        if !path.exists() {
            debug!("No library at {}; starting empty", path.display());
            return Ok(LibrarySnapshot::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;

        let snapshot = LibrarySnapshot::from_value(value);
        trace!(
            "Loaded {} records from {}",
            snapshot.items.len(),
            path.display()
        );
        Ok(snapshot)
    }

    fn save(&self, user: &str, snapshot: &LibrarySnapshot) -> Result<SaveOutcome, StoreError> {
        let path = self.path_for(user)?;
        std::fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let document = SnapshotDocument {
            version: SNAPSHOT_VERSION,
            items: &snapshot.items,
            pending_restore: snapshot.pending_restore.as_ref(),
        };
        let json = serde_json::to_string_pretty(&document)?;

        let io_error = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut file = NamedTempFile::new_in(&self.root).map_err(io_error)?;
        file.write_all(json.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)?;
        file.persist(&path).map_err(|source| StoreError::Persist {
            path: path.clone(),
            source,
        })?;

        trace!("Saved {} records to {}", snapshot.items.len(), path.display());
        Ok(SaveOutcome::Saved)
    }

    fn location(&self, user: &str) -> String {
        self.root.join(format!("{}.json", user)).display().to_string()
    }
}

/// A primary store shadowed by a local cache of the same shape
///
/// Loads fall back to the cache when the primary fails. Saves go to the
/// cache first, so a primary failure still leaves the change on disk.
#[derive(Debug, Clone)]
pub struct FallbackStore<P, C> {
    primary: P,
    cache: C,
}

impl<P: LibraryStore, C: LibraryStore> FallbackStore<P, C> {
    pub fn new(primary: P, cache: C) -> Self {
        Self { primary, cache }
    }
}

impl<P: LibraryStore, C: LibraryStore> LibraryStore for FallbackStore<P, C> {
    fn load(&self, user: &str) -> Result<LibrarySnapshot, StoreError> {
        match self.primary.load(user) {
            Ok(snapshot) => Ok(snapshot),
            Err(err @ StoreError::InvalidUser { .. }) => Err(err),
            Err(primary_err) => {
                warn!("Primary store load failed: {}", primary_err);
                let mut snapshot = self.cache.load(user)?;
                snapshot.notices.push(format!(
                    "Couldn't read {}; using local cache",
                    self.primary.location(user)
                ));
                Ok(snapshot)
            }
        }
    }

    fn save(&self, user: &str, snapshot: &LibrarySnapshot) -> Result<SaveOutcome, StoreError> {
        let cached = match self.cache.save(user, snapshot) {
            Ok(_) => true,
            Err(err) => {
                warn!("Cache save failed: {}", err);
                false
            }
        };

        match self.primary.save(user, snapshot) {
            Ok(outcome) => Ok(outcome),
            Err(err) if cached => {
                warn!("Primary store save failed: {}", err);
                Ok(SaveOutcome::Degraded(format!(
                    "Couldn't save to {}; changes kept in local cache",
                    self.primary.location(user)
                )))
            }
            Err(err) => Err(err),
        }
    }

    fn location(&self, user: &str) -> String {
        self.primary.location(user)
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
