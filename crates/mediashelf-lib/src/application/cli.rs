use crate::primitives::{ItemUpdate, MediaKind, TagSet, WatchStatus};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use super::config::AppConfig;

/// mediashelf CLI - personal media library
#[derive(Debug, Clone, Parser)]
#[command(name = "mediashelf")]
#[command(about = "Track the films, shows, anime, books and games you get through")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// mediashelf commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

/// Available mediashelf commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show version and configured providers
    Version,

    /// Search a provider and show ranked suggestions
    Search {
        /// Kind of media to search
        #[arg(value_enum)]
        kind: MediaKind,

        /// Title to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Add a title to the library
    Add(AddArgs),

    /// List library records
    List {
        /// Only show this kind
        #[arg(short, long, value_enum)]
        kind: Option<MediaKind>,

        /// Only show this status
        #[arg(short, long, value_enum)]
        status: Option<WatchStatus>,
    },

    /// Show one record in full
    Show {
        /// Title or id prefix
        item: String,
    },

    /// Change fields of a record
    Edit(EditArgs),

    /// Advance progress by one episode, chapter or volume
    Next {
        /// Title or id prefix
        item: String,
    },

    /// Step progress back by one
    Prev {
        /// Title or id prefix
        item: String,
    },

    /// Remove a record (restorable with `undo` for a short while)
    Remove {
        /// Title or id prefix
        item: String,
    },

    /// Restore the most recently removed record
    Undo,

    /// Suggest what to pick up next
    Recommend {
        /// Pick one title at random, weighted by score
        #[arg(short, long)]
        random: bool,
    },
}

/// Arguments for `add`
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Kind of media
    #[arg(value_enum)]
    pub kind: MediaKind,

    /// Title to add; also used as the search query
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    /// Initial status
    #[arg(short, long, value_enum)]
    pub status: Option<WatchStatus>,

    /// Rating from 0 to 10
    #[arg(short, long)]
    pub rating: Option<f64>,

    /// Manual tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Episodes, chapters or volumes done
    #[arg(long, allow_negative_numbers = true)]
    pub current: Option<i64>,

    /// Total episodes, chapters or volumes
    #[arg(long, allow_negative_numbers = true)]
    pub total: Option<i64>,

    /// Free-form note
    #[arg(short, long)]
    pub note: Option<String>,

    /// Link the Nth suggestion without prompting
    #[arg(short, long)]
    pub pick: Option<usize>,

    /// Skip the provider search and add the title as typed
    #[arg(long, conflicts_with = "pick")]
    pub offline: bool,
}

impl AddArgs {
    pub fn title(&self) -> String {
        self.title.join(" ")
    }

    /// Field values given on the command line, as an update
    pub fn to_update(&self) -> ItemUpdate {
        fields_update(
            self.status,
            self.rating,
            self.current,
            self.total,
            self.note.as_deref(),
            &self.tags,
            None,
        )
    }
}

/// Arguments for `edit`
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Title or id prefix
    pub item: String,

    /// New status
    #[arg(short, long, value_enum)]
    pub status: Option<WatchStatus>,

    /// Rating from 0 to 10
    #[arg(short, long, conflicts_with = "clear_rating")]
    pub rating: Option<f64>,

    /// Remove the rating
    #[arg(long)]
    pub clear_rating: bool,

    /// Episodes, chapters or volumes done
    #[arg(long, allow_negative_numbers = true)]
    pub current: Option<i64>,

    /// Total episodes, chapters or volumes
    #[arg(long, allow_negative_numbers = true)]
    pub total: Option<i64>,

    /// Replace the note
    #[arg(short, long)]
    pub note: Option<String>,

    /// Replace manual tags (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Finish date (YYYY-MM-DD)
    #[arg(long)]
    pub finished: Option<NaiveDate>,
}

impl EditArgs {
    pub fn to_update(&self) -> ItemUpdate {
        let mut update = fields_update(
            self.status,
            self.rating,
            self.current,
            self.total,
            self.note.as_deref(),
            &self.tags,
            self.finished,
        );
        if self.clear_rating {
            update.rating = Some(None);
        }
        update
    }
}

fn fields_update(
    status: Option<WatchStatus>,
    rating: Option<f64>,
    current: Option<i64>,
    total: Option<i64>,
    note: Option<&str>,
    tags: &[String],
    finished: Option<NaiveDate>,
) -> ItemUpdate {
    let mut update = ItemUpdate::new();
    if let Some(status) = status {
        update = update.with_status(status);
    }
    if let Some(rating) = rating {
        update = update.with_rating(rating);
    }
    if let Some(current) = current {
        update = update.with_progress_current(current);
    }
    if let Some(total) = total {
        update = update.with_progress_total(total);
    }
    if let Some(note) = note {
        update = update.with_note(note);
    }
    if !tags.is_empty() {
        update = update.with_manual_tags(tags.iter().collect::<TagSet>());
    }
    if let Some(finished) = finished {
        update = update.with_date_finished(finished);
    }
    update
}

impl Commands {
    /// Whether the command reads or writes the library file
    pub fn uses_library(&self) -> bool {
        !matches!(self, Commands::Version | Commands::Search { .. })
    }

    /// Whether the command writes the library file
    pub fn mutates_library(&self) -> bool {
        matches!(
            self,
            Commands::Add(_)
                | Commands::Edit(_)
                | Commands::Next { .. }
                | Commands::Prev { .. }
                | Commands::Remove { .. }
                | Commands::Undo
        )
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
