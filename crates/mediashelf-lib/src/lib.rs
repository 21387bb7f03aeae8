//! # mediashelf Library
//!
//! Personal media library: track films, shows, anime, manga, games and
//! books, link them to metadata providers, and get recommendations.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Records, candidates, shared enums and errors
//! - [`library`] - The decision engine: matching, ranking, resolution,
//!   progress and recommendations
//! - [`api`] - Metadata provider traits and live clients
//! - [`store`] - Per-user JSON persistence with a local fallback copy
//! - [`logger`] - Structured logging with progress tracking
//! - [`networking`] - Shared HTTP client and bounded concurrency
//! - [`display`] - Terminal output behind mockable providers
//! - [`application`] - CLI interface, configuration and command sessions
//!
//! ## Quick Start
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     mediashelf_lib::main().await
//! }
//! ```

pub mod api;
pub mod application;
pub mod display;
pub mod library;
pub mod logger;
pub mod networking;
pub mod primitives;
pub mod store;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use logger::Logger;
pub use networking::{NetworkingConfig, NetworkingManager};
pub use primitives::{
    Candidate, ConfigError, Draft, ItemUpdate, LibraryItem, LogFormat, LogLevel, LogOutput,
    LoggerError, MediaKind, Rating, WatchStatus,
};
pub use store::{FallbackStore, JsonFileStore, LibraryStore};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub async fn main() -> Result<()> {
    // Load CLI configuration
    let config = CliConfig::load()?;

    // Execute the command
    execute_command(config).await
}
