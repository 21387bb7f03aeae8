//! The decision engine
//!
//! Everything here is side-effect free apart from provider calls made
//! through a [`ProviderSet`](crate::api::ProviderSet). Persistence happens
//! one layer up, in the command handlers.

pub mod debounce;
pub mod fuzzy;
pub mod progress;
pub mod recommend;
pub mod resolver;
pub mod state;
pub mod suggest;

pub use debounce::{FeedOutcome, SearchKey, SuggestionFeed};
pub use recommend::{
    RecommendMode, Recommendation, RecommendationReport, RecommendedCandidate, TasteProfile,
    recommend, recommend_with_rng,
};
pub use resolver::{Resolution, resolve, resolve_with};
pub use state::{LibraryError, LibraryState, PendingRestore, RestoreOutcome};
pub use suggest::{ScoredCandidate, Suggestions, rank};
