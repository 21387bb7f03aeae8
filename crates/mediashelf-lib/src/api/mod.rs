//! # API Module
//!
//! Metadata provider abstraction layer and its live clients.
//!
//! ## Modules
//!
//! - [`provider`] - Provider traits, errors and the per-family [`ProviderSet`]
//! - [`ranked_search`] - Search-as-you-type over a provider
//! - [`tmdb`], [`jikan`], [`rawg`] - Live film/TV, anime/manga and game clients

pub mod jikan;
pub mod provider;
pub mod ranked_search;
pub mod rawg;
pub mod tmdb;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use provider::{
    MetadataProvider, ProviderError, ProviderFuture, ProviderSet, TrendingProvider,
};
pub use ranked_search::{search_as_you_type, search_failure_message};
