// Tests for search-as-you-type over mock providers

use super::*;
use crate::api::mock::MockMetadataProvider;
use crate::primitives::{AnimeMedia, Candidate, ProviderFamily, ProviderIds, ScreenMedia};
use std::sync::Arc;

fn film(id: u64, title: &str) -> Candidate {
    Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: id,
            media: ScreenMedia::Movie,
        },
        title,
    )
}

#[tokio::test]
async fn test_search_ranks_provider_results() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv).with_search_results(
        "blade run",
        vec![film(1, "Blade"), film(2, "Blade Runner 2049"), film(3, "Blade Runner")],
    );
    let providers = ProviderSet::new().with_provider(Arc::new(mock.clone()));

    let suggestions = search_as_you_type(&providers, MediaKind::Movie, "blade run")
        .await
        .unwrap();

    let titles: Vec<_> = suggestions.candidates().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Blade Runner", "Blade Runner 2049", "Blade"]);
    assert_eq!(suggestions.ghost.as_deref(), Some("Blade Runner"));
    assert_eq!(mock.search_calls(), 1);
}

#[tokio::test]
async fn test_short_query_skips_provider() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv);
    let providers = ProviderSet::new().with_provider(Arc::new(mock.clone()));

    let suggestions = search_as_you_type(&providers, MediaKind::Movie, "a")
        .await
        .unwrap();

    assert!(suggestions.is_empty());
    assert_eq!(mock.search_calls(), 0);
}

#[tokio::test]
async fn test_missing_provider_yields_no_suggestions() {
    let providers = ProviderSet::new();

    let books = search_as_you_type(&providers, MediaKind::Book, "dune")
        .await
        .unwrap();
    let games = search_as_you_type(&providers, MediaKind::Game, "hades")
        .await
        .unwrap();

    assert!(books.is_empty());
    assert!(games.is_empty());
}

#[tokio::test]
async fn test_provider_failure_propagates_to_caller() {
    let mock = MockMetadataProvider::new(ProviderFamily::AnimeManga)
        .with_search_error("naruto", "timed out");
    let providers = ProviderSet::new().with_provider(Arc::new(mock));

    let err = search_as_you_type(&providers, MediaKind::Anime, "Naruto")
        .await
        .unwrap_err();

    assert_eq!(
        search_failure_message(&err),
        "Search unavailable: Provider unavailable: timed out"
    );
}

#[tokio::test]
async fn test_search_passes_kind_through() {
    let manga = Candidate::new(
        ProviderIds::AnimeManga {
            mal_id: 2,
            media: AnimeMedia::Manga,
        },
        "Berserk",
    );
    let mock = MockMetadataProvider::new(ProviderFamily::AnimeManga)
        .with_search_results("berserk", vec![manga]);
    let providers = ProviderSet::new().with_provider(Arc::new(mock.clone()));

    let suggestions = search_as_you_type(&providers, MediaKind::Manga, "  berserk ")
        .await
        .unwrap();

    assert_eq!(suggestions.top().map(|c| c.kind()), Some(MediaKind::Manga));
    assert_eq!(
        mock.calls(),
        vec![crate::api::mock::ProviderCall::Search {
            kind: MediaKind::Manga,
            query: "berserk".to_string()
        }]
    );
}
