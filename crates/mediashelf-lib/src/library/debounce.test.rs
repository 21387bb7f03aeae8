// Debounce and staleness tests; all run with paused time

use super::*;
use crate::api::mock::MockMetadataProvider;
use crate::primitives::{Candidate, ProviderFamily, ProviderIds, ScreenMedia};
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

fn feed_with(mock: &MockMetadataProvider) -> Arc<SuggestionFeed> {
    let providers = ProviderSet::new().with_provider(Arc::new(mock.clone()));
    Arc::new(SuggestionFeed::new(providers))
}

fn titles(suggestions: &Suggestions) -> Vec<String> {
    suggestions.candidates().map(|c| c.title.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_single_query_updates_after_quiet_period() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_results("dune", vec![film(1, "Dune")]);
    let feed = feed_with(&mock);

    let outcome = feed.query_changed(MediaKind::Movie, "dune").await;

    assert!(matches!(outcome, FeedOutcome::Updated(ref s) if titles(s) == vec!["Dune"]));
    assert_eq!(titles(&feed.suggestions().await), vec!["Dune"]);
    assert_eq!(mock.search_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_keystrokes_coalesce_to_last() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_results("du", vec![film(2, "Dumbo")])
        .with_search_results("dune", vec![film(1, "Dune")]);
    let feed = feed_with(&mock);

    let first = tokio::spawn({
        let feed = feed.clone();
        async move { feed.query_changed(MediaKind::Movie, "du").await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = feed.query_changed(MediaKind::Movie, "dune").await;

    assert_eq!(first.await.unwrap(), FeedOutcome::Superseded);
    assert!(matches!(second, FeedOutcome::Updated(_)));
    assert_eq!(mock.search_calls(), 1, "only the last keystroke reaches the provider");
    assert_eq!(titles(&feed.suggestions().await), vec!["Dune"]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    // Both lookups reach the provider; the first answers after the key changed
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_latency(Duration::from_millis(500))
        .with_search_results("dune", vec![film(1, "Dune")])
        .with_search_results("alien", vec![film(3, "Alien")]);
    let feed = feed_with(&mock);

    let first = tokio::spawn({
        let feed = feed.clone();
        async move { feed.query_changed(MediaKind::Movie, "dune").await }
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
    let second = tokio::spawn({
        let feed = feed.clone();
        async move { feed.query_changed(MediaKind::Movie, "alien").await }
    });

    assert_eq!(first.await.unwrap(), FeedOutcome::Superseded);
    assert!(feed.suggestions().await.is_empty(), "stale results must not be applied");

    assert!(matches!(second.await.unwrap(), FeedOutcome::Updated(_)));
    assert_eq!(titles(&feed.suggestions().await), vec!["Alien"]);
    assert_eq!(mock.search_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_kind_change_is_a_new_key() {
    let key_movie = SearchKey::new(MediaKind::Movie, "Dune!");
    let key_tv = SearchKey::new(MediaKind::Tv, "dune");

    assert_eq!(key_movie.query, "dune");
    assert_ne!(key_movie, key_tv);
}

#[tokio::test(start_paused = true)]
async fn test_short_query_clears_without_lookup() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_results("dune", vec![film(1, "Dune")]);
    let feed = feed_with(&mock);

    feed.query_changed(MediaKind::Movie, "dune").await;
    let outcome = feed.query_changed(MediaKind::Movie, "d").await;

    assert_eq!(outcome, FeedOutcome::Updated(Suggestions::default()));
    assert!(feed.suggestions().await.is_empty());
    assert_eq!(mock.search_calls(), 1);
    assert_eq!(
        feed.current_key().await,
        Some(SearchKey::new(MediaKind::Movie, "d"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_provider_failure_reports_status() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_results("dune", vec![film(1, "Dune")])
        .with_search_error("heat", "503");
    let feed = feed_with(&mock);

    feed.query_changed(MediaKind::Movie, "dune").await;
    let outcome = feed.query_changed(MediaKind::Movie, "heat").await;

    match outcome {
        FeedOutcome::Failed(message) => assert!(message.contains("503"), "{}", message),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(feed.suggestions().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_custom_quiet_period() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv);
    let feed = SuggestionFeed::new(ProviderSet::new().with_provider(Arc::new(mock)))
        .with_quiet_period(Duration::from_millis(10));

    let start = tokio::time::Instant::now();
    feed.query_changed(MediaKind::Movie, "heat").await;

    assert!(start.elapsed() >= Duration::from_millis(10));
    assert!(start.elapsed() < DEFAULT_QUIET_PERIOD);
}
