use super::*;

fn show(id: u64, title: &str) -> Candidate {
    Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: id,
            media: ScreenMedia::Tv,
        },
        title,
    )
}

#[tokio::test]
async fn test_mock_search_matches_normalized_query() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_results("The Office", vec![show(2316, "The Office")]);

    let results = mock.search(MediaKind::Tv, "the office!").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        mock.calls(),
        vec![ProviderCall::Search {
            kind: MediaKind::Tv,
            query: "the office!".to_string()
        }]
    );
}

#[tokio::test]
async fn test_mock_unregistered_lookups_are_empty() {
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv);
    let ids = show(1, "x").ids;

    assert!(mock.search(MediaKind::Tv, "nothing").await.unwrap().is_empty());
    assert_eq!(mock.details(ids).await.unwrap(), CandidateDetails::default());
    assert!(mock.similar(ids).await.unwrap().is_empty());
    assert_eq!(mock.calls().len(), 3);
    assert_eq!(mock.search_calls(), 1);
}

#[tokio::test]
async fn test_mock_registered_errors() {
    let ids = show(7, "Broken").ids;
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_error("broken", "search down")
        .with_details_error(ids, "details down");

    let search = mock.search(MediaKind::Tv, "Broken").await;
    let details = mock.details(ids).await;

    assert!(matches!(search, Err(ProviderError::Unavailable { ref message }) if message == "search down"));
    assert!(matches!(details, Err(ProviderError::Unavailable { .. })));
}

#[tokio::test]
async fn test_mock_trending_feed() {
    let trending = MockTrendingProvider::new()
        .with_trending(ScreenMedia::Tv, vec![show(1, "Severance")])
        .with_trending_error(ScreenMedia::Movie, "rate limited");

    assert_eq!(trending.trending(ScreenMedia::Tv).await.unwrap().len(), 1);
    assert!(trending.trending(ScreenMedia::Movie).await.is_err());
    assert_eq!(trending.calls().len(), 2);
}
