use super::*;
use crate::api::mock::{MockMetadataProvider, MockTrendingProvider};

#[test]
fn test_provider_set_slots_by_family() {
    let set = ProviderSet::new()
        .with_provider(Arc::new(MockMetadataProvider::new(ProviderFamily::FilmTv)))
        .with_provider(Arc::new(MockMetadataProvider::new(ProviderFamily::AnimeManga)));

    assert!(set.for_kind(MediaKind::Movie).is_some());
    assert!(set.for_kind(MediaKind::Tv).is_some());
    assert!(set.for_kind(MediaKind::Anime).is_some());
    assert!(set.for_kind(MediaKind::Manga).is_some());
    assert!(set.for_kind(MediaKind::Game).is_none());
    assert!(set.trending().is_none());
    assert_eq!(set.names().len(), 2);
}

#[test]
fn test_books_never_have_a_provider() {
    let set = ProviderSet::new()
        .with_provider(Arc::new(MockMetadataProvider::new(ProviderFamily::FilmTv)))
        .with_provider(Arc::new(MockMetadataProvider::new(ProviderFamily::Game)))
        .with_provider(Arc::new(MockMetadataProvider::new(ProviderFamily::AnimeManga)));

    assert!(set.for_kind(MediaKind::Book).is_none());
}

#[test]
fn test_provider_set_empty_and_trending() {
    assert!(ProviderSet::new().is_empty());

    let set = ProviderSet::new().with_trending(Arc::new(MockTrendingProvider::new()));
    assert!(!set.is_empty());
    assert!(set.trending().is_some());
}

#[tokio::test]
async fn test_get_json_maps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/ok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value": 42}"#)
        .create_async()
        .await;
    let missing = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    #[derive(Debug, serde::Deserialize)]
    struct Body {
        value: u32,
    }

    let client = reqwest::Client::new();
    let body: Body = get_json("test", client.get(format!("{}/ok", server.url())))
        .await
        .unwrap();
    assert_eq!(body.value, 42);

    let err = get_json::<Body>("test", client.get(format!("{}/missing", server.url())))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::HttpStatus { status: 404, .. }));

    ok.assert_async().await;
    missing.assert_async().await;
}

#[tokio::test]
async fn test_get_json_rejects_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/bad")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = reqwest::Client::new();
    let result = get_json::<serde_json::Value>("test", client.get(format!("{}/bad", server.url()))).await;

    assert!(matches!(result, Err(ProviderError::JsonError { .. })));
}
