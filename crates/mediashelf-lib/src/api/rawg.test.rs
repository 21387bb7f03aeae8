// Tests for the RAWG provider against a local mock server

use super::*;
use mockito::{Matcher, Server};

fn provider(server: &Server) -> RawgProvider {
    RawgProvider::with_base_url(Client::new(), "rawg-key".to_string(), server.url())
}

#[tokio::test]
async fn test_search_games() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".to_string(), "rawg-key".to_string()),
            Matcher::UrlEncoded("search".to_string(), "hades".to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"count":1,"results":[{"id":274755,"name":"Hades","released":"2020-09-17",
                "background_image":"https://media.rawg.io/h.jpg","playtime":22,
                "genres":[{"id":4,"name":"Action"},{"id":51,"name":"Indie"}]}]}"#,
        )
        .create_async()
        .await;

    let results = provider(&server)
        .search(MediaKind::Game, "hades")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Hades");
    assert_eq!(results[0].subtitle.as_deref(), Some("2020"));
    assert_eq!(results[0].runtime_minutes, Some(22 * 60));
    assert_eq!(results[0].genres, vec!["Action", "Indie"]);
    assert_eq!(results[0].ids, ProviderIds::Game { rawg_id: 274755 });
}

#[tokio::test]
async fn test_zero_playtime_is_unknown() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/games/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":42,"name":"Obscure","playtime":0,"genres":[]}"#)
        .create_async()
        .await;

    let details = provider(&server)
        .details(ProviderIds::Game { rawg_id: 42 })
        .await
        .unwrap();

    assert_eq!(details.runtime_minutes, None);
    assert_eq!(details.progress_total, None);
}

#[tokio::test]
async fn test_game_series_as_similar() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/games/3328/game-series")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[{"id":3070,"name":"The Witcher 2"},{"id":11,"name":""}]}"#)
        .create_async()
        .await;

    let similar = provider(&server)
        .similar(ProviderIds::Game { rawg_id: 3328 })
        .await
        .unwrap();

    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].title, "The Witcher 2");
}

#[tokio::test]
async fn test_non_game_kinds_are_unsupported() {
    let server = Server::new_async().await;

    let result = provider(&server).search(MediaKind::Book, "dune").await;

    assert!(matches!(result, Err(ProviderError::UnsupportedKind { .. })));
}

#[tokio::test]
async fn test_foreign_ids_are_rejected() {
    let server = Server::new_async().await;

    let result = provider(&server)
        .similar(ProviderIds::FilmTv {
            tmdb_id: 1,
            media: crate::primitives::ScreenMedia::Movie,
        })
        .await;

    assert!(matches!(result, Err(ProviderError::ForeignIdentifier { .. })));
}
