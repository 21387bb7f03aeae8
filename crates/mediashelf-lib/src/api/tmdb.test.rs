// Tests for the TMDB provider against a local mock server

use super::*;
use mockito::{Matcher, Server};

fn provider(server: &Server) -> TmdbProvider {
    TmdbProvider::with_base_url(Client::new(), "test-key".to_string(), server.url())
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_movie_maps_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".to_string(), "test-key".to_string()),
            Matcher::UrlEncoded("query".to_string(), "the matrix".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"page":1,"results":[
                {"id":603,"title":"The Matrix","release_date":"1999-03-30","poster_path":"/m.jpg","genre_ids":[28,878]},
                {"id":604,"title":"","release_date":"2003-05-15"},
                {"id":605,"title":"The Matrix Revolutions","release_date":""}
            ]}"#,
        )
        .create_async()
        .await;

    let results = provider(&server)
        .search(MediaKind::Movie, "the matrix")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 2, "blank titles are skipped");
    assert_eq!(results[0].title, "The Matrix");
    assert_eq!(results[0].subtitle.as_deref(), Some("1999"));
    assert_eq!(
        results[0].cover_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w342/m.jpg")
    );
    assert_eq!(results[0].genres, vec!["Action", "Science Fiction"]);
    assert_eq!(results[0].kind(), MediaKind::Movie);
    assert_eq!(results[1].subtitle, None);
}

#[tokio::test]
async fn test_search_tv_uses_name_field() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/3/search/tv")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[{"id":1396,"name":"Breaking Bad","first_air_date":"2008-01-20"}]}"#)
        .create_async()
        .await;

    let results = provider(&server)
        .search(MediaKind::Tv, "breaking bad")
        .await
        .unwrap();

    assert_eq!(results[0].title, "Breaking Bad");
    assert_eq!(results[0].subtitle.as_deref(), Some("2008"));
    assert_eq!(
        results[0].ids,
        ProviderIds::FilmTv {
            tmdb_id: 1396,
            media: ScreenMedia::Tv
        }
    );
}

#[tokio::test]
async fn test_search_rejects_other_kinds() {
    let server = Server::new_async().await;

    let result = provider(&server).search(MediaKind::Game, "portal").await;

    assert!(matches!(result, Err(ProviderError::UnsupportedKind { .. })));
}

#[tokio::test]
async fn test_search_http_error_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let result = provider(&server).search(MediaKind::Movie, "x y").await;

    assert!(matches!(
        result,
        Err(ProviderError::HttpStatus { status: 401, .. })
    ));
}

// ============================================================================
// Details, recommendations, trending
// ============================================================================

#[tokio::test]
async fn test_tv_details_carry_episode_count() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/3/tv/1396")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"id":1396,"genres":[{"id":18,"name":"Drama"},{"id":80,"name":"Crime"}],
                "episode_run_time":[47],"number_of_episodes":62,"poster_path":"/bb.jpg"}"#,
        )
        .create_async()
        .await;

    let details = provider(&server)
        .details(ProviderIds::FilmTv {
            tmdb_id: 1396,
            media: ScreenMedia::Tv,
        })
        .await
        .unwrap();

    assert_eq!(details.genres, vec!["Drama", "Crime"]);
    assert_eq!(details.runtime_minutes, Some(47));
    assert_eq!(details.progress_total, Some(62));
    assert!(details.cover_url.unwrap().ends_with("/bb.jpg"));
}

#[tokio::test]
async fn test_movie_details_use_runtime() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/3/movie/603")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":603,"genres":[],"runtime":136}"#)
        .create_async()
        .await;

    let details = provider(&server)
        .details(ProviderIds::FilmTv {
            tmdb_id: 603,
            media: ScreenMedia::Movie,
        })
        .await
        .unwrap();

    assert_eq!(details.runtime_minutes, Some(136));
    assert_eq!(details.progress_total, None);
}

#[tokio::test]
async fn test_details_reject_foreign_ids() {
    let server = Server::new_async().await;

    let result = provider(&server)
        .details(ProviderIds::Game { rawg_id: 1 })
        .await;

    assert!(matches!(result, Err(ProviderError::ForeignIdentifier { .. })));
}

#[tokio::test]
async fn test_recommendations_and_trending() {
    let mut server = Server::new_async().await;
    let _similar = server
        .mock("GET", "/3/tv/1396/recommendations")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[{"id":60059,"name":"Better Call Saul","genre_ids":[18]}]}"#)
        .create_async()
        .await;
    let _trending = server
        .mock("GET", "/3/trending/movie/week")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results":[{"id":1,"title":"Dune"},{"id":2,"title":"Heat"}]}"#)
        .create_async()
        .await;

    let tmdb = provider(&server);
    let similar = tmdb
        .similar(ProviderIds::FilmTv {
            tmdb_id: 1396,
            media: ScreenMedia::Tv,
        })
        .await
        .unwrap();
    let trending = tmdb.trending(ScreenMedia::Movie).await.unwrap();

    assert_eq!(similar[0].title, "Better Call Saul");
    assert_eq!(similar[0].genres, vec!["Drama"]);
    assert_eq!(trending.len(), 2);
    assert!(trending.iter().all(|c| c.kind() == MediaKind::Movie));
}

#[test]
fn test_genre_names() {
    assert_eq!(genre_name(18), Some("Drama"));
    assert_eq!(genre_name(10765), Some("Sci-Fi & Fantasy"));
    assert_eq!(genre_name(1), None);
}
