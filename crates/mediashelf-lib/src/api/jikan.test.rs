// Tests for the Jikan provider against a local mock server

use super::*;
use mockito::{Matcher, Server};

fn provider(server: &Server) -> JikanProvider {
    JikanProvider::with_base_url(Client::new(), server.url())
}

#[test]
fn test_parse_duration_minutes() {
    assert_eq!(parse_duration_minutes("24 min per ep"), Some(24));
    assert_eq!(parse_duration_minutes("1 hr 50 min"), Some(110));
    assert_eq!(parse_duration_minutes("2 hr"), Some(120));
    assert_eq!(parse_duration_minutes("Unknown"), None);
    assert_eq!(parse_duration_minutes(""), None);
}

#[tokio::test]
async fn test_search_anime() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v4/anime")
        .match_query(Matcher::UrlEncoded("q".to_string(), "frieren".to_string()))
        .with_status(200)
        .with_body(
            r#"{"data":[{
                "mal_id":52991,
                "title":"Sousou no Frieren",
                "title_english":"Frieren: Beyond Journey's End",
                "images":{"jpg":{"image_url":"https://cdn.myanimelist.net/f.jpg"}},
                "episodes":28,
                "duration":"24 min per ep",
                "year":2023,
                "genres":[{"mal_id":2,"name":"Adventure"},{"mal_id":8,"name":"Drama"}],
                "themes":[]
            }]}"#,
        )
        .create_async()
        .await;

    let results = provider(&server)
        .search(MediaKind::Anime, "frieren")
        .await
        .unwrap();

    mock.assert_async().await;
    let frieren = &results[0];
    assert_eq!(frieren.title, "Sousou no Frieren");
    assert_eq!(frieren.subtitle.as_deref(), Some("2023"));
    assert_eq!(frieren.progress_total, Some(28));
    assert_eq!(frieren.runtime_minutes, Some(24));
    assert_eq!(frieren.genres, vec!["Adventure", "Drama"]);
    assert_eq!(frieren.kind(), MediaKind::Anime);
}

#[tokio::test]
async fn test_search_manga_prefers_chapters() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/manga")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"data":[
                {"mal_id":2,"title":"Berserk","chapters":null,"volumes":42,"published":{"from":"1989-08-25T00:00:00+00:00"}},
                {"mal_id":13,"title":"One Piece","chapters":1100,"volumes":107}
            ]}"#,
        )
        .create_async()
        .await;

    let results = provider(&server)
        .search(MediaKind::Manga, "berserk")
        .await
        .unwrap();

    assert_eq!(results[0].progress_total, Some(42));
    assert_eq!(results[0].subtitle.as_deref(), Some("1989"));
    assert_eq!(results[1].progress_total, Some(1100));
}

#[tokio::test]
async fn test_full_details_merge_genres_and_themes() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/anime/5114/full")
        .with_status(200)
        .with_body(
            r#"{"data":{"mal_id":5114,"title":"Fullmetal Alchemist: Brotherhood","episodes":64,
                "duration":"24 min per ep",
                "genres":[{"name":"Action"}],"themes":[{"name":"Military"}]}}"#,
        )
        .create_async()
        .await;

    let details = provider(&server)
        .details(ProviderIds::AnimeManga {
            mal_id: 5114,
            media: AnimeMedia::Anime,
        })
        .await
        .unwrap();

    assert_eq!(details.genres, vec!["Action", "Military"]);
    assert_eq!(details.progress_total, Some(64));
}

#[tokio::test]
async fn test_recommendations_unwrap_entries() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/anime/5114/recommendations")
        .with_status(200)
        .with_body(r#"{"data":[{"entry":{"mal_id":121,"title":"Fullmetal Alchemist"},"votes":300}]}"#)
        .create_async()
        .await;

    let similar = provider(&server)
        .similar(ProviderIds::AnimeManga {
            mal_id: 5114,
            media: AnimeMedia::Anime,
        })
        .await
        .unwrap();

    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].title, "Fullmetal Alchemist");
}

#[tokio::test]
async fn test_rate_limit_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v4/anime")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let result = provider(&server).search(MediaKind::Anime, "naruto").await;

    assert!(matches!(
        result,
        Err(ProviderError::HttpStatus { status: 429, .. })
    ));
}

#[tokio::test]
async fn test_movie_kind_is_unsupported() {
    let server = Server::new_async().await;

    let result = provider(&server).search(MediaKind::Movie, "akira").await;

    assert!(matches!(result, Err(ProviderError::UnsupportedKind { .. })));
}
