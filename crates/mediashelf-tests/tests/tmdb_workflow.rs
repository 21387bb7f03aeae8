//! E2E tests driving the live TMDB client against recorded responses
//!
//! A mockito server replays the cassettes under `fixtures/cassettes/tmdb`;
//! the library itself is written to a temporary data directory.

use anyhow::Result;
use mediashelf_lib::api::provider::ProviderSet;
use mediashelf_lib::api::tmdb::TmdbProvider;
use mediashelf_lib::application::cli::{AddArgs, Commands};
use mediashelf_lib::application::commands::execute_command_with_session;
use mediashelf_lib::display::DisplayCall;
use mediashelf_lib::primitives::{MediaKind, WatchStatus};
use mediashelf_tests::TestEnvironment;
use mediashelf_tests::fixtures::load_fixture;
use mockito::{Matcher, Mock, Server, ServerGuard};
use reqwest::Client;
use std::sync::Arc;

const API_KEY: &str = "test-key";

fn tmdb_providers(server: &ServerGuard) -> ProviderSet {
    let tmdb = Arc::new(TmdbProvider::with_base_url(
        Client::new(),
        API_KEY.to_string(),
        server.url(),
    ));
    ProviderSet::new().with_provider(tmdb.clone()).with_trending(tmdb)
}

async fn replay(server: &mut ServerGuard, path: &str, fixture: &str) -> Result<Mock> {
    Ok(server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("api_key".to_string(), API_KEY.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(load_fixture(fixture)?)
        .create_async()
        .await)
}

fn add_the_wire() -> Commands {
    Commands::Add(AddArgs {
        kind: MediaKind::Tv,
        title: vec!["the".to_string(), "wire".to_string()],
        status: Some(WatchStatus::Completed),
        rating: Some(9.5),
        tags: vec!["hbo".to_string()],
        current: None,
        total: None,
        note: None,
        pick: Some(1),
        offline: false,
    })
}

#[tokio::test]
async fn e2e_search_ranks_recorded_results() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut server = Server::new_async().await;
    let search = replay(&mut server, "/3/search/tv", "tmdb/search_tv_the_wire.json").await?;

    let session = env.session().with_providers(tmdb_providers(&server)).build()?;
    execute_command_with_session(
        Commands::Search {
            kind: MediaKind::Tv,
            query: vec!["the".to_string(), "wir".to_string()],
        },
        &session,
    )
    .await?;

    search.assert_async().await;
    let calls = session.display_calls().get_calls();
    let rows = calls
        .iter()
        .find_map(|call| match call {
            DisplayCall::StructuredTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .expect("search should render a table");
    assert_eq!(rows[0][1], "The Wire (2002)");
    assert!(session.display_calls().shows("the wir → The Wire"));
    Ok(())
}

#[tokio::test]
async fn e2e_add_with_pick_resolves_details() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut server = Server::new_async().await;
    let _search = replay(&mut server, "/3/search/tv", "tmdb/search_tv_the_wire.json").await?;
    let details = replay(&mut server, "/3/tv/1438", "tmdb/tv_1438.json").await?;

    let session = env.session().with_providers(tmdb_providers(&server)).build()?;
    execute_command_with_session(add_the_wire(), &session).await?;

    details.assert_async().await;
    assert!(session.display_calls().shows("Linked to tmdb:tv/1438"));

    let document = env.read_library()?;
    let item = &document["items"][0];
    assert_eq!(item["title"], "The Wire");
    assert_eq!(item["kind"], "tv");
    assert_eq!(item["auto_tags"], serde_json::json!(["Crime", "Drama"]));
    assert_eq!(item["manual_tags"], serde_json::json!(["hbo"]));
    assert_eq!(item["runtime_minutes"], 60);
    assert_eq!(item["progress_total"]["auto"], 60);
    assert_eq!(item["progress_current"]["auto"], 60);
    assert_eq!(item["rating"], 9.5);
    Ok(())
}

#[tokio::test]
async fn e2e_recommend_from_linked_seed() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mut server = Server::new_async().await;
    let _search = replay(&mut server, "/3/search/tv", "tmdb/search_tv_the_wire.json").await?;
    let _seed = replay(&mut server, "/3/tv/1438", "tmdb/tv_1438.json").await?;
    let recommendations = replay(
        &mut server,
        "/3/tv/1438/recommendations",
        "tmdb/tv_1438_recommendations.json",
    )
    .await?;
    let _sopranos = replay(&mut server, "/3/tv/1398", "tmdb/tv_1398.json").await?;
    let _saul = server
        .mock("GET", "/3/tv/60059")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let _trending = server
        .mock("GET", Matcher::Regex(r"^/3/trending/(movie|tv)/week$".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page":1,"results":[]}"#)
        .create_async()
        .await;

    let providers = tmdb_providers(&server);
    let session = env.session().with_providers(providers.clone()).build()?;
    execute_command_with_session(add_the_wire(), &session).await?;

    let session = env.session().with_providers(providers).build()?;
    execute_command_with_session(Commands::Recommend { random: false }, &session).await?;

    recommendations.assert_async().await;
    let display = session.display_calls();
    assert!(display.shows("Recommended for you"));
    assert!(display.shows("Couldn't load details for 1 of 2 candidates"));

    let calls = display.get_calls();
    let rows = calls
        .iter()
        .find_map(|call| match call {
            DisplayCall::StructuredTable { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .expect("recommendations should render a table");
    let titles: Vec<&str> = rows.iter().map(|row| row[1].as_str()).collect();
    assert_eq!(titles, vec!["The Sopranos (1999)", "Better Call Saul (2015)"]);
    Ok(())
}
