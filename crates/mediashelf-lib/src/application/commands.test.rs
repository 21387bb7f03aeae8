use super::*;
use crate::api::mock::{MockMetadataProvider, ProviderCall};
use crate::api::provider::ProviderSet;
use crate::application::config::AppConfig;
use crate::application::session_mocks::*;
use crate::display::DisplayCall;
use crate::primitives::{
    AnimeMedia, CandidateDetails, ProviderFamily, ProviderIds, ScreenMedia,
};
use chrono::{NaiveDate, TimeDelta};
use std::sync::Arc;

fn anime_ids(id: u64) -> ProviderIds {
    ProviderIds::AnimeManga {
        mal_id: id,
        media: AnimeMedia::Anime,
    }
}

fn bebop() -> Candidate {
    Candidate::new(anime_ids(1), "Cowboy Bebop").with_subtitle("1998")
}

fn anime_provider() -> MockMetadataProvider {
    MockMetadataProvider::new(ProviderFamily::AnimeManga)
        .with_search_results(
            "cowboy bebop",
            vec![
                bebop(),
                Candidate::new(anime_ids(5), "Cowboy Bebop: The Movie"),
            ],
        )
        .with_details(
            anime_ids(1),
            CandidateDetails {
                genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
                progress_total: Some(26),
                ..CandidateDetails::default()
            },
        )
}

fn session_with(store: &MemoryStore, provider: &MockMetadataProvider) -> MockCommandSession {
    MockCommandSession::new()
        .with_store(store.clone())
        .with_providers(ProviderSet::new().with_provider(Arc::new(provider.clone())))
}

fn add_args(kind: MediaKind, title: &str) -> AddArgs {
    AddArgs {
        kind,
        title: title.split(' ').map(str::to_string).collect(),
        status: None,
        rating: None,
        tags: Vec::new(),
        current: None,
        total: None,
        note: None,
        pick: None,
        offline: false,
    }
}

fn edit_args(item: &str) -> EditArgs {
    EditArgs {
        item: item.to_string(),
        status: None,
        rating: None,
        clear_rating: false,
        current: None,
        total: None,
        note: None,
        tags: Vec::new(),
        finished: None,
    }
}

async fn run(session: &MockCommandSession, command: Commands) {
    execute_command_with_session(command, session)
        .await
        .unwrap();
}

fn stored(store: &MemoryStore) -> Vec<LibraryItem> {
    store.snapshot("default").items
}

#[tokio::test]
async fn test_add_offline_uses_typed_fields() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());

    let mut args = add_args(MediaKind::Book, "The Left Hand of Darkness");
    args.offline = true;
    args.status = Some(WatchStatus::Completed);
    args.rating = Some(8.7);
    args.tags = vec!["sf".to_string()];
    run(&session, Commands::Add(args)).await;

    let items = stored(&store);
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.title, "The Left Hand of Darkness");
    assert_eq!(item.status, WatchStatus::Completed);
    assert_eq!(item.rating.map(|r| r.value()), Some(8.5));
    assert_eq!(item.date_finished, NaiveDate::from_ymd_opt(2024, 6, 1));
    assert!(item.manual_tags.contains("SF"));
    assert!(item.provider_ids.is_none());
    assert!(session.display_calls().shows("Added"));
}

#[tokio::test]
async fn test_add_keeps_chosen_status_when_progress_is_full() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());

    let mut args = add_args(MediaKind::Tv, "Some Show");
    args.offline = true;
    args.status = Some(WatchStatus::InProgress);
    args.current = Some(10);
    args.total = Some(10);
    run(&session, Commands::Add(args)).await;

    let items = stored(&store);
    assert_eq!(items[0].status, WatchStatus::InProgress);
    assert_eq!(items[0].date_finished, None);
    assert_eq!(items[0].effective_progress(), (Some(10), Some(10)));
}

#[tokio::test]
async fn test_add_without_status_completes_from_full_progress() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());

    let mut args = add_args(MediaKind::Tv, "Some Show");
    args.offline = true;
    args.current = Some(10);
    args.total = Some(10);
    run(&session, Commands::Add(args)).await;

    let items = stored(&store);
    assert_eq!(items[0].status, WatchStatus::Completed);
    assert_eq!(items[0].date_finished, NaiveDate::from_ymd_opt(2024, 6, 1));
}

#[tokio::test]
async fn test_add_with_pick_links_and_resolves() {
    let store = MemoryStore::new();
    let provider = anime_provider();
    let session = session_with(&store, &provider);

    let mut args = add_args(MediaKind::Anime, "cowboy bebop");
    args.pick = Some(1);
    run(&session, Commands::Add(args)).await;

    let items = stored(&store);
    let item = &items[0];
    assert_eq!(item.title, "Cowboy Bebop");
    assert_eq!(item.provider_ids, Some(anime_ids(1)));
    assert_eq!(item.auto_tags.iter().collect::<Vec<_>>(), vec!["Action", "Sci-Fi"]);
    assert_eq!(item.effective_progress(), (None, Some(26)));
    assert!(provider.calls().contains(&ProviderCall::Details(anime_ids(1))));
    assert!(session.display_calls().shows("mal:anime/1"));
}

#[tokio::test]
async fn test_add_never_links_without_a_pick() {
    let store = MemoryStore::new();
    let provider = anime_provider();
    let session = session_with(&store, &provider);

    run(&session, Commands::Add(add_args(MediaKind::Anime, "cowboy bebop"))).await;

    let prompts = session.interactive_provider.get_select_calls();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0].options,
        vec![
            "Cowboy Bebop (1998)".to_string(),
            "Cowboy Bebop: The Movie".to_string(),
            "Add as typed".to_string(),
        ]
    );

    let items = stored(&store);
    assert_eq!(items[0].title, "cowboy bebop");
    assert!(items[0].provider_ids.is_none());
    assert!(
        !provider
            .calls()
            .iter()
            .any(|call| matches!(call, ProviderCall::Details(_)))
    );
}

#[tokio::test]
async fn test_add_interactive_selection_links() {
    let store = MemoryStore::new();
    let provider = anime_provider();
    let session = session_with(&store, &provider)
        .with_interactive(MockInteractiveProvider::new().with_select(0));

    run(&session, Commands::Add(add_args(MediaKind::Anime, "cowboy bebop"))).await;

    assert_eq!(stored(&store)[0].provider_ids, Some(anime_ids(1)));
}

#[tokio::test]
async fn test_add_as_typed_option_stays_unlinked() {
    let store = MemoryStore::new();
    let provider = anime_provider();
    let session = session_with(&store, &provider)
        .with_interactive(MockInteractiveProvider::new().with_select(2));

    run(&session, Commands::Add(add_args(MediaKind::Anime, "cowboy bebop"))).await;

    assert!(stored(&store)[0].provider_ids.is_none());
}

#[tokio::test]
async fn test_add_pick_out_of_range_fails_without_saving() {
    let store = MemoryStore::new();
    let provider = anime_provider();
    let session = session_with(&store, &provider);

    let mut args = add_args(MediaKind::Anime, "cowboy bebop");
    args.pick = Some(9);
    let result = execute_command_with_session(Commands::Add(args), &session).await;

    assert!(result.unwrap_err().to_string().contains("No suggestion #9"));
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_add_survives_search_failure() {
    let store = MemoryStore::new();
    let provider =
        MockMetadataProvider::new(ProviderFamily::AnimeManga).with_search_error("akira", "down");
    let session = session_with(&store, &provider);

    run(&session, Commands::Add(add_args(MediaKind::Anime, "akira"))).await;

    assert_eq!(stored(&store).len(), 1);
    assert!(session.display_calls().shows("Search unavailable"));
}

#[tokio::test]
async fn test_add_details_failure_keeps_search_fields() {
    let store = MemoryStore::new();
    let provider = MockMetadataProvider::new(ProviderFamily::AnimeManga)
        .with_search_results("cowboy bebop", vec![bebop()])
        .with_details_error(anime_ids(1), "timeout");
    let session = session_with(&store, &provider);

    let mut args = add_args(MediaKind::Anime, "cowboy bebop");
    args.pick = Some(1);
    run(&session, Commands::Add(args)).await;

    assert_eq!(stored(&store)[0].title, "Cowboy Bebop");
    assert!(
        session
            .display_calls()
            .shows("Couldn't load details for \"Cowboy Bebop\"")
    );
}

#[tokio::test]
async fn test_add_duplicate_title_needs_confirmation() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());

    let mut args = add_args(MediaKind::Book, "Dune");
    args.offline = true;
    run(&session, Commands::Add(args.clone())).await;
    run(&session, Commands::Add(args)).await;

    assert_eq!(stored(&store).len(), 1);
    assert!(session.display_calls().shows("already in your library"));
    assert_eq!(session.interactive_provider.get_confirm_calls().len(), 1);
}

#[tokio::test]
async fn test_search_shows_ranked_table_and_ghost() {
    let provider = anime_provider();
    let session = session_with(&MemoryStore::new(), &provider);

    run(
        &session,
        Commands::Search {
            kind: MediaKind::Anime,
            query: vec!["cowboy".to_string(), "bebop".to_string()],
        },
    )
    .await;

    let display = session.display_calls();
    assert_eq!(display.count_calls("structured_table"), 1);
    assert!(display.shows("Cowboy Bebop (1998)"));
    assert!(display.shows("→ Cowboy Bebop"));
}

#[tokio::test]
async fn test_search_without_provider_reports_it() {
    let session = MockCommandSession::new();

    run(
        &session,
        Commands::Search {
            kind: MediaKind::Book,
            query: vec!["dune".to_string()],
        },
    )
    .await;

    assert!(session.display_calls().shows("No book provider configured"));
}

#[tokio::test]
async fn test_list_filters_and_reports_empty() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());

    run(&session, Commands::List { kind: None, status: None }).await;
    assert!(session.display_calls().shows("Your library is empty"));

    for (kind, title) in [(MediaKind::Book, "Dune"), (MediaKind::Game, "Hades")] {
        let mut args = add_args(kind, title);
        args.offline = true;
        run(&session, Commands::Add(args)).await;
    }
    session.display_calls().clear_calls();

    run(
        &session,
        Commands::List {
            kind: Some(MediaKind::Game),
            status: None,
        },
    )
    .await;

    let calls = session.display_calls().get_calls();
    let Some(DisplayCall::StructuredTable { rows, .. }) = calls.first() else {
        panic!("expected a table, got {calls:?}");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Hades");
}

#[tokio::test]
async fn test_edit_completion_stamps_today() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());
    let mut args = add_args(MediaKind::Book, "Dune");
    args.offline = true;
    run(&session, Commands::Add(args)).await;

    let mut edit = edit_args("dune");
    edit.status = Some(WatchStatus::Completed);
    edit.rating = Some(9.0);
    run(&session, Commands::Edit(edit)).await;

    let item = &stored(&store)[0];
    assert_eq!(item.status, WatchStatus::Completed);
    assert_eq!(item.date_finished, NaiveDate::from_ymd_opt(2024, 6, 1));
    assert!(session.display_calls().shows("Updated"));
}

#[tokio::test]
async fn test_edit_without_fields_changes_nothing() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());

    run(&session, Commands::Edit(edit_args("anything"))).await;

    assert_eq!(store.save_count(), 0);
    assert!(session.display_calls().shows("Nothing to change"));
}

#[tokio::test]
async fn test_edit_unknown_item_fails() {
    let session = MockCommandSession::new();
    let mut edit = edit_args("missing");
    edit.rating = Some(5.0);

    assert!(
        execute_command_with_session(Commands::Edit(edit), &session)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_next_and_prev_step_progress() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());
    let mut args = add_args(MediaKind::Tv, "Severance");
    args.offline = true;
    args.total = Some(2);
    run(&session, Commands::Add(args)).await;

    run(&session, Commands::Next { item: "severance".to_string() }).await;
    assert_eq!(stored(&store)[0].effective_progress(), (Some(1), Some(2)));

    run(&session, Commands::Prev { item: "severance".to_string() }).await;
    assert_eq!(stored(&store)[0].effective_progress(), (Some(0), Some(2)));

    run(&session, Commands::Next { item: "severance".to_string() }).await;
    run(&session, Commands::Next { item: "severance".to_string() }).await;
    let item = &stored(&store)[0];
    assert_eq!(item.effective_progress(), (Some(2), Some(2)));
    assert_eq!(item.status, WatchStatus::Completed);
    assert!(session.display_calls().shows("Marked as completed"));
}

#[tokio::test]
async fn test_remove_then_undo_restores_position() {
    let store = MemoryStore::new();
    let session = MockCommandSession::new().with_store(store.clone());
    for title in ["A Book", "B Book", "C Book"] {
        let mut args = add_args(MediaKind::Book, title);
        args.offline = true;
        run(&session, Commands::Add(args)).await;
    }

    run(&session, Commands::Remove { item: "b book".to_string() }).await;
    assert_eq!(stored(&store).len(), 2);
    assert!(store.snapshot("default").pending_restore.is_some());

    run(&session, Commands::Undo).await;
    let titles: Vec<String> = stored(&store).into_iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["A Book", "B Book", "C Book"]);
    assert!(session.display_calls().shows("Restored"));
}

#[tokio::test]
async fn test_undo_after_window_is_permanent() {
    let store = MemoryStore::new();
    let clock = MockClockProvider::default();
    let session = MockCommandSession::new()
        .with_store(store.clone())
        .with_clock(clock.clone());
    let mut args = add_args(MediaKind::Book, "Dune");
    args.offline = true;
    run(&session, Commands::Add(args)).await;
    run(&session, Commands::Remove { item: "dune".to_string() }).await;

    clock.advance(TimeDelta::seconds(31));
    run(&session, Commands::Undo).await;

    assert!(stored(&store).is_empty());
    assert!(store.snapshot("default").pending_restore.is_none());
    assert!(session.display_calls().shows("Too late to undo"));

    run(&session, Commands::Undo).await;
    assert!(session.display_calls().shows("Nothing to undo"));
}

#[tokio::test]
async fn test_undo_window_follows_config() {
    let store = MemoryStore::new();
    let clock = MockClockProvider::default();
    let session = MockCommandSession::new()
        .with_config(AppConfig {
            undo_window: 120,
            ..AppConfig::default()
        })
        .with_store(store.clone())
        .with_clock(clock.clone());
    let mut args = add_args(MediaKind::Book, "Dune");
    args.offline = true;
    run(&session, Commands::Add(args)).await;
    run(&session, Commands::Remove { item: "dune".to_string() }).await;

    clock.advance(TimeDelta::seconds(90));
    run(&session, Commands::Undo).await;

    assert_eq!(stored(&store).len(), 1);
}

#[tokio::test]
async fn test_recommend_with_empty_library_reports_message() {
    let session = MockCommandSession::new();

    run(&session, Commands::Recommend { random: false }).await;

    assert!(session.display_calls().shows("No recommendations yet"));
}

#[tokio::test]
async fn test_recommend_lists_similar_titles() {
    let store = MemoryStore::new();
    let seed_ids = ProviderIds::FilmTv {
        tmdb_id: 1438,
        media: ScreenMedia::Tv,
    };
    let similar = Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: 1104,
            media: ScreenMedia::Tv,
        },
        "Mad Men",
    )
    .with_genres(["Drama"]);
    let provider = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_search_results(
            "the wire",
            vec![Candidate::new(seed_ids, "The Wire").with_genres(["Drama", "Crime"])],
        )
        .with_similar(seed_ids, vec![similar]);
    let session = session_with(&store, &provider);

    let mut args = add_args(MediaKind::Tv, "the wire");
    args.pick = Some(1);
    args.status = Some(WatchStatus::Completed);
    args.rating = Some(9.0);
    run(&session, Commands::Add(args)).await;

    run(&session, Commands::Recommend { random: false }).await;

    let display = session.display_calls();
    assert!(display.shows("Recommended for you"));
    assert!(display.shows("Mad Men"));
}

#[tokio::test]
async fn test_load_failure_is_an_error() {
    let session = MockCommandSession::new().with_store(MemoryStore::new().with_failure("disk gone"));

    let err = execute_command_with_session(Commands::List { kind: None, status: None }, &session)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to load library"));
}

#[tokio::test]
async fn test_version_lists_providers() {
    let provider = anime_provider();
    let session = session_with(&MemoryStore::new(), &provider);

    run(&session, Commands::Version).await;

    let display = session.display_calls();
    assert!(display.shows("mediashelf "));
    assert!(display.shows("Providers mock"));
}
