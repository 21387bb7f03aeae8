//! E2E tests for the library lifecycle
//!
//! Every step runs in a fresh session over the same data directory, so
//! these tests cover what actually reaches disk between commands.

use anyhow::Result;
use chrono::TimeDelta;
use mediashelf_lib::application::cli::{AddArgs, Commands, EditArgs};
use mediashelf_lib::application::commands::execute_command_with_session;
use mediashelf_lib::primitives::{MediaKind, WatchStatus};
use mediashelf_tests::TestEnvironment;

fn offline_add(kind: MediaKind, title: &str) -> Commands {
    Commands::Add(AddArgs {
        kind,
        title: vec![title.to_string()],
        status: None,
        rating: None,
        tags: Vec::new(),
        current: None,
        total: None,
        note: None,
        pick: None,
        offline: true,
    })
}

fn edit(item: &str) -> EditArgs {
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

async fn run(env: &TestEnvironment, command: Commands) -> Result<()> {
    let session = env.session().build()?;
    execute_command_with_session(command, &session).await
}

#[tokio::test]
async fn e2e_add_edit_and_step_persist() -> Result<()> {
    let env = TestEnvironment::new()?;

    run(&env, offline_add(MediaKind::Tv, "Severance")).await?;
    run(&env, offline_add(MediaKind::Book, "Piranesi")).await?;
    assert_eq!(env.stored_titles()?, vec!["Severance", "Piranesi"]);

    let mut total = edit("severance");
    total.total = Some(2);
    total.rating = Some(8.2);
    run(&env, Commands::Edit(total)).await?;

    run(&env, Commands::Next { item: "severance".to_string() }).await?;
    run(&env, Commands::Next { item: "severance".to_string() }).await?;

    let document = env.read_library()?;
    let severance = &document["items"][0];
    assert_eq!(severance["status"], "completed");
    assert_eq!(severance["rating"], 8.0);
    assert_eq!(severance["date_finished"], "2024-06-01");
    assert_eq!(document["version"], 1);

    // The cache copy mirrors every save
    assert!(env.cache_path().exists());
    Ok(())
}

#[tokio::test]
async fn e2e_remove_and_undo_across_sessions() -> Result<()> {
    let env = TestEnvironment::new()?;
    for title in ["Arrival", "Blade Runner", "Contact"] {
        run(&env, offline_add(MediaKind::Movie, title)).await?;
    }

    run(&env, Commands::Remove { item: "blade runner".to_string() }).await?;
    assert_eq!(env.stored_titles()?, vec!["Arrival", "Contact"]);
    assert!(!env.read_library()?["pending_restore"].is_null());

    env.advance(TimeDelta::seconds(10));
    let session = env.session().build()?;
    execute_command_with_session(Commands::Undo, &session).await?;

    assert!(session.display_calls().shows("Restored"));
    assert_eq!(env.stored_titles()?, vec!["Arrival", "Blade Runner", "Contact"]);
    assert!(env.read_library()?.get("pending_restore").is_none());
    Ok(())
}

#[tokio::test]
async fn e2e_undo_expires_after_window() -> Result<()> {
    let env = TestEnvironment::new()?;
    run(&env, offline_add(MediaKind::Game, "Outer Wilds")).await?;
    run(&env, Commands::Remove { item: "outer wilds".to_string() }).await?;

    env.advance(TimeDelta::seconds(31));
    let session = env.session().build()?;
    execute_command_with_session(Commands::Undo, &session).await?;

    assert!(session.display_calls().shows("Too late to undo"));
    assert!(env.stored_titles()?.is_empty());
    assert!(env.read_library()?.get("pending_restore").is_none());
    Ok(())
}

#[tokio::test]
async fn e2e_longer_undo_window_from_config() -> Result<()> {
    let env = TestEnvironment::new()?;
    run(&env, offline_add(MediaKind::Game, "Outer Wilds")).await?;

    let session = env.session().with_undo_window(300).build()?;
    execute_command_with_session(Commands::Remove { item: "outer wilds".to_string() }, &session)
        .await?;
    assert!(session.display_calls().shows("within 300 seconds"));

    env.advance(TimeDelta::seconds(120));
    let session = env.session().with_undo_window(300).build()?;
    execute_command_with_session(Commands::Undo, &session).await?;

    assert_eq!(env.stored_titles()?, vec!["Outer Wilds"]);
    Ok(())
}

#[tokio::test]
async fn e2e_unreadable_records_are_skipped_with_notice() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_library_raw(
        r#"[
            {"id":"6f1c1a52-8f0e-4a55-9d1e-0d6b9b1b6a01","title":"Dune","kind":"book","created_at":"2024-01-01T00:00:00Z"},
            {"title":42},
            {"id":"6f1c1a52-8f0e-4a55-9d1e-0d6b9b1b6a02","title":"Hades","kind":"game","status":"in_progress","created_at":"2024-01-02T00:00:00Z"}
        ]"#,
    )?;

    let session = env.session().build()?;
    execute_command_with_session(Commands::List { kind: None, status: None }, &session).await?;

    let display = session.display_calls();
    assert!(display.shows("Skipped 1 unreadable records"));
    assert!(display.shows("Dune"));
    assert!(display.shows("Hades"));
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_primary_falls_back_to_cache() -> Result<()> {
    let env = TestEnvironment::new()?;
    run(&env, offline_add(MediaKind::Book, "Piranesi")).await?;
    env.write_library_raw("{ not json")?;

    let session = env.session().build()?;
    execute_command_with_session(
        Commands::List {
            kind: Some(MediaKind::Book),
            status: Some(WatchStatus::Planned),
        },
        &session,
    )
    .await?;

    let display = session.display_calls();
    assert!(display.shows("using local cache"));
    assert!(display.shows("Piranesi"));
    Ok(())
}

#[tokio::test]
async fn e2e_duplicate_add_is_declined_without_terminal() -> Result<()> {
    let env = TestEnvironment::new()?;
    run(&env, offline_add(MediaKind::Movie, "Heat")).await?;

    let session = env.session().build()?;
    execute_command_with_session(offline_add(MediaKind::Movie, "heat"), &session).await?;

    assert!(session.display_calls().shows("Nothing added"));
    assert_eq!(env.stored_titles()?, vec!["Heat"]);
    Ok(())
}
