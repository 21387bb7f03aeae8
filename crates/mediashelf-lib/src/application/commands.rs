//! Command execution handlers
//!
//! Every handler takes a `&dyn Session` so it can run against live or mock
//! providers. Library commands follow the same shape: load the snapshot,
//! change the in-memory [`LibraryState`], save it back.

use crate::api::ranked_search::{search_as_you_type, search_failure_message};
use crate::application::cli::{AddArgs, EditArgs};
use crate::application::session::{CommandSession, Session};
use crate::application::{CliConfig, Commands};
use crate::library::progress;
use crate::library::recommend::{RecommendMode, Recommendation, RecommendedCandidate, recommend};
use crate::library::resolver::resolve_with;
use crate::library::state::{LibraryState, RestoreOutcome};
use crate::library::suggest::Suggestions;
use crate::primitives::{Candidate, Draft, LibraryItem, MediaKind, WatchStatus};
use crate::store::{LibrarySnapshot, SaveOutcome};
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Characters of the UUID shown in listings; enough to address a record
const SHORT_ID_LEN: usize = 8;

/// Execute CLI commands using the session-based architecture
pub async fn execute_command(config: CliConfig) -> Result<()> {
    let session = CommandSession::new(config.app_config)?;

    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            session
                .display()
                .status()
                .message("mediashelf - personal media library");
            session
                .display()
                .status()
                .subtle("Run 'mediashelf --help' for usage information");
            return Ok(());
        }
    };

    execute_command_with_session(command, &session).await
}

/// Execute a specific command with a provided session (for testing)
pub async fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    debug!("Executing {:?}", command);
    match command {
        Commands::Version => handle_version(session),
        Commands::Search { kind, query } => handle_search(session, kind, query.join(" ")).await,
        Commands::Add(args) => handle_add(session, args).await,
        Commands::List { kind, status } => handle_list(session, kind, status),
        Commands::Show { item } => handle_show(session, &item),
        Commands::Edit(args) => handle_edit(session, args),
        Commands::Next { item } => handle_step(session, &item, true),
        Commands::Prev { item } => handle_step(session, &item, false),
        Commands::Remove { item } => handle_remove(session, &item),
        Commands::Undo => handle_undo(session),
        Commands::Recommend { random } => handle_recommend(session, random).await,
    }
}

fn user(session: &dyn Session) -> &str {
    &session.config().app_config().user
}

fn load_state(session: &dyn Session) -> Result<LibraryState> {
    let user = user(session);
    let mut snapshot = session
        .store()
        .load(user)
        .with_context(|| format!("Failed to load library from {}", session.store().location(user)))?;

    for notice in std::mem::take(&mut snapshot.notices) {
        session.display().status().warning(&notice);
    }
    Ok(snapshot.into_state())
}

fn save_state(session: &dyn Session, state: &LibraryState) -> Result<()> {
    let user = user(session);
    let outcome = session
        .store()
        .save(user, &LibrarySnapshot::from_state(state))
        .with_context(|| format!("Failed to save library to {}", session.store().location(user)))?;

    match outcome {
        SaveOutcome::Saved => debug!("Saved {} records", state.len()),
        SaveOutcome::Degraded(message) => session.display().status().warning(&message),
    }
    Ok(())
}

fn short_id(item: &LibraryItem) -> String {
    item.id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn describe(item: &LibraryItem) -> String {
    format!("{} ({})", item.title, item.kind)
}

/// `3/12`, `3/?` or `-`
pub fn progress_label(item: &LibraryItem) -> String {
    match item.effective_progress() {
        (None, None) => "-".to_string(),
        (current, Some(total)) => format!("{}/{}", current.unwrap_or(0), total),
        (Some(current), None) => format!("{}/?", current),
    }
}

fn rating_label(item: &LibraryItem) -> String {
    item.rating
        .map(|rating| format!("{}", rating.value()))
        .unwrap_or_else(|| "-".to_string())
}

fn handle_version(session: &dyn Session) -> Result<()> {
    let config = session.config().app_config();
    let providers = session.providers().names();
    let providers = if providers.is_empty() {
        "none".to_string()
    } else {
        providers.join(", ")
    };
    let trending = if session.providers().trending().is_some() {
        "yes"
    } else {
        "no"
    };
    let library = session.store().location(&config.user);

    session
        .display()
        .status()
        .message(&format!("mediashelf {}", env!("CARGO_PKG_VERSION")));
    session.display().table().properties(&[
        ("User", config.user.as_str()),
        ("Library", library.as_str()),
        ("Providers", providers.as_str()),
        ("Trending", trending),
    ]);
    Ok(())
}

fn show_suggestions(session: &dyn Session, suggestions: &Suggestions) {
    let rows: Vec<Vec<String>> = suggestions
        .ranked
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            vec![
                (i + 1).to_string(),
                scored.candidate.label(),
                scored.candidate.kind().to_string(),
                format!("{:.0}%", scored.score * 100.0),
            ]
        })
        .collect();
    session
        .display()
        .table()
        .table(&["#", "Title", "Kind", "Match"], &rows);
}

async fn handle_search(session: &dyn Session, kind: MediaKind, query: String) -> Result<()> {
    if session.providers().for_kind(kind).is_none() {
        session
            .display()
            .status()
            .info(&format!("No {} provider configured", kind));
        return Ok(());
    }

    match search_as_you_type(session.providers(), kind, &query).await {
        Ok(suggestions) if suggestions.is_empty() => {
            session
                .display()
                .status()
                .info(&format!("No suggestions for \"{}\"", query.trim()));
        }
        Ok(suggestions) => {
            if let Some(ghost) = &suggestions.ghost {
                session
                    .display()
                    .status()
                    .subtle(&format!("{} → {}", query.trim(), ghost));
            }
            show_suggestions(session, &suggestions);
        }
        Err(err) => {
            session
                .display()
                .status()
                .warning(&search_failure_message(&err));
        }
    }
    Ok(())
}

/// Find suggestions for `add` and let the user pick one
///
/// Never picks on the user's behalf: without `--pick` and without an
/// answer from the prompt the title is added unlinked.
async fn choose_candidate(session: &dyn Session, args: &AddArgs, title: &str) -> Result<Option<Candidate>> {
    if args.offline {
        return Ok(None);
    }
    if session.providers().for_kind(args.kind).is_none() {
        debug!("No provider for {}; adding unlinked", args.kind);
        return Ok(None);
    }

    let suggestions = match search_as_you_type(session.providers(), args.kind, title).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            session
                .display()
                .status()
                .warning(&search_failure_message(&err));
            return Ok(None);
        }
    };
    if suggestions.is_empty() {
        session
            .display()
            .status()
            .info(&format!("No matches for \"{}\"; adding as typed", title));
        return Ok(None);
    }

    if let Some(position) = args.pick {
        return match suggestions.pick(position) {
            Some(candidate) => Ok(Some(candidate.clone())),
            None => bail!(
                "No suggestion #{} ({} found for \"{}\")",
                position,
                suggestions.ranked.len(),
                title
            ),
        };
    }

    let mut options: Vec<String> = suggestions.candidates().map(Candidate::label).collect();
    options.push("Add as typed".to_string());
    let picked = session
        .interactive()
        .select(&format!("Link \"{}\" to", title), &options)?;

    Ok(picked.and_then(|index| suggestions.ranked.get(index).map(|s| s.candidate.clone())))
}

async fn handle_add(session: &dyn Session, args: AddArgs) -> Result<()> {
    let title = args.title();
    if title.trim().is_empty() {
        bail!("Title must not be empty");
    }

    let mut state = load_state(session)?;
    if state.contains_title(&title) {
        session
            .display()
            .status()
            .warning(&format!("\"{}\" is already in your library", title.trim()));
        if !session.interactive().confirm("Add it again?", false)? {
            session.display().status().info("Nothing added");
            return Ok(());
        }
    }

    let mut draft = Draft::new(args.kind).with_title(title.clone());
    if let Some(status) = args.status {
        draft.status = status;
    }

    if let Some(candidate) = choose_candidate(session, &args, &title).await? {
        let resolution = resolve_with(session.providers(), draft, &candidate).await;
        if let Some(notice) = &resolution.notice {
            session.display().status().warning(notice);
        }
        draft = resolution.draft;
    }

    let clock = session.clock();
    let today = clock.today();
    let mut item = progress::create(draft, clock.now(), today)?;

    // The chosen status rides along so progress cannot auto-complete over it
    let update = args.to_update();
    if !update.is_empty() {
        item = progress::apply(&item, &update, today);
    }

    info!("Adding '{}' ({})", item.title, item.id);
    let summary = describe(&item);
    let linked = item.provider_ids.map(|ids| ids.to_string());
    state.insert(item);
    save_state(session, &state)?;

    session.display().status().success("Added", &summary);
    if let Some(ids) = linked {
        session
            .display()
            .status()
            .subtle(&format!("Linked to {}", ids));
    }
    Ok(())
}

fn handle_list(
    session: &dyn Session,
    kind: Option<MediaKind>,
    status: Option<WatchStatus>,
) -> Result<()> {
    let state = load_state(session)?;
    let rows: Vec<Vec<String>> = state
        .items()
        .iter()
        .filter(|item| kind.is_none_or(|kind| item.kind == kind))
        .filter(|item| status.is_none_or(|status| item.status == status))
        .map(|item| {
            vec![
                short_id(item),
                item.title.clone(),
                item.kind.to_string(),
                item.status.to_string(),
                progress_label(item),
                rating_label(item),
            ]
        })
        .collect();

    if rows.is_empty() {
        let message = if state.is_empty() {
            "Your library is empty"
        } else {
            "No records match"
        };
        session.display().status().info(message);
        return Ok(());
    }

    session.display().table().table(
        &["Id", "Title", "Kind", "Status", "Progress", "Rating"],
        &rows,
    );
    Ok(())
}

fn handle_show(session: &dyn Session, query: &str) -> Result<()> {
    let state = load_state(session)?;
    let item = state.find(query)?;

    let id = item.id.to_string();
    let kind = item.kind.to_string();
    let status = item.status.to_string();
    let progress = progress_label(item);
    let rating = rating_label(item);
    let tags = item.tags().iter().collect::<Vec<_>>().join(", ");
    let finished = item
        .date_finished
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    let linked = item
        .provider_ids
        .map(|ids| ids.to_string())
        .unwrap_or_else(|| "-".to_string());

    session.display().status().emphasis(&item.title);
    session.display().table().properties(&[
        ("Id", id.as_str()),
        ("Kind", kind.as_str()),
        ("Status", status.as_str()),
        ("Progress", progress.as_str()),
        ("Rating", rating.as_str()),
        ("Tags", if tags.is_empty() { "-" } else { tags.as_str() }),
        ("Finished", finished.as_str()),
        ("Linked", linked.as_str()),
        ("Note", item.note.as_deref().unwrap_or("-")),
    ]);
    Ok(())
}

fn handle_edit(session: &dyn Session, args: EditArgs) -> Result<()> {
    let update = args.to_update();
    if update.is_empty() {
        session
            .display()
            .status()
            .info("Nothing to change; pass at least one field");
        return Ok(());
    }

    let mut state = load_state(session)?;
    let id = state.find(&args.item)?.id;
    let summary = describe(state.update(id, &update, session.clock().today())?);
    save_state(session, &state)?;

    session.display().status().success("Updated", &summary);
    Ok(())
}

fn handle_step(session: &dyn Session, query: &str, forward: bool) -> Result<()> {
    let mut state = load_state(session)?;
    let found = state.find(query)?;
    let id = found.id;
    let update = if forward {
        progress::increment(found)
    } else {
        progress::decrement(found)
    };

    let updated = state.update(id, &update, session.clock().today())?;
    let summary = format!("{} {}", updated.title, progress_label(updated));
    let completed = updated.status == WatchStatus::Completed;
    save_state(session, &state)?;

    session.display().status().success("Progress", &summary);
    if completed {
        session.display().status().subtle("Marked as completed");
    }
    Ok(())
}

fn handle_remove(session: &dyn Session, query: &str) -> Result<()> {
    let mut state = load_state(session)?;
    let id = state.find(query)?.id;
    let config = session.config().app_config();
    let removed = state.remove(id, session.clock().now(), config.restore_window())?;
    save_state(session, &state)?;

    session
        .display()
        .status()
        .success("Removed", &describe(&removed));
    session.display().status().subtle(&format!(
        "Run 'mediashelf undo' within {} seconds to restore it",
        config.undo_window
    ));
    Ok(())
}

fn handle_undo(session: &dyn Session) -> Result<()> {
    let mut state = load_state(session)?;
    match state.restore(session.clock().now()) {
        RestoreOutcome::Restored(item) => {
            save_state(session, &state)?;
            session
                .display()
                .status()
                .success("Restored", &describe(&item));
        }
        RestoreOutcome::Expired => {
            save_state(session, &state)?;
            session
                .display()
                .status()
                .warning("Too late to undo; the removal is permanent");
        }
        RestoreOutcome::Nothing => {
            session.display().status().info("Nothing to undo");
        }
    }
    Ok(())
}

fn recommendation_row(position: usize, entry: &RecommendedCandidate) -> Vec<String> {
    vec![
        position.to_string(),
        entry.candidate.label(),
        entry.candidate.kind().to_string(),
        entry.tags.iter().take(3).collect::<Vec<_>>().join(", "),
        format!("{:.0}%", entry.score * 100.0),
    ]
}

async fn handle_recommend(session: &dyn Session, random: bool) -> Result<()> {
    let state = load_state(session)?;
    let mode = if random {
        RecommendMode::Random
    } else {
        RecommendMode::Ranked
    };

    let report = recommend(session.providers(), state.items(), mode, session.jobs()).await;
    for notice in &report.notices {
        session.display().status().warning(notice);
    }

    match report.recommendation {
        Recommendation::Ranked(entries) => {
            let rows: Vec<Vec<String>> = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| recommendation_row(i + 1, entry))
                .collect();
            session.display().status().section("Recommended for you");
            session
                .display()
                .table()
                .table(&["#", "Title", "Kind", "Tags", "Score"], &rows);
        }
        Recommendation::Pick(entry) => {
            session
                .display()
                .status()
                .success("Try", &entry.candidate.label());
            if !entry.tags.is_empty() {
                session
                    .display()
                    .status()
                    .subtle(&entry.tags.iter().collect::<Vec<_>>().join(", "));
            }
        }
        Recommendation::Empty { message } => {
            session.display().status().info(&message);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
