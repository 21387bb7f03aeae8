use super::*;
use crate::primitives::{Draft, MediaKind, WatchStatus};
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

fn window() -> TimeDelta {
    TimeDelta::seconds(DEFAULT_UNDO_WINDOW_SECS as i64)
}

fn item(title: &str) -> LibraryItem {
    progress::create(Draft::new(MediaKind::Book).with_title(title), now(), today()).unwrap()
}

fn state_of(titles: &[&str]) -> LibraryState {
    LibraryState::new(titles.iter().map(|t| item(t)).collect(), None)
}

fn titles(state: &LibraryState) -> Vec<&str> {
    state.items().iter().map(|i| i.title.as_str()).collect()
}

// ============================================================================
// Remove / restore
// ============================================================================

#[test]
fn test_remove_then_restore_within_window() {
    let mut state = state_of(&["Dune", "Emma", "Ulysses"]);
    let original = state.items()[1].clone();

    let removed = state.remove(original.id, now(), window()).unwrap();
    assert_eq!(titles(&state), vec!["Dune", "Ulysses"]);

    let outcome = state.restore(now() + TimeDelta::seconds(10));

    assert_eq!(outcome, RestoreOutcome::Restored(removed));
    assert_eq!(titles(&state), vec!["Dune", "Emma", "Ulysses"]);
    assert_eq!(state.items()[1], original, "record is reproduced exactly");
    assert!(state.pending_restore().is_none());
}

#[test]
fn test_restore_at_window_edge_still_works() {
    let mut state = state_of(&["Dune"]);
    let id = state.items()[0].id;
    state.remove(id, now(), window()).unwrap();

    assert!(matches!(state.restore(now() + window()), RestoreOutcome::Restored(_)));
}

#[test]
fn test_restore_after_expiry_is_a_no_op() {
    let mut state = state_of(&["Dune", "Emma"]);
    let id = state.items()[0].id;
    state.remove(id, now(), window()).unwrap();

    let outcome = state.restore(now() + window() + TimeDelta::seconds(1));

    assert_eq!(outcome, RestoreOutcome::Expired);
    assert_eq!(titles(&state), vec!["Emma"]);
    assert_eq!(state.restore(now()), RestoreOutcome::Nothing, "slot was discarded");
}

#[test]
fn test_second_removal_overwrites_slot() {
    let mut state = state_of(&["Dune", "Emma", "Ulysses"]);
    let first = state.items()[0].id;
    let second = state.items()[2].id;

    state.remove(first, now(), window()).unwrap();
    state.remove(second, now(), window()).unwrap();

    assert_eq!(state.pending_restore().map(|p| p.item.id), Some(second));
    state.restore(now());
    assert_eq!(titles(&state), vec!["Emma", "Ulysses"]);
}

#[test]
fn test_restore_clamps_index_when_list_shrank() {
    let mut state = state_of(&["Dune", "Emma", "Ulysses"]);
    let last = state.items()[2].id;
    state.remove(last, now(), window()).unwrap();

    // shrink the list without touching the slot
    let (mut items, pending) = state.into_parts();
    items.truncate(1);
    let mut state = LibraryState::new(items, pending);

    state.restore(now());
    assert_eq!(titles(&state), vec!["Dune", "Ulysses"]);
}

#[test]
fn test_restore_with_nothing_pending() {
    let mut state = state_of(&["Dune"]);
    assert_eq!(state.restore(now()), RestoreOutcome::Nothing);
}

#[test]
fn test_prune_expired() {
    let mut state = state_of(&["Dune"]);
    let id = state.items()[0].id;
    state.remove(id, now(), window()).unwrap();

    state.prune_expired(now());
    assert!(state.pending_restore().is_some());

    state.prune_expired(now() + TimeDelta::minutes(5));
    assert!(state.pending_restore().is_none());
}

#[test]
fn test_remove_unknown_id() {
    let mut state = state_of(&["Dune"]);

    let result = state.remove(Uuid::new_v4(), now(), window());

    assert!(matches!(result, Err(LibraryError::UnknownId { .. })));
    assert!(state.pending_restore().is_none());
}

// ============================================================================
// Lookup and replace
// ============================================================================

#[test]
fn test_find_by_title_case_insensitive() {
    let state = state_of(&["The Left Hand of Darkness", "Emma"]);

    let found = state.find("  the left hand of DARKNESS ").unwrap();

    assert_eq!(found.title, "The Left Hand of Darkness");
}

#[test]
fn test_find_by_id_prefix() {
    let state = state_of(&["Dune", "Emma"]);
    let id = state.items()[1].id;
    let prefix = &id.to_string()[..8];

    assert_eq!(state.find(prefix).unwrap().id, id);
}

#[test]
fn test_find_ambiguous_title() {
    let state = state_of(&["Dune", "dune"]);

    assert!(matches!(
        state.find("Dune"),
        Err(LibraryError::Ambiguous { count: 2, .. })
    ));
}

#[test]
fn test_find_missing() {
    let state = state_of(&["Dune"]);

    assert!(matches!(state.find("Emma"), Err(LibraryError::NotFound { .. })));
    assert!(matches!(state.find("ab"), Err(LibraryError::NotFound { .. })));
}

#[test]
fn test_replace_keeps_position() {
    let mut state = state_of(&["Dune", "Emma", "Ulysses"]);
    let mut changed = state.items()[1].clone();
    changed.title = "Emma (annotated)".to_string();

    state.replace(changed).unwrap();

    assert_eq!(titles(&state), vec!["Dune", "Emma (annotated)", "Ulysses"]);
}

#[test]
fn test_update_routes_through_engine() {
    let mut state = state_of(&["Dune"]);
    let id = state.items()[0].id;

    let updated = state
        .update(id, &ItemUpdate::new().with_status(WatchStatus::Completed), today())
        .unwrap();

    assert_eq!(updated.date_finished, Some(today()));
    assert_eq!(state.get(id).unwrap().status, WatchStatus::Completed);
}

#[test]
fn test_contains_title() {
    let state = state_of(&["Dune"]);

    assert!(state.contains_title(" DUNE "));
    assert!(!state.contains_title("Dune Messiah"));
}
