use super::*;
use chrono::TimeZone;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 20, 30, 0).unwrap()
}

fn record(kind: MediaKind, title: &str) -> LibraryItem {
    create(Draft::new(kind).with_title(title), now(), today()).unwrap()
}

fn episodic(total: u32) -> LibraryItem {
    let mut draft = Draft::new(MediaKind::Tv).with_title("Chernobyl");
    draft.progress_total = ProgressField::auto(total);
    draft.status = WatchStatus::InProgress;
    create(draft, now(), today()).unwrap()
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_create_requires_a_title() {
    let result = create(Draft::new(MediaKind::Book).with_title("   "), now(), today());
    assert_eq!(result.unwrap_err(), DraftError::EmptyTitle);
}

#[test]
fn test_create_completed_draft_stamps_today() {
    let mut draft = Draft::new(MediaKind::Book).with_title("Dune");
    draft.status = WatchStatus::Completed;

    let item = create(draft, now(), today()).unwrap();

    assert_eq!(item.date_finished, Some(today()));
    assert_eq!(item.created_at, now());
}

#[test]
fn test_create_keeps_given_finish_date() {
    let finished = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
    let mut draft = Draft::new(MediaKind::Book).with_title("Dune");
    draft.status = WatchStatus::Completed;
    draft.date_finished = Some(finished);

    let item = create(draft, now(), today()).unwrap();

    assert_eq!(item.date_finished, Some(finished));
}

#[test]
fn test_create_planned_movie_has_zero_of_one() {
    let item = record(MediaKind::Movie, "Heat");

    assert_eq!(item.effective_progress(), (Some(0), Some(1)));
    assert_eq!(item.status, WatchStatus::Planned);
}

// ============================================================================
// Completion stamping (rule 2)
// ============================================================================

#[test]
fn test_movie_completed_scenario() {
    let item = record(MediaKind::Movie, "Heat");

    let done = apply(&item, &ItemUpdate::new().with_status(WatchStatus::Completed), today());

    assert_eq!(done.status, WatchStatus::Completed);
    assert_eq!(done.date_finished, Some(today()));
    assert_eq!(done.effective_progress(), (Some(1), Some(1)));
}

#[test]
fn test_already_completed_is_not_restamped() {
    let item = record(MediaKind::Book, "Dune");
    let done = apply(&item, &ItemUpdate::new().with_status(WatchStatus::Completed), today());
    let cleared = apply(
        &done,
        &ItemUpdate {
            date_finished: Some(None),
            ..Default::default()
        },
        today(),
    );

    let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let again = apply(&cleared, &ItemUpdate::new().with_status(WatchStatus::Completed), later);

    assert_eq!(cleared.date_finished, None);
    assert_eq!(again.date_finished, None, "no transition, no stamp");
}

#[test]
fn test_reopen_then_complete_keeps_existing_date() {
    let item = record(MediaKind::Book, "Dune");
    let done = apply(&item, &ItemUpdate::new().with_status(WatchStatus::Completed), today());
    let reopened = apply(&done, &ItemUpdate::new().with_status(WatchStatus::InProgress), today());

    let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let again = apply(&reopened, &ItemUpdate::new().with_status(WatchStatus::Completed), later);

    assert_eq!(reopened.status, WatchStatus::InProgress);
    assert_eq!(again.date_finished, Some(today()));
}

#[test]
fn test_every_status_reachable_from_completed() {
    let item = record(MediaKind::Book, "Dune");
    let done = apply(&item, &ItemUpdate::new().with_status(WatchStatus::Completed), today());

    for status in [WatchStatus::Planned, WatchStatus::InProgress, WatchStatus::Dropped] {
        let moved = apply(&done, &ItemUpdate::new().with_status(status), today());
        assert_eq!(moved.status, status);
    }
}

// ============================================================================
// Auto-completion (rule 4)
// ============================================================================

#[test]
fn test_incrementing_to_total_auto_completes() {
    let mut item = episodic(3);

    for _ in 0..3 {
        item = apply(&item, &increment(&item), today());
    }

    assert_eq!(item.status, WatchStatus::Completed);
    assert_eq!(item.date_finished, Some(today()));
    assert_eq!(item.effective_progress(), (Some(3), Some(3)));
}

#[test]
fn test_explicit_status_suppresses_auto_completion() {
    let item = episodic(3);
    let update = ItemUpdate::new()
        .with_progress_current(3)
        .with_status(WatchStatus::InProgress);

    let result = apply(&item, &update, today());

    assert_eq!(result.status, WatchStatus::InProgress);
    assert_eq!(result.date_finished, None);
}

#[test]
fn test_explicit_unchanged_status_still_counts_as_explicit() {
    let item = episodic(2);

    let result = apply(
        &item,
        &ItemUpdate::new()
            .with_status(item.status)
            .with_progress_current(5),
        today(),
    );

    assert_eq!(result.status, WatchStatus::InProgress);
}

#[test]
fn test_no_auto_completion_without_positive_total() {
    let mut draft = Draft::new(MediaKind::Tv).with_title("Ongoing");
    draft.progress_total = ProgressField::auto(0);
    let item = create(draft, now(), today()).unwrap();

    let result = apply(&item, &ItemUpdate::new().with_progress_current(10), today());

    assert_eq!(result.status, WatchStatus::Planned);

    let unknown = record(MediaKind::Tv, "Unknown length");
    let result = apply(&unknown, &ItemUpdate::new().with_progress_current(10), today());
    assert_eq!(result.status, WatchStatus::Planned);
}

#[test]
fn test_manual_total_overrides_auto_for_completion() {
    let item = episodic(24);

    // user knows it was cut to 12
    let shortened = apply(&item, &ItemUpdate::new().with_progress_total(12), today());
    let result = apply(&shortened, &ItemUpdate::new().with_progress_current(12), today());

    assert_eq!(result.progress_total.auto, Some(24));
    assert_eq!(result.status, WatchStatus::Completed);
}

#[test]
fn test_movie_increment_completes() {
    let item = record(MediaKind::Movie, "Heat");

    let result = apply(&item, &increment(&item), today());

    assert_eq!(result.status, WatchStatus::Completed);
    assert_eq!(result.date_finished, Some(today()));
}

// ============================================================================
// Completed progress (rule 5)
// ============================================================================

#[test]
fn test_completing_episodic_raises_current() {
    let item = apply(&episodic(10), &ItemUpdate::new().with_progress_current(4), today());

    let done = apply(&item, &ItemUpdate::new().with_status(WatchStatus::Completed), today());

    assert_eq!(done.effective_progress(), (Some(10), Some(10)));
    assert_eq!(done.progress_current.manual, Some(10), "raise writes the override");
}

#[test]
fn test_completing_never_lowers_a_higher_current() {
    let item = episodic(10);
    let rewatching = apply(
        &item,
        &ItemUpdate::new()
            .with_status(WatchStatus::Completed)
            .with_progress_current(13),
        today(),
    );

    assert_eq!(rewatching.effective_progress(), (Some(13), Some(10)));
}

#[test]
fn test_completing_without_total_leaves_progress() {
    let item = record(MediaKind::Manga, "Ongoing manga");

    let done = apply(&item, &ItemUpdate::new().with_status(WatchStatus::Completed), today());

    assert_eq!(done.effective_progress(), (None, None));
}

#[test]
fn test_movie_progress_invariant_holds_after_any_update() {
    let item = record(MediaKind::Movie, "Heat");
    let updates = vec![
        ItemUpdate::new().with_progress_current(7),
        ItemUpdate::new().with_progress_total(3),
        ItemUpdate::new().with_progress_current(-2),
        ItemUpdate::new()
            .with_status(WatchStatus::InProgress)
            .with_progress_current(1),
        ItemUpdate::new().with_status(WatchStatus::Completed),
        ItemUpdate::new().with_status(WatchStatus::Dropped),
        decrement(&item),
    ];

    let mut current = item;
    for update in &updates {
        current = apply(&current, update, today());
        let (cur, total) = current.effective_progress();
        assert_eq!(total, Some(1));
        assert!(matches!(cur, Some(0) | Some(1)));
        assert_eq!(current.progress_total.effective(), Some(1), "stored total is mirrored too");
    }
}

#[test]
fn test_changing_kind_away_from_movie_resets_progress() {
    let item = record(MediaKind::Movie, "Fargo");

    let series = apply(
        &item,
        &ItemUpdate {
            kind: Some(MediaKind::Tv),
            ..Default::default()
        },
        today(),
    );

    assert_eq!(series.effective_progress(), (None, None));
}

// ============================================================================
// Increment / decrement
// ============================================================================

#[test]
fn test_increment_from_unset() {
    let item = record(MediaKind::Anime, "Mushishi");

    assert_eq!(increment(&item).progress_current, Some(Some(1)));
}

#[test]
fn test_increment_clamps_at_total() {
    let item = apply(&episodic(5), &ItemUpdate::new().with_progress_current(5).with_status(WatchStatus::InProgress), today());

    assert_eq!(increment(&item).progress_current, Some(Some(5)));
}

#[test]
fn test_increment_does_not_lower_rewatch_progress() {
    let item = apply(
        &episodic(5),
        &ItemUpdate::new()
            .with_progress_current(7)
            .with_status(WatchStatus::InProgress),
        today(),
    );

    assert_eq!(increment(&item).progress_current, Some(Some(7)));
}

#[test]
fn test_decrement_floors_at_zero() {
    let item = record(MediaKind::Anime, "Mushishi");

    assert_eq!(decrement(&item).progress_current, Some(Some(0)));
}

#[test]
fn test_decrement_steps_back() {
    let item = apply(&episodic(10), &ItemUpdate::new().with_progress_current(4), today());

    let back = apply(&item, &decrement(&item), today());

    assert_eq!(back.effective_progress(), (Some(3), Some(10)));
}

// ============================================================================
// Clamping and merging
// ============================================================================

#[test]
fn test_negative_progress_clamps_to_zero() {
    let item = episodic(10);

    let result = apply(&item, &ItemUpdate::new().with_progress_current(-4), today());

    assert_eq!(result.progress_current.manual, Some(0));
}

#[test]
fn test_rating_and_rewatch_are_clamped() {
    let item = record(MediaKind::Book, "Dune");
    let update = ItemUpdate {
        rating: Some(Some(12.3)),
        rewatch_count: Some(-1),
        ..Default::default()
    };

    let result = apply(&item, &update, today());

    assert_eq!(result.rating.map(Rating::value), Some(10.0));
    assert_eq!(result.rewatch_count, 0);
}

#[test]
fn test_clearing_overrides_falls_back_to_auto() {
    let item = apply(&episodic(10), &ItemUpdate::new().with_progress_total(8), today());

    let cleared = apply(
        &item,
        &ItemUpdate {
            progress_total: Some(None),
            ..Default::default()
        },
        today(),
    );

    assert_eq!(item.progress_total.effective(), Some(8));
    assert_eq!(cleared.progress_total.effective(), Some(10));
}

#[test]
fn test_blank_title_and_note_updates() {
    let item = record(MediaKind::Book, "Dune");

    let result = apply(
        &item,
        &ItemUpdate {
            title: Some("  ".to_string()),
            note: Some(Some("   ".to_string())),
            ..Default::default()
        },
        today(),
    );

    assert_eq!(result.title, "Dune");
    assert_eq!(result.note, None);
}

#[test]
fn test_manual_tags_replace_and_rating_clears() {
    let item = apply(
        &record(MediaKind::Book, "Dune"),
        &ItemUpdate::new().with_rating(8.0),
        today(),
    );
    let tags: crate::primitives::TagSet = ["classic"].into_iter().collect();

    let result = apply(
        &item,
        &ItemUpdate {
            rating: Some(None),
            manual_tags: Some(tags.clone()),
            ..Default::default()
        },
        today(),
    );

    assert_eq!(result.rating, None);
    assert_eq!(result.manual_tags, tags);
    assert_eq!(result.id, item.id, "identity survives updates");
}
