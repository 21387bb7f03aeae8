use super::*;

#[test]
fn test_rating_rounds_to_half_points() {
    assert_eq!(Rating::new(7.3).value(), 7.5);
    assert_eq!(Rating::new(7.2).value(), 7.0);
    assert_eq!(Rating::new(8.75).value(), 9.0);
}

#[test]
fn test_rating_clamps_out_of_range() {
    assert_eq!(Rating::new(-3.0).value(), 0.0);
    assert_eq!(Rating::new(14.0).value(), 10.0);
    assert_eq!(Rating::new(f64::NAN).value(), 0.0);
}

#[test]
fn test_rating_deserialization_coerces() {
    let rating: Rating = serde_json::from_str("11.2").unwrap();
    assert_eq!(rating.value(), 10.0);
}

#[test]
fn test_rating_display() {
    assert_eq!(Rating::new(8.0).to_string(), "8/10");
    assert_eq!(Rating::new(6.5).to_string(), "6.5/10");
}

#[test]
fn test_tag_set_collapses_case_insensitive_duplicates() {
    let tags: TagSet = ["Drama", "drama", " Thriller ", "", "DRAMA"].into_iter().collect();
    assert_eq!(tags.as_slice(), &["Drama".to_string(), "Thriller".to_string()]);
}

#[test]
fn test_tag_set_union_preserves_order() {
    let auto: TagSet = ["Action", "Sci-Fi"].into_iter().collect();
    let manual: TagSet = ["rewatch", "sci-fi"].into_iter().collect();

    let merged = auto.union(&manual);
    let tags: Vec<&str> = merged.iter().collect();
    assert_eq!(tags, vec!["Action", "Sci-Fi", "rewatch"]);
}

#[test]
fn test_tag_set_deserializes_with_dedup() {
    let tags: TagSet = serde_json::from_str(r#"["a", "A", "b"]"#).unwrap();
    assert_eq!(tags.len(), 2);
}

#[test]
fn test_progress_field_manual_wins() {
    let field = ProgressField {
        auto: Some(24),
        manual: Some(12),
    };
    assert_eq!(field.effective(), Some(12));
    assert_eq!(ProgressField::auto(5).effective(), Some(5));
    assert!(ProgressField::default().is_unset());
}

#[test]
fn test_progress_field_raise_writes_to_precedent_side() {
    let mut field = ProgressField {
        auto: Some(3),
        manual: Some(4),
    };
    field.raise_to(10);
    assert_eq!(field.manual, Some(10));
    assert_eq!(field.auto, Some(3));

    let mut field = ProgressField::auto(3);
    field.raise_to(10);
    assert_eq!(field.auto, Some(10));

    let mut field = ProgressField::auto(14);
    field.raise_to(10);
    assert_eq!(field.effective(), Some(14));
}

#[test]
fn test_provider_ids_family_and_kind() {
    let ids = ProviderIds::FilmTv {
        tmdb_id: 1399,
        media: ScreenMedia::Tv,
    };
    assert_eq!(ids.family(), ProviderFamily::FilmTv);
    assert_eq!(ids.media_kind(), MediaKind::Tv);
    assert_eq!(ids.to_string(), "tmdb:tv/1399");

    let ids = ProviderIds::AnimeManga {
        mal_id: 2,
        media: AnimeMedia::Manga,
    };
    assert_eq!(ids.media_kind(), MediaKind::Manga);
}

#[test]
fn test_provider_ids_serialization_is_tagged() {
    let ids = ProviderIds::Game { rawg_id: 3498 };
    let json = serde_json::to_value(ids).unwrap();
    assert_eq!(json["provider"], "game");
    assert_eq!(json["rawg_id"], 3498);
}

#[test]
fn test_media_kind_provider_family() {
    assert_eq!(MediaKind::Movie.provider_family(), Some(ProviderFamily::FilmTv));
    assert_eq!(MediaKind::Manga.provider_family(), Some(ProviderFamily::AnimeManga));
    assert_eq!(MediaKind::Book.provider_family(), None);
    assert!(MediaKind::Anime.is_episodic());
    assert!(!MediaKind::Game.is_episodic());
}

#[test]
fn test_from_draft_rejects_blank_title() {
    let draft = Draft::new(MediaKind::Book).with_title("   ");
    assert_eq!(
        LibraryItem::from_draft(draft, Utc::now()),
        Err(DraftError::EmptyTitle)
    );
}

#[test]
fn test_from_draft_trims_title() {
    let draft = Draft::new(MediaKind::Book).with_title("  Dune ");
    let item = LibraryItem::from_draft(draft, Utc::now()).unwrap();
    assert_eq!(item.title, "Dune");
    assert_eq!(item.status, WatchStatus::Planned);
}

#[test]
fn test_movie_effective_progress_is_bounded() {
    let mut item = LibraryItem::from_draft(
        Draft::new(MediaKind::Movie).with_title("Heat"),
        Utc::now(),
    )
    .unwrap();
    item.progress_current = ProgressField::manual(7);
    item.progress_total = ProgressField::manual(3);

    assert_eq!(item.effective_progress(), (Some(1), Some(1)));
}

#[test]
fn test_sanitize_mirrors_movie_status() {
    let mut item = LibraryItem::from_draft(
        Draft::new(MediaKind::Movie).with_title("Heat"),
        Utc::now(),
    )
    .unwrap();
    item.status = WatchStatus::Completed;
    item.note = Some("  ".to_string());
    item.sanitize();

    assert_eq!(item.progress_current.effective(), Some(1));
    assert_eq!(item.progress_total.effective(), Some(1));
    assert_eq!(item.note, None);
}

#[test]
fn test_item_roundtrips_through_json_with_defaults() {
    let json = r#"{
        "id": "2f0b3c1e-0d1a-4a57-9a43-5d5c8f0f2a11",
        "title": "Frieren",
        "kind": "anime",
        "created_at": "2024-01-01T00:00:00Z",
        "progress_total": { "auto": 28 }
    }"#;
    let item: LibraryItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.status, WatchStatus::Planned);
    assert_eq!(item.rewatch_count, 0);
    assert_eq!(item.effective_progress(), (None, Some(28)));
}

#[test]
fn test_item_update_status_presence() {
    let update = ItemUpdate::new().with_progress_current(3);
    assert!(!update.sets_status());
    assert!(update.with_status(WatchStatus::InProgress).sets_status());
    assert!(ItemUpdate::new().is_empty());
}
