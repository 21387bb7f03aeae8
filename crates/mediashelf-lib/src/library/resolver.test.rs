use super::*;
use crate::api::mock::{MockMetadataProvider, ProviderCall};
use crate::primitives::{
    AnimeMedia, ProgressField, ProviderFamily, ProviderIds, ScreenMedia,
};
use std::sync::Arc;

fn tv(id: u64, title: &str) -> Candidate {
    Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: id,
            media: ScreenMedia::Tv,
        },
        title,
    )
}

fn anime(id: u64, title: &str) -> Candidate {
    Candidate::new(
        ProviderIds::AnimeManga {
            mal_id: id,
            media: AnimeMedia::Anime,
        },
        title,
    )
}

fn no_details() -> Result<CandidateDetails, ProviderError> {
    Ok(CandidateDetails::default())
}

// ============================================================================
// Field merging
// ============================================================================

#[test]
fn test_title_is_always_overwritten() {
    let draft = Draft::new(MediaKind::Tv).with_title("breaking bd");

    let resolution = resolve(draft, &tv(1396, "Breaking Bad"), no_details());

    assert_eq!(resolution.draft.title, "Breaking Bad");
    assert_eq!(resolution.notice, None);
}

#[test]
fn test_empty_candidate_fields_never_blank_the_draft() {
    let mut draft = Draft::new(MediaKind::Tv).with_title("x");
    draft.cover_url = Some("file:///my-cover.png".to_string());
    draft.runtime_minutes = Some(50);

    let resolution = resolve(draft, &tv(1, "Lost"), no_details());

    assert_eq!(resolution.draft.cover_url.as_deref(), Some("file:///my-cover.png"));
    assert_eq!(resolution.draft.runtime_minutes, Some(50));
}

#[test]
fn test_candidate_fields_overwrite_when_present() {
    let mut draft = Draft::new(MediaKind::Tv).with_title("x");
    draft.cover_url = Some("old.png".to_string());
    let candidate = tv(1, "Lost").with_cover("new.png").with_runtime(42);

    let resolution = resolve(draft, &candidate, no_details());

    assert_eq!(resolution.draft.cover_url.as_deref(), Some("new.png"));
    assert_eq!(resolution.draft.runtime_minutes, Some(42));
}

#[test]
fn test_detail_fields_win_over_search_fields() {
    let candidate = tv(1, "Lost").with_genres(["Mystery"]).with_progress_total(100);
    let details = CandidateDetails {
        genres: vec!["Drama".to_string(), "Mystery".to_string()],
        runtime_minutes: Some(44),
        progress_total: Some(121),
        cover_url: None,
    };

    let resolution = resolve(Draft::new(MediaKind::Tv), &candidate, Ok(details));

    let tags: Vec<_> = resolution.draft.auto_tags.iter().collect();
    assert_eq!(tags, vec!["Drama", "Mystery"]);
    assert_eq!(resolution.draft.progress_total.auto, Some(121));
    assert_eq!(resolution.draft.runtime_minutes, Some(44));
}

// ============================================================================
// Provider identifiers
// ============================================================================

#[test]
fn test_new_family_clears_previous_identifiers() {
    let first = resolve(Draft::new(MediaKind::Tv), &tv(31910, "Naruto"), no_details());
    assert_eq!(
        first.draft.provider_ids.map(|ids| ids.family()),
        Some(ProviderFamily::FilmTv)
    );

    let second = resolve(first.draft, &anime(20, "Naruto"), no_details());

    assert_eq!(
        second.draft.provider_ids,
        Some(ProviderIds::AnimeManga {
            mal_id: 20,
            media: AnimeMedia::Anime
        })
    );
    assert_eq!(second.draft.kind, MediaKind::Anime);
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_manual_tags_survive_second_resolution() {
    let mut draft = Draft::new(MediaKind::Tv);
    draft.manual_tags.insert("rewatch with Sam");

    let first = resolve(draft, &tv(1, "Lost").with_genres(["Mystery", "Drama"]), no_details());
    let second = resolve(first.draft, &tv(2, "The Leftovers").with_genres(["Drama"]), no_details());

    let auto: Vec<_> = second.draft.auto_tags.iter().collect();
    assert_eq!(auto, vec!["Drama"], "auto tags are replaced wholesale");
    assert!(second.draft.manual_tags.contains("rewatch with sam"));
    assert_eq!(second.draft.tags().len(), 2);
}

#[test]
fn test_candidate_without_genres_empties_auto_tags() {
    let first = resolve(Draft::new(MediaKind::Tv), &tv(1, "Lost").with_genres(["Mystery"]), no_details());
    let second = resolve(first.draft, &tv(2, "Untagged"), no_details());

    assert!(second.draft.auto_tags.is_empty());
}

#[test]
fn test_auto_and_manual_tags_union_case_insensitively() {
    let mut draft = Draft::new(MediaKind::Tv);
    draft.manual_tags.insert("drama");

    let resolution = resolve(draft, &tv(1, "Lost").with_genres(["Drama", "drama"]), no_details());

    let all: Vec<_> = resolution.draft.tags().iter().map(str::to_string).collect();
    assert_eq!(all, vec!["Drama"]);
}

// ============================================================================
// Progress inference
// ============================================================================

#[test]
fn test_total_hint_fills_auto_total() {
    let resolution = resolve(
        Draft::new(MediaKind::Anime),
        &anime(5114, "FMA: Brotherhood").with_progress_total(64),
        no_details(),
    );

    assert_eq!(resolution.draft.progress_total.effective(), Some(64));
}

#[test]
fn test_manual_total_is_never_touched() {
    let mut draft = Draft::new(MediaKind::Anime);
    draft.progress_total = ProgressField::manual(12);

    let resolution = resolve(draft, &anime(1, "Cut").with_progress_total(24), no_details());

    assert_eq!(resolution.draft.progress_total.manual, Some(12));
    assert_eq!(resolution.draft.progress_total.effective(), Some(12));
}

#[test]
fn test_hint_leaves_an_already_set_total_alone() {
    let mut draft = Draft::new(MediaKind::Tv);
    draft.progress_total = ProgressField::auto(62);

    let resolution = resolve(draft, &tv(1, "Breaking Bad").with_progress_total(13), no_details());

    assert_eq!(resolution.draft.progress_total, ProgressField::auto(62));
}

#[test]
fn test_switching_from_movie_drops_inferred_progress() {
    let matrix = Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: 603,
            media: ScreenMedia::Movie,
        },
        "The Matrix",
    );
    let mut draft = Draft::new(MediaKind::Movie);
    draft.status = WatchStatus::Completed;
    let first = resolve(draft, &matrix, no_details());
    assert_eq!(first.draft.progress_total.auto, Some(1));
    assert_eq!(first.draft.progress_current.auto, Some(1));

    let second = resolve(first.draft, &anime(1, "The Animatrix"), no_details());

    assert_eq!(second.draft.kind, MediaKind::Anime);
    assert!(second.draft.progress_total.is_unset());
    assert!(second.draft.progress_current.is_unset());
}

#[test]
fn test_kind_change_keeps_manual_progress() {
    let mut draft = Draft::new(MediaKind::Tv);
    draft.progress_current = ProgressField::manual(3);
    draft.progress_total = ProgressField::auto(10);

    let resolution = resolve(draft, &anime(1, "Monster").with_progress_total(74), no_details());

    assert_eq!(resolution.draft.progress_current.effective(), Some(3));
    assert_eq!(resolution.draft.progress_total.effective(), Some(74));
}

#[test]
fn test_movie_without_hint_defaults_total_to_one() {
    let candidate = Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: 603,
            media: ScreenMedia::Movie,
        },
        "The Matrix",
    );

    let resolution = resolve(Draft::new(MediaKind::Movie), &candidate, no_details());

    assert_eq!(resolution.draft.progress_total.effective(), Some(1));
}

#[test]
fn test_completed_draft_gets_current_equal_to_total() {
    let mut draft = Draft::new(MediaKind::Tv);
    draft.status = WatchStatus::Completed;

    let resolution = resolve(draft, &tv(1, "Chernobyl").with_progress_total(5), no_details());

    assert_eq!(resolution.draft.progress_current.effective(), Some(5));
}

#[test]
fn test_completed_draft_keeps_existing_current() {
    let mut draft = Draft::new(MediaKind::Tv);
    draft.status = WatchStatus::Completed;
    draft.progress_current = ProgressField::manual(7);

    let resolution = resolve(draft, &tv(1, "Chernobyl").with_progress_total(5), no_details());

    assert_eq!(resolution.draft.progress_current.effective(), Some(7));
}

// ============================================================================
// Detail failures
// ============================================================================

#[test]
fn test_detail_failure_falls_back_with_notice() {
    let candidate = tv(1, "Dark").with_genres(["Sci-Fi & Fantasy"]).with_progress_total(26);
    let failure = Err(ProviderError::Unavailable {
        message: "timeout".to_string(),
    });

    let resolution = resolve(Draft::new(MediaKind::Tv), &candidate, failure);

    assert_eq!(
        resolution.notice.as_deref(),
        Some("Couldn't load details for \"Dark\"; using search result")
    );
    assert_eq!(resolution.draft.title, "Dark");
    assert_eq!(resolution.draft.progress_total.effective(), Some(26));
    assert!(resolution.draft.auto_tags.contains("sci-fi & fantasy"));
}

#[tokio::test]
async fn test_resolve_with_fetches_details_from_family_provider() {
    let candidate = tv(1396, "Breaking Bad");
    let mock = MockMetadataProvider::new(ProviderFamily::FilmTv).with_details(
        candidate.ids,
        CandidateDetails {
            genres: vec!["Drama".to_string()],
            progress_total: Some(62),
            ..Default::default()
        },
    );
    let providers = ProviderSet::new().with_provider(Arc::new(mock.clone()));

    let resolution = resolve_with(&providers, Draft::new(MediaKind::Tv), &candidate).await;

    assert_eq!(mock.calls(), vec![ProviderCall::Details(candidate.ids)]);
    assert_eq!(resolution.draft.progress_total.effective(), Some(62));
    assert_eq!(resolution.notice, None);
}

#[tokio::test]
async fn test_resolve_with_surfaces_detail_failure() {
    let candidate = anime(1, "Cowboy Bebop");
    let mock = MockMetadataProvider::new(ProviderFamily::AnimeManga)
        .with_details_error(candidate.ids, "429");
    let providers = ProviderSet::new().with_provider(Arc::new(mock));

    let resolution = resolve_with(&providers, Draft::new(MediaKind::Anime), &candidate).await;

    assert!(resolution.notice.is_some());
    assert_eq!(resolution.draft.title, "Cowboy Bebop");
}

#[tokio::test]
async fn test_resolve_with_without_provider() {
    let resolution = resolve_with(&ProviderSet::new(), Draft::new(MediaKind::Tv), &tv(1, "Lost")).await;

    assert_eq!(resolution.notice, None);
    assert_eq!(resolution.draft.title, "Lost");
}
