use super::*;
use crate::api::mock::{MockMetadataProvider, MockTrendingProvider, ProviderCall};
use crate::primitives::{AnimeMedia, Draft, ProviderFamily, Rating};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn record(kind: MediaKind, title: &str, status: WatchStatus, rating: Option<f64>, tags: &[&str]) -> LibraryItem {
    let mut draft = Draft::new(kind).with_title(title);
    draft.status = status;
    draft.rating = rating.map(Rating::new);
    draft.auto_tags = tags.iter().collect();
    LibraryItem::from_draft(draft, epoch()).unwrap()
}

fn linked(mut item: LibraryItem, ids: ProviderIds) -> LibraryItem {
    item.provider_ids = Some(ids);
    item
}

fn tv_ids(id: u64) -> ProviderIds {
    ProviderIds::FilmTv {
        tmdb_id: id,
        media: ScreenMedia::Tv,
    }
}

fn tv(id: u64, title: &str, genres: &[&str]) -> Candidate {
    Candidate::new(tv_ids(id), title).with_genres(genres.iter().copied())
}

fn scored(title: &str, tags: &[&str], score: f64) -> RecommendedCandidate {
    RecommendedCandidate {
        candidate: tv(1, title, tags),
        tags: tags.iter().collect(),
        score,
    }
}

fn titles(entries: &[RecommendedCandidate]) -> Vec<&str> {
    entries.iter().map(|e| e.candidate.title.as_str()).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Taste profile
// ============================================================================

#[test]
fn test_profile_weights_tags_by_rating() {
    let items = vec![
        record(MediaKind::Tv, "The Wire", WatchStatus::Completed, Some(8.0), &["Drama", "Crime"]),
        record(MediaKind::Tv, "Fleabag", WatchStatus::Completed, Some(6.0), &["drama", "Comedy"]),
        record(MediaKind::Tv, "Hannibal", WatchStatus::InProgress, Some(10.0), &["Horror"]),
    ];

    let profile = TasteProfile::from_library(&items);

    let names: Vec<&str> = profile.top_tags().iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(names, vec!["Drama", "Crime", "Comedy"]);
    assert_close(profile.top_tags()[0].1, 1.4);
}

#[test]
fn test_profile_ignores_unrated_history() {
    let items = vec![record(MediaKind::Book, "Emma", WatchStatus::Completed, None, &["Classic"])];

    let profile = TasteProfile::from_library(&items);

    assert!(!profile.has_tags());
}

#[test]
fn test_profile_keeps_top_twelve_tags_from_top_twelve_records() {
    let mut items = Vec::new();
    for n in 0..14 {
        let tag = format!("tag-{n}");
        items.push(record(
            MediaKind::Movie,
            &format!("Film {n}"),
            WatchStatus::Completed,
            Some(10.0 - n as f64 * 0.5),
            &[tag.as_str()],
        ));
    }

    let profile = TasteProfile::from_library(&items);

    assert_eq!(profile.top_tags().len(), TOP_TAG_LIMIT);
    assert_eq!(profile.top_tags()[0].0, "tag-0");
    assert!(profile.top_tags().iter().all(|(t, _)| t != "tag-12" && t != "tag-13"));
}

#[test]
fn test_kind_preference_uses_recent_window() {
    let mut items = Vec::new();
    let mut oldest = record(MediaKind::Game, "Hades", WatchStatus::Planned, None, &[]);
    oldest.created_at = epoch();
    items.push(oldest);
    for n in 0..KIND_WINDOW {
        let mut book = record(MediaKind::Book, &format!("Book {n}"), WatchStatus::Planned, None, &[]);
        book.created_at = epoch() + TimeDelta::days(n as i64 + 1);
        items.push(book);
    }

    let profile = TasteProfile::from_library(&items);

    assert_close(profile.kind_preference(MediaKind::Book), 1.0);
    assert_close(profile.kind_preference(MediaKind::Game), 0.0);
}

#[test]
fn test_score_formula() {
    let items = vec![
        record(MediaKind::Tv, "A", WatchStatus::Completed, Some(9.0), &["Drama", "Thriller"]),
        record(MediaKind::Movie, "B", WatchStatus::Planned, None, &[]),
    ];
    let profile = TasteProfile::from_library(&items);

    let drama: TagSet = ["Drama", "Crime"].iter().collect();
    assert_close(profile.score(MediaKind::Tv, &drama), 0.65 * 0.5 + 0.35 * 0.5);

    let both: TagSet = ["thriller", "drama"].iter().collect();
    assert_close(profile.score(MediaKind::Movie, &both), 0.65 + 0.35 * 0.5);

    assert_close(profile.score(MediaKind::Tv, &TagSet::new()), 0.15 + 0.35 * 0.5);
}

#[test]
fn test_score_without_tag_history_falls_back() {
    let profile = TasteProfile::from_library(&[record(
        MediaKind::Anime,
        "Mushishi",
        WatchStatus::Planned,
        None,
        &[],
    )]);

    let tags: TagSet = ["Drama"].iter().collect();
    assert_close(profile.score(MediaKind::Anime, &tags), 0.15 + 0.35);
}

// ============================================================================
// Seeds and pool
// ============================================================================

#[test]
fn test_seeds_prefer_rated_linked_records() {
    let items = vec![
        linked(record(MediaKind::Tv, "Low", WatchStatus::Completed, Some(4.0), &[]), tv_ids(1)),
        record(MediaKind::Tv, "Unlinked", WatchStatus::Completed, Some(10.0), &[]),
        linked(record(MediaKind::Tv, "Unrated", WatchStatus::Planned, None, &[]), tv_ids(2)),
        linked(record(MediaKind::Tv, "High", WatchStatus::Completed, Some(9.0), &[]), tv_ids(3)),
    ];

    let seeds: Vec<&str> = seeds(&items).iter().map(|i| i.title.as_str()).collect();

    assert_eq!(seeds, vec!["High", "Low"]);
}

#[test]
fn test_seeds_fall_back_to_any_linked_record() {
    let items = vec![
        record(MediaKind::Tv, "Unlinked", WatchStatus::Planned, None, &[]),
        linked(record(MediaKind::Tv, "Linked", WatchStatus::Planned, None, &[]), tv_ids(2)),
    ];

    let seeds: Vec<&str> = seeds(&items).iter().map(|i| i.title.as_str()).collect();

    assert_eq!(seeds, vec!["Linked"]);
}

#[tokio::test]
async fn test_pool_excludes_library_and_duplicates() {
    let items = vec![
        linked(record(MediaKind::Tv, "Dark", WatchStatus::Completed, Some(9.0), &[]), tv_ids(70523)),
        record(MediaKind::Tv, "The OA", WatchStatus::Planned, None, &[]),
    ];
    let film_tv = MockMetadataProvider::new(ProviderFamily::FilmTv).with_similar(
        tv_ids(70523),
        vec![
            tv(1, "1899", &[]),
            tv(2, "the oa ", &[]),
            tv(70523, "Dark (renamed)", &[]),
            tv(1, "1899", &[]),
        ],
    );
    let trending = MockTrendingProvider::new()
        .with_trending(ScreenMedia::Tv, vec![tv(1, "1899", &[]), tv(3, "Devs", &[])]);
    let providers = ProviderSet::new()
        .with_provider(Arc::new(film_tv.clone()))
        .with_trending(Arc::new(trending.clone()));

    let pool = gather_pool(&providers, &items).await;

    let names: Vec<&str> = pool.candidates.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(names, vec!["1899", "Devs"]);
    assert!(pool.notices.is_empty());
    assert_eq!(film_tv.calls(), vec![ProviderCall::Similar(tv_ids(70523))]);
    assert_eq!(
        trending.calls(),
        vec![
            ProviderCall::Trending(ScreenMedia::Movie),
            ProviderCall::Trending(ScreenMedia::Tv)
        ]
    );
}

#[tokio::test]
async fn test_pool_survives_failed_lookups() {
    let anime_ids = ProviderIds::AnimeManga {
        mal_id: 457,
        media: AnimeMedia::Anime,
    };
    let items = vec![
        linked(record(MediaKind::Tv, "Dark", WatchStatus::Completed, Some(9.0), &[]), tv_ids(1)),
        linked(record(MediaKind::Anime, "Mushishi", WatchStatus::Completed, Some(8.0), &[]), anime_ids),
    ];
    let film_tv = MockMetadataProvider::new(ProviderFamily::FilmTv).with_similar_error(tv_ids(1), "503");
    let trending = MockTrendingProvider::new()
        .with_trending_error(ScreenMedia::Movie, "timeout")
        .with_trending(ScreenMedia::Tv, vec![tv(9, "Devs", &[])]);
    let providers = ProviderSet::new()
        .with_provider(Arc::new(film_tv))
        .with_trending(Arc::new(trending));

    let pool = gather_pool(&providers, &items).await;

    assert_eq!(pool.candidates.len(), 1, "anime seed is skipped without a provider");
    assert_eq!(pool.notices.len(), 2);
    assert!(pool.notices[0].contains("Dark"));
}

#[tokio::test]
async fn test_pool_is_capped() {
    let items = vec![linked(
        record(MediaKind::Tv, "Seed", WatchStatus::Completed, Some(7.0), &[]),
        tv_ids(1),
    )];
    let similar: Vec<Candidate> = (100..200).map(|n| tv(n, &format!("Show {n}"), &[])).collect();
    let providers = ProviderSet::new().with_provider(Arc::new(
        MockMetadataProvider::new(ProviderFamily::FilmTv).with_similar(tv_ids(1), similar),
    ));

    let pool = gather_pool(&providers, &items).await;

    assert_eq!(pool.candidates.len(), POOL_CAP);
    assert_eq!(pool.candidates[0].title, "Show 100");
}

// ============================================================================
// Output
// ============================================================================

#[tokio::test]
async fn test_ranked_list_prefers_shared_tags_and_diversifies() {
    let items = vec![record(
        MediaKind::Tv,
        "Severance",
        WatchStatus::Completed,
        Some(9.0),
        &["Drama", "Thriller"],
    )];
    let trending = MockTrendingProvider::new().with_trending(
        ScreenMedia::Tv,
        vec![
            tv(1, "Ted Lasso", &["Comedy"]),
            tv(2, "The Wire", &["Drama", "Crime"]),
            tv(3, "Nathan For You", &["Comedy"]),
            tv(4, "Mad Men", &["Drama"]),
            tv(5, "Succession", &["Drama", "Comedy"]),
        ],
    );
    let providers = ProviderSet::new().with_trending(Arc::new(trending));

    let report = recommend(&providers, &items, RecommendMode::Ranked, 2).await;

    let Recommendation::Ranked(ranked) = report.recommendation else {
        panic!("expected a ranked list");
    };
    assert_eq!(
        titles(&ranked),
        vec!["The Wire", "Mad Men", "Ted Lasso", "Nathan For You"]
    );
    let drama = ranked
        .iter()
        .filter(|entry| entry.tags.contains("drama"))
        .count();
    assert_eq!(drama, 2);
    assert!(report.notices.is_empty());
}

#[tokio::test]
async fn test_details_enrich_and_failures_score_low() {
    let items = vec![record(MediaKind::Tv, "Dark", WatchStatus::Completed, Some(10.0), &["Mystery"])];
    let film_tv = MockMetadataProvider::new(ProviderFamily::FilmTv)
        .with_details(
            tv_ids(1),
            CandidateDetails {
                genres: vec!["Mystery".to_string()],
                ..Default::default()
            },
        )
        .with_details_error(tv_ids(2), "429");
    let trending = MockTrendingProvider::new()
        .with_trending(ScreenMedia::Tv, vec![tv(1, "Devs", &[]), tv(2, "Lost", &["Mystery"])]);
    let providers = ProviderSet::new()
        .with_provider(Arc::new(film_tv))
        .with_trending(Arc::new(trending));

    let (scored, notices) = score_pool(&providers, &items, 4).await;

    assert_eq!(titles(&scored), vec!["Devs", "Lost"]);
    assert_close(scored[0].score, 0.65 + 0.35);
    assert_close(scored[1].score, 0.1);
    assert_eq!(notices, vec!["Couldn't load details for 1 of 2 candidates"]);
}

/// Details provider that panics for one identifier
struct PanicsOn {
    inner: MockMetadataProvider,
    ids: ProviderIds,
}

impl MetadataProvider for PanicsOn {
    fn family(&self) -> ProviderFamily {
        self.inner.family()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn search(&self, kind: MediaKind, query: &str) -> crate::api::ProviderFuture<'_, Vec<Candidate>> {
        self.inner.search(kind, query)
    }

    fn details(&self, ids: ProviderIds) -> crate::api::ProviderFuture<'_, CandidateDetails> {
        if ids == self.ids {
            panic!("malformed response for {}", ids);
        }
        self.inner.details(ids)
    }

    fn similar(&self, ids: ProviderIds) -> crate::api::ProviderFuture<'_, Vec<Candidate>> {
        self.inner.similar(ids)
    }
}

#[tokio::test]
async fn test_panicking_detail_lookup_fails_only_its_candidate() {
    let items = vec![record(MediaKind::Tv, "Dark", WatchStatus::Completed, Some(10.0), &["Mystery"])];
    let film_tv = PanicsOn {
        inner: MockMetadataProvider::new(ProviderFamily::FilmTv).with_details(
            tv_ids(1),
            CandidateDetails {
                genres: vec!["Mystery".to_string()],
                ..Default::default()
            },
        ),
        ids: tv_ids(2),
    };
    let trending = MockTrendingProvider::new()
        .with_trending(ScreenMedia::Tv, vec![tv(1, "Devs", &[]), tv(2, "Lost", &["Mystery"])]);
    let providers = ProviderSet::new()
        .with_provider(Arc::new(film_tv))
        .with_trending(Arc::new(trending));

    let (scored, notices) = score_pool(&providers, &items, 2).await;

    assert_eq!(titles(&scored), vec!["Devs", "Lost"]);
    assert_close(scored[1].score, 0.1);
    assert_eq!(notices, vec!["Couldn't load details for 1 of 2 candidates"]);
}

#[tokio::test]
async fn test_empty_pool_reports_message() {
    let report = recommend(&ProviderSet::new(), &[], RecommendMode::Random, 4).await;

    assert_eq!(
        report.recommendation,
        Recommendation::Empty {
            message: EMPTY_POOL_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_random_mode_returns_exactly_one_pool_entry() {
    let trending = MockTrendingProvider::new().with_trending(
        ScreenMedia::Tv,
        vec![tv(1, "Devs", &[]), tv(2, "Lost", &[]), tv(3, "Dark", &[])],
    );
    let providers = ProviderSet::new().with_trending(Arc::new(trending));
    let mut rng = StdRng::seed_from_u64(42);

    let report = recommend_with_rng(&providers, &[], RecommendMode::Random, 1, &mut rng).await;

    let Recommendation::Pick(pick) = report.recommendation else {
        panic!("expected a single pick");
    };
    assert!(["Devs", "Lost", "Dark"].contains(&pick.candidate.title.as_str()));
}

#[test]
fn test_diversify_limits_primary_tags_only() {
    let sorted = vec![
        scored("a", &["Drama"], 0.9),
        scored("b", &["drama", "Crime"], 0.8),
        scored("c", &["Drama"], 0.7),
        scored("d", &[], 0.6),
        scored("e", &[], 0.5),
        scored("f", &[], 0.4),
        scored("g", &["Crime", "Drama"], 0.3),
    ];

    assert_eq!(titles(&diversify(&sorted)), vec!["a", "b", "d", "e", "f", "g"]);
}

#[test]
fn test_diversify_stops_at_limit() {
    let sorted: Vec<RecommendedCandidate> = (0..12)
        .map(|n| scored(&format!("t{n}"), &[], 1.0 - n as f64 * 0.01))
        .collect();

    assert_eq!(diversify(&sorted).len(), RANKED_LIMIT);
}

#[test]
fn test_roulette_favors_heavier_entries() {
    let sorted = vec![scored("heavy", &[], 0.9), scored("light", &[], 0.0)];
    let mut rng = StdRng::seed_from_u64(7);

    let heavy = (0..200)
        .filter_map(|_| roulette(&sorted, &mut rng))
        .filter(|pick| pick.candidate.title == "heavy")
        .count();

    assert!(heavy > 190, "heavy picked {heavy} times");
}

#[test]
fn test_roulette_handles_zero_scores_and_empty_input() {
    let mut rng = StdRng::seed_from_u64(1);

    assert!(roulette(&[scored("zero", &[], 0.0)], &mut rng).is_some());
    assert!(roulette(&[], &mut rng).is_none());
}

#[test]
fn test_roulette_only_spins_the_top_entries() {
    let mut sorted: Vec<RecommendedCandidate> = (0..RANDOM_POOL)
        .map(|n| scored(&format!("top{n}"), &[], 0.0))
        .collect();
    sorted.push(scored("tail", &[], 0.0));
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let pick = roulette(&sorted, &mut rng).unwrap();
        assert_ne!(pick.candidate.title, "tail");
    }
}
