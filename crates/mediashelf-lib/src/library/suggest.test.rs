use super::*;
use crate::primitives::{ProviderIds, ScreenMedia};

fn movie(id: u64, title: &str) -> Candidate {
    Candidate::new(
        ProviderIds::FilmTv {
            tmdb_id: id,
            media: ScreenMedia::Movie,
        },
        title,
    )
}

fn titles(suggestions: &Suggestions) -> Vec<&str> {
    suggestions.candidates().map(|c| c.title.as_str()).collect()
}

#[test]
fn test_rank_orders_by_similarity() {
    let candidates = vec![
        movie(1, "Dune: Part Two"),
        movie(2, "Dunkirk"),
        movie(3, "Dune"),
    ];

    let suggestions = rank("dune", candidates);

    assert_eq!(titles(&suggestions)[0], "Dune");
    assert_eq!(titles(&suggestions)[1], "Dune: Part Two");
    for pair in suggestions.ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_rank_truncates_to_seven() {
    let candidates = (0..12).map(|i| movie(i, &format!("Alien {}", i))).collect();

    let suggestions = rank("alien", candidates);

    assert_eq!(suggestions.ranked.len(), MAX_SUGGESTIONS);
}

#[test]
fn test_rank_ties_keep_provider_order() {
    let candidates = vec![movie(1, "Heat"), movie(2, "Heat!"), movie(3, "heat")];

    let suggestions = rank("heat", candidates);

    let ids: Vec<_> = suggestions
        .candidates()
        .map(|c| match c.ids {
            ProviderIds::FilmTv { tmdb_id, .. } => tmdb_id,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_ghost_completion_when_top_extends_query() {
    let suggestions = rank("the godf", vec![movie(1, "The Godfather"), movie(2, "Godzilla")]);

    assert_eq!(suggestions.ghost.as_deref(), Some("The Godfather"));
}

#[test]
fn test_no_ghost_when_top_is_not_a_completion() {
    let suggestions = rank("godfather", vec![movie(1, "The Godfather")]);

    assert_eq!(suggestions.ranked.len(), 1);
    assert_eq!(suggestions.ghost, None);
}

#[test]
fn test_empty_query_yields_nothing() {
    let suggestions = rank("", vec![movie(1, "Up")]);

    assert!(suggestions.is_empty());
    assert_eq!(suggestions.ghost, None);
}

#[test]
fn test_single_char_query_is_suppressed() {
    let suggestions = rank("u", vec![movie(1, "Up"), movie(2, "Us")]);

    assert!(suggestions.is_empty());
    assert_eq!(suggestions.ghost, None);
    assert!(!query_is_rankable("u"));
    assert!(!query_is_rankable(" ! "));
    assert!(query_is_rankable("up"));
}

#[test]
fn test_punctuation_does_not_count_toward_length() {
    // normalizes to "u"
    let suggestions = rank("u!!", vec![movie(1, "Up")]);
    assert!(suggestions.is_empty());
}

#[test]
fn test_pick_is_one_based() {
    let suggestions = rank("alien", vec![movie(1, "Alien"), movie(2, "Aliens")]);

    assert_eq!(suggestions.pick(1).map(|c| c.title.as_str()), Some("Alien"));
    assert_eq!(suggestions.pick(2).map(|c| c.title.as_str()), Some("Aliens"));
    assert!(suggestions.pick(0).is_none());
    assert!(suggestions.pick(3).is_none());
}
