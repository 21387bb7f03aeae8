use super::*;

// ============================================================================
// Normalization Tests
// ============================================================================

#[test]
fn test_normalize_collapses_punctuation_runs() {
    assert_eq!(normalize_title("Spider-Man: Into the Spider-Verse"), "spider man into the spider verse");
    assert_eq!(normalize_title("  --Hello,   World!!  "), "hello world");
}

#[test]
fn test_normalize_folds_apostrophe_variants() {
    assert_eq!(normalize_title("Howl's Moving Castle"), "howls moving castle");
    assert_eq!(normalize_title("Howl’s Moving Castle"), "howls moving castle");
    assert_eq!(normalize_title("Howl`s Moving Castle"), "howls moving castle");
}

#[test]
fn test_normalize_keeps_unicode_letters() {
    assert_eq!(normalize_title("Amélie"), "amélie");
    assert_eq!(normalize_title("進撃の巨人"), "進撃の巨人");
}

#[test]
fn test_normalize_empty_and_symbol_only() {
    assert_eq!(normalize_title(""), "");
    assert_eq!(normalize_title("?!…"), "");
}

// ============================================================================
// Edit Distance Tests
// ============================================================================

#[test]
fn test_levenshtein_classic_cases() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn test_levenshtein_is_symmetric() {
    let pairs = [("dune", "dunes"), ("alien", "aliens"), ("heat", "hate")];
    for (a, b) in pairs {
        assert_eq!(levenshtein(a, b), levenshtein(b, a), "{} / {}", a, b);
    }
}

#[test]
fn test_levenshtein_counts_chars_not_bytes() {
    assert_eq!(levenshtein("café", "cafe"), 1);
}

// ============================================================================
// Similarity Tests
// ============================================================================

#[test]
fn test_similarity_identity_is_one() {
    for title in ["Dune", "The Lord of the Rings", "Frieren: Beyond Journey's End", "x"] {
        assert_eq!(similarity(title, title), 1.0, "{}", title);
    }
}

#[test]
fn test_similarity_equal_after_normalization() {
    assert_eq!(similarity("the office", "The Office!"), 1.0);
    assert_eq!(similarity("howls moving castle", "Howl’s Moving Castle"), 1.0);
}

#[test]
fn test_similarity_prefix_range_and_boost() {
    let short = similarity("th", "The Shawshank Redemption");
    let long = similarity("the shawshank redem", "The Shawshank Redemption");

    assert!((PREFIX_BASE..1.0).contains(&short), "got {}", short);
    assert!((PREFIX_BASE..1.0).contains(&long), "got {}", long);
    assert!(long > short, "longer prefixes should score higher");
}

#[test]
fn test_similarity_prefix_exact_value() {
    // "dun" covers 3 of 4 chars of "dune"
    let score = similarity("dun", "Dune");
    assert!((score - (0.85 + 0.15 * 0.75)).abs() < 1e-9);
}

#[test]
fn test_similarity_prefix_branch_is_asymmetric() {
    let forward = similarity("star", "Star Wars");
    let backward = similarity("Star Wars", "star");

    assert!(forward >= PREFIX_BASE);
    assert!(backward < PREFIX_BASE);
    assert_ne!(forward, backward);
}

#[test]
fn test_similarity_edit_branch_is_symmetric() {
    let c = similarity("Heat", "Hate");
    let d = similarity("Hate", "Heat");
    assert_eq!(c, d);
    assert!((c - 0.5).abs() < 1e-9);
}

#[test]
fn test_similarity_empty_inputs_floor_at_zero() {
    assert_eq!(similarity("", "Dune"), 0.0);
    assert_eq!(similarity("Dune", ""), 0.0);
    assert_eq!(similarity("", ""), 0.0);
}

#[test]
fn test_similarity_bounded() {
    let samples = [
        ("a", "zzzzzzzzzz"),
        ("matrix", "The Matrix Reloaded"),
        ("breaking bad", "Better Call Saul"),
    ];
    for (q, c) in samples {
        let score = similarity(q, c);
        assert!((0.0..=1.0).contains(&score), "{} vs {} = {}", q, c, score);
    }
}

#[test]
fn test_similarity_is_deterministic() {
    let first = similarity("spirited away", "Spirited Away (2001)");
    for _ in 0..10 {
        assert_eq!(similarity("spirited away", "Spirited Away (2001)"), first);
    }
}
