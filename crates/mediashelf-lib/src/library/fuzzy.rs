//! Title similarity for search-as-you-type matching
//!
//! Scores a typed query against a provider title in `[0, 1]`.
//!
//! # Algorithm Overview
//!
//! Both strings are normalized first (see [`normalize_title`]), then:
//!
//! 1. **Exact** - equal normalized strings score `1.0`
//! 2. **Prefix completion** - a candidate that extends the query scores in
//!    `[0.85, 1.0)`, boosted by how much of the candidate the query covers
//! 3. **Edit distance** - otherwise `1 - levenshtein / max_len`
//!
//! The prefix branch is deliberately one-directional: "star wa" against
//! "Star Wars" is a completion, "Star Wars" against "star wa" is not.
//!
//! # Examples
//!
//! ```
//! use mediashelf_lib::library::fuzzy::{normalize_title, similarity};
//!
//! assert_eq!(normalize_title("  Schindler’s  List! "), "schindlers list");
//! assert_eq!(similarity("the matrix", "The Matrix"), 1.0);
//! assert!(similarity("the mat", "The Matrix") >= 0.85);
//! assert!(similarity("matrix", "Inception") < 0.5);
//! ```

/// Base score for a prefix completion
pub const PREFIX_BASE: f64 = 0.85;

/// Maximum boost on top of [`PREFIX_BASE`] when the query covers the whole candidate
pub const PREFIX_BOOST: f64 = 0.15;

/// Canonical form used for every comparison
///
/// Lowercases, drops apostrophes (folding the typographic variants first so
/// "Schindler’s" and "Schindler's" agree), collapses every run of
/// non-alphanumeric characters to a single space, and trims.
pub fn normalize_title(input: &str) -> String {
    let mut normalized = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        let c = fold_apostrophe(c);
        if c == '\'' {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    normalized
}

fn fold_apostrophe(c: char) -> char {
    match c {
        '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`' | '\u{00B4}' => '\'',
        other => other,
    }
}

/// Similarity of `candidate_title` to the user's `query`, in `[0, 1]`
pub fn similarity(query: &str, candidate_title: &str) -> f64 {
    let query = normalize_title(query);
    let candidate = normalize_title(candidate_title);
    normalized_similarity(&query, &candidate)
}

/// [`similarity`] for inputs that are already normalized
pub fn normalized_similarity(query: &str, candidate: &str) -> f64 {
    if query == candidate {
        // Two empty strings carry no signal
        return if query.is_empty() { 0.0 } else { 1.0 };
    }

    let query_len = query.chars().count();
    let candidate_len = candidate.chars().count();

    if query_len == 0 || candidate_len == 0 {
        return 0.0;
    }

    if candidate.starts_with(query) {
        let coverage = (query_len as f64 / candidate_len as f64).min(1.0);
        return (PREFIX_BASE + PREFIX_BOOST * coverage).min(1.0);
    }

    let distance = levenshtein(query, candidate);
    let longest = query_len.max(candidate_len) as f64;
    (1.0 - distance as f64 / longest).max(0.0)
}

/// Unit-cost edit distance over `char`s
///
/// Single-row dynamic programming: the row spans the shorter string, so
/// memory is `O(min(n, m))`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, lc) in long.iter().enumerate() {
        // row[0] before overwrite is the diagonal for j = 0
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, sc) in short.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(lc != sc);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }

    row[short.len()]
}

#[cfg(test)]
mod tests {
    include!("fuzzy.test.rs");
}
