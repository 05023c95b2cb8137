//! Name-similarity scoring for fuzzy matching.
//!
//! Jaro-Winkler over normalized names, taken as the better of the
//! as-written order and token-sorted order so that reordered names
//! ("john smith" vs "smith john") still score high.

use strsim::jaro_winkler;

/// Similarity between two normalized names, in [0, 1].
///
/// Inputs are expected to already be normalized
/// (see [`crate::models::EmployeeRecord::full_name`]).
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let direct = jaro_winkler(a, b);
    let sorted = jaro_winkler(&sort_tokens(a), &sort_tokens(b));
    direct.max(sorted)
}

fn sort_tokens(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
