//! Matched-pair types produced by the identity matcher.

use serde::{Deserialize, Serialize};

/// How a pair of records was matched across the two datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Both records share the same non-empty identifier.
    ExactId,
    /// Both records have byte-equal normalized names.
    ExactName,
    /// The records were paired by name-similarity scoring.
    FuzzyName,
}

/// Association of one record from dataset A with one from dataset B.
///
/// `record_a` and `record_b` are indices into the canonical record vectors
/// of the [`crate::models::AuditResult`] that owns this pair. Each index
/// appears in at most one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Index into the first dataset's canonical records.
    pub record_a: usize,
    /// Index into the second dataset's canonical records.
    pub record_b: usize,
    /// The pass that produced this pair.
    pub match_method: MatchMethod,
    /// Similarity in [0, 1]; 1.0 for both exact passes.
    pub match_score: f64,
}
