//! The reconciliation pipeline.
//!
//! This module contains the stages between raw rows and the final audit
//! result: record normalization, identity matching (exact and fuzzy),
//! field-level comparison, severity classification, risk scoring, and the
//! orchestrating [`audit`] entry point.

mod auditor;
mod fields;
mod identity;
mod normalize;
mod risk;
mod severity;
mod similarity;

pub use auditor::audit;
pub use fields::compare_pairs;
pub use identity::{match_records, MatchOutcome};
pub use normalize::{normalize, NormalizeOutput};
pub use risk::summarize;
pub use severity::classify_severity;
pub use similarity::name_similarity;
