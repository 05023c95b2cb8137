//! Risk scoring.
//!
//! Aggregates discrepancy counts by severity and folds in the
//! unmatched-employee ratio to produce the run's overall risk
//! classification. Deterministic and side-effect-free.

use crate::models::{AuditSummary, Discrepancy, MatchedPair, RiskLevel, Severity};

/// Share of unmatched employees above which a run is critical.
const CRITICAL_UNMATCHED_RATIO: f64 = 0.25;
/// Share of unmatched employees above which a run has significant issues.
const SIGNIFICANT_UNMATCHED_RATIO: f64 = 0.10;

/// Builds the run summary from the pipeline's outputs.
pub fn summarize(
    discrepancies: &[Discrepancy],
    matched_pairs: &[MatchedPair],
    unmatched_a: &[usize],
    unmatched_b: &[usize],
    total_records_a: usize,
    total_records_b: usize,
) -> AuditSummary {
    let mut low_count = 0;
    let mut medium_count = 0;
    let mut high_count = 0;
    let mut critical_count = 0;
    for discrepancy in discrepancies {
        match discrepancy.severity {
            Severity::Low => low_count += 1,
            Severity::Medium => medium_count += 1,
            Severity::High => high_count += 1,
            Severity::Critical => critical_count += 1,
        }
    }

    let unmatched = unmatched_a.len() + unmatched_b.len();
    let total = total_records_a + total_records_b;
    let unmatched_ratio = if total == 0 {
        0.0
    } else {
        unmatched as f64 / total as f64
    };

    let risk = if critical_count > 0 || unmatched_ratio > CRITICAL_UNMATCHED_RATIO {
        RiskLevel::Critical
    } else if high_count > 0 || unmatched_ratio > SIGNIFICANT_UNMATCHED_RATIO {
        RiskLevel::SignificantIssues
    } else if !discrepancies.is_empty() || unmatched > 0 {
        RiskLevel::MinorIssues
    } else {
        RiskLevel::Clean
    };

    AuditSummary {
        total_records_a,
        total_records_b,
        matched_count: matched_pairs.len(),
        unmatched_a_count: unmatched_a.len(),
        unmatched_b_count: unmatched_b.len(),
        low_count,
        medium_count,
        high_count,
        critical_count,
        risk,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
