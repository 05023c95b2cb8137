//! The audit result, its summary, and non-fatal warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::discrepancy::{Discrepancy, Severity};
use super::matching::MatchedPair;
use super::record::{DatasetSide, EmployeeRecord};

/// A recoverable issue collected during parsing or normalization.
///
/// Warnings never abort a run; they are surfaced alongside the result so
/// the auditor can judge how complete the comparison was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditWarning {
    /// A row was dropped or a column left unmapped during normalization.
    Normalization {
        /// Which file the issue occurred in.
        file: DatasetSide,
        /// 1-based source row, when the issue concerns a single row.
        row: Option<usize>,
        /// What happened.
        message: String,
    },
    /// A document-text row fell below the extraction confidence threshold
    /// and was excluded from comparison.
    LowConfidenceExtraction {
        /// Which file the row came from.
        file: DatasetSide,
        /// 1-based source line of the excluded row.
        row: usize,
        /// The computed confidence in [0, 1].
        confidence: f64,
    },
}

impl fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalization { file, row, message } => match row {
                Some(n) => write!(f, "{file}, row {n}: {message}"),
                None => write!(f, "{file}: {message}"),
            },
            Self::LowConfidenceExtraction {
                file,
                row,
                confidence,
            } => write!(
                f,
                "{file}, row {row}: extraction confidence {confidence:.2} below threshold, row excluded"
            ),
        }
    }
}

/// Overall risk classification for a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No discrepancies and nothing unmatched.
    Clean,
    /// Only low/medium discrepancies or a few unmatched employees.
    MinorIssues,
    /// High-severity discrepancies or a notable unmatched share.
    SignificantIssues,
    /// Critical discrepancies or a large unmatched share.
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::MinorIssues => write!(f, "minor_issues"),
            Self::SignificantIssues => write!(f, "significant_issues"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Aggregate counts and the overall risk classification for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Number of records extracted from the first dataset.
    pub total_records_a: usize,
    /// Number of records extracted from the second dataset.
    pub total_records_b: usize,
    /// Number of matched pairs compared field by field.
    pub matched_count: usize,
    /// Employees present only in the first dataset.
    pub unmatched_a_count: usize,
    /// Employees present only in the second dataset.
    pub unmatched_b_count: usize,
    /// Low-severity discrepancy count.
    pub low_count: usize,
    /// Medium-severity discrepancy count.
    pub medium_count: usize,
    /// High-severity discrepancy count.
    pub high_count: usize,
    /// Critical-severity discrepancy count.
    pub critical_count: usize,
    /// The overall risk classification.
    pub risk: RiskLevel,
    /// Version of the engine that produced this result.
    pub engine_version: String,
}

impl AuditSummary {
    /// Returns the discrepancy count for one severity.
    pub fn count_for(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low_count,
            Severity::Medium => self.medium_count,
            Severity::High => self.high_count,
            Severity::Critical => self.critical_count,
        }
    }

    /// Total discrepancy count across all severities.
    pub fn total_discrepancies(&self) -> usize {
        self.low_count + self.medium_count + self.high_count + self.critical_count
    }
}

/// Top-level output of one comparison run.
///
/// Constructed once by [`crate::comparison::audit`], immutable afterwards,
/// and owned exclusively by the caller, which is responsible for
/// serializing or persisting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Canonical records extracted from the first dataset.
    pub records_a: Vec<EmployeeRecord>,
    /// Canonical records extracted from the second dataset.
    pub records_b: Vec<EmployeeRecord>,
    /// Matched pairs, in match order (exact-id, exact-name, then fuzzy).
    pub matched_pairs: Vec<MatchedPair>,
    /// Indices into `records_a` for employees absent from the second set.
    pub unmatched_a: Vec<usize>,
    /// Indices into `records_b` for employees absent from the first set.
    pub unmatched_b: Vec<usize>,
    /// Every detected disagreement, in pair order then unmatched order.
    pub discrepancies: Vec<Discrepancy>,
    /// Aggregate counts and the risk classification.
    pub summary: AuditSummary,
    /// Non-fatal parse and normalization warnings.
    pub warnings: Vec<AuditWarning>,
}
