//! Discrepancy and severity types.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::FieldValue;

/// Sentinel field name for a record that is present on only one side.
pub const RECORD_MISSING_FIELD: &str = "employee_record";

/// The kind of disagreement a discrepancy records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Both sides carry a value and they disagree beyond tolerance.
    ValueMismatch,
    /// The field (or whole record) is absent from the first dataset.
    MissingInA,
    /// The field (or whole record) is absent from the second dataset.
    MissingInB,
    /// The two sides carry values of incompatible types.
    TypeMismatch,
}

/// Severity of a single discrepancy, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Rounding-scale difference; unlikely to matter.
    Low,
    /// Small but real difference worth a look.
    Medium,
    /// Material difference or a missing monetary value.
    High,
    /// Large difference likely to indicate a payroll error.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Which employee a discrepancy concerns.
///
/// For a matched pair both indices are set; for a record missing on one
/// side only the present side's index is set. `label` is the employee's
/// display name, carried so reports need no index chasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRef {
    /// Index into the first dataset's records, when present there.
    pub record_a: Option<usize>,
    /// Index into the second dataset's records, when present there.
    pub record_b: Option<usize>,
    /// Display name for reporting.
    pub label: String,
}

/// One detected disagreement between the two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// The matched pair (or single unmatched record) this concerns.
    pub employee: EmployeeRef,
    /// Canonical field in question, or [`RECORD_MISSING_FIELD`] when a
    /// whole record is absent on one side.
    pub field_name: String,
    /// The observed value in the first dataset, when present.
    pub value_a: Option<FieldValue>,
    /// The observed value in the second dataset, when present.
    pub value_b: Option<FieldValue>,
    /// Signed delta `value_b - value_a` when both values are numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<Decimal>,
    /// The kind of disagreement.
    pub kind: DiscrepancyKind,
    /// Severity derived from magnitude and field importance.
    pub severity: Severity,
}
