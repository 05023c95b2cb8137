//! Data model for the reconciliation engine.
//!
//! This module defines the canonical employee record, the matching and
//! discrepancy types produced by the comparison pipeline, and the final
//! audit result handed back to the caller.

mod discrepancy;
mod matching;
mod record;
mod report;

pub use discrepancy::{
    Discrepancy, DiscrepancyKind, EmployeeRef, Severity, RECORD_MISSING_FIELD,
};
pub use matching::{MatchMethod, MatchedPair};
pub use record::{DatasetSide, EmployeeRecord, FieldValue, RawRow};
pub use report::{AuditResult, AuditSummary, AuditWarning, RiskLevel};
