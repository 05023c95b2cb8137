//! The audit orchestrator.
//!
//! Drives the pipeline end to end: parse both files, normalize, match,
//! compare, score, and assemble the immutable [`AuditResult`]. The first
//! fatal parse error aborts the run; per-row issues accumulate as
//! warnings on the result instead.

use tracing::{debug, info};

use crate::config::AuditConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditResult, DatasetSide, Discrepancy, DiscrepancyKind, EmployeeRecord, EmployeeRef,
    RECORD_MISSING_FIELD,
};
use crate::parse::{parse_rows, FileFormat};

use super::fields::compare_pairs;
use super::identity::match_records;
use super::normalize::normalize;
use super::risk::summarize;
use super::severity::classify_severity;

/// Compares two payroll files and returns the full audit result.
///
/// The engine performs no I/O: callers hand in the raw bytes and the
/// declared format of each file. Each invocation owns its working data
/// exclusively, so concurrent `audit` calls need no external locking.
///
/// # Errors
///
/// Fails fast with the first fatal error: an invalid configuration, an
/// unrecognized format tag, or a file from which no usable rows could be
/// extracted. Recoverable issues (dropped rows, unmapped columns,
/// low-confidence document rows) never fail the run; they are attached to
/// the result as warnings.
///
/// # Example
///
/// ```
/// use payroll_auditor::{audit, AuditConfig, FileFormat};
///
/// let previous = b"id,name,gross\nE1,John Smith,1000.00\n";
/// let current = b"id,name,gross\nE1,John Smith,1000.00\n";
/// let result = audit(
///     previous,
///     FileFormat::Delimited,
///     current,
///     FileFormat::Delimited,
///     &AuditConfig::default(),
/// )?;
/// assert!(result.discrepancies.is_empty());
/// # Ok::<(), payroll_auditor::EngineError>(())
/// ```
pub fn audit(
    bytes_a: &[u8],
    format_a: FileFormat,
    bytes_b: &[u8],
    format_b: FileFormat,
    config: &AuditConfig,
) -> EngineResult<AuditResult> {
    config.validate()?;

    let parsed_a = parse_rows(bytes_a, format_a, DatasetSide::A, config)?;
    let parsed_b = parse_rows(bytes_b, format_b, DatasetSide::B, config)?;
    debug!(
        rows_a = parsed_a.rows.len(),
        rows_b = parsed_b.rows.len(),
        "parsed both input files"
    );

    let mut warnings = parsed_a.warnings;
    warnings.extend(parsed_b.warnings);

    let normalized_a = normalize(&parsed_a.rows, DatasetSide::A, config);
    let normalized_b = normalize(&parsed_b.rows, DatasetSide::B, config);
    warnings.extend(normalized_a.warnings);
    warnings.extend(normalized_b.warnings);

    let records_a = normalized_a.records;
    let records_b = normalized_b.records;

    let outcome = match_records(&records_a, &records_b, config);
    debug!(
        matched = outcome.pairs.len(),
        unmatched_a = outcome.unmatched_a.len(),
        unmatched_b = outcome.unmatched_b.len(),
        "identity matching complete"
    );

    let mut discrepancies = compare_pairs(&records_a, &records_b, &outcome.pairs, config);

    for &index in &outcome.unmatched_a {
        discrepancies.push(record_missing(
            &records_a[index],
            Some(index),
            None,
            DiscrepancyKind::MissingInB,
            config,
        ));
    }
    for &index in &outcome.unmatched_b {
        discrepancies.push(record_missing(
            &records_b[index],
            None,
            Some(index),
            DiscrepancyKind::MissingInA,
            config,
        ));
    }

    let summary = summarize(
        &discrepancies,
        &outcome.pairs,
        &outcome.unmatched_a,
        &outcome.unmatched_b,
        records_a.len(),
        records_b.len(),
    );

    info!(
        records_a = records_a.len(),
        records_b = records_b.len(),
        discrepancies = discrepancies.len(),
        warnings = warnings.len(),
        risk = %summary.risk,
        "audit complete"
    );

    Ok(AuditResult {
        records_a,
        records_b,
        matched_pairs: outcome.pairs,
        unmatched_a: outcome.unmatched_a,
        unmatched_b: outcome.unmatched_b,
        discrepancies,
        summary,
        warnings,
    })
}

/// A record present on only one side becomes a single record-level
/// discrepancy against the sentinel field.
fn record_missing(
    record: &EmployeeRecord,
    record_a: Option<usize>,
    record_b: Option<usize>,
    kind: DiscrepancyKind,
    config: &AuditConfig,
) -> Discrepancy {
    let severity = classify_severity(RECORD_MISSING_FIELD, None, None, kind, &config.severity);
    Discrepancy {
        employee: EmployeeRef {
            record_a,
            record_b,
            label: record.display_name.clone(),
        },
        field_name: RECORD_MISSING_FIELD.to_string(),
        value_a: None,
        value_b: None,
        difference: None,
        kind,
        severity,
    }
}
