//! Severity classification.
//!
//! A pure function of `(field_name, value_a, value_b, kind)` and the
//! configured breakpoints — no hidden state, so identical inputs always
//! yield identical severity.

use rust_decimal::Decimal;

use crate::config::{is_monetary_field, SeverityBreakpoints};
use crate::models::{DiscrepancyKind, FieldValue, Severity, RECORD_MISSING_FIELD};

/// Classifies one discrepancy's severity.
///
/// Numeric mismatches are graded on the delta relative to the larger of
/// the two values, or on the absolute delta when the larger value is
/// below the small-denominator floor. Missing monetary fields and missing
/// records are always at least [`Severity::High`].
pub fn classify_severity(
    field_name: &str,
    value_a: Option<&FieldValue>,
    value_b: Option<&FieldValue>,
    kind: DiscrepancyKind,
    breakpoints: &SeverityBreakpoints,
) -> Severity {
    match kind {
        DiscrepancyKind::ValueMismatch => match (
            value_a.and_then(FieldValue::as_decimal),
            value_b.and_then(FieldValue::as_decimal),
        ) {
            (Some(a), Some(b)) => numeric_severity(a, b, breakpoints),
            // non-numeric mismatch: a wrong pay date is worth more
            // attention than a respelled department
            _ => match (value_a, value_b) {
                (Some(FieldValue::Date(_)), _) | (_, Some(FieldValue::Date(_))) => {
                    Severity::Medium
                }
                _ => Severity::Low,
            },
        },
        DiscrepancyKind::MissingInA | DiscrepancyKind::MissingInB => {
            if field_name == RECORD_MISSING_FIELD {
                return Severity::High;
            }
            if is_monetary_field(field_name) {
                let present = value_a.or(value_b).and_then(FieldValue::as_decimal);
                let base = match present {
                    Some(amount) => absolute_severity(amount.abs(), breakpoints),
                    None => Severity::High,
                };
                return base.max(Severity::High);
            }
            Severity::Medium
        }
        DiscrepancyKind::TypeMismatch => {
            if is_monetary_field(field_name) {
                Severity::High
            } else {
                Severity::Medium
            }
        }
    }
}

fn numeric_severity(a: Decimal, b: Decimal, breakpoints: &SeverityBreakpoints) -> Severity {
    let delta = (b - a).abs();
    let larger = a.abs().max(b.abs());

    if larger >= breakpoints.small_denominator_floor && !larger.is_zero() {
        let ratio = delta / larger;
        if ratio >= breakpoints.critical_ratio {
            Severity::Critical
        } else if ratio >= breakpoints.high_ratio {
            Severity::High
        } else if ratio >= breakpoints.medium_ratio {
            Severity::Medium
        } else {
            Severity::Low
        }
    } else {
        absolute_severity(delta, breakpoints)
    }
}

fn absolute_severity(delta: Decimal, breakpoints: &SeverityBreakpoints) -> Severity {
    if delta >= breakpoints.critical_amount {
        Severity::Critical
    } else if delta >= breakpoints.high_amount {
        Severity::High
    } else if delta >= breakpoints.medium_amount {
        Severity::Medium
    } else {
        Severity::Low
    }
}
