//! Field-level comparison of matched pairs.
//!
//! For every canonical field present on either side of a pair, compares
//! the two values under the tolerance policy and emits zero or more
//! discrepancies. Tolerances are inclusive: a delta exactly at the
//! tolerance is not a discrepancy.

use std::collections::BTreeSet;

use crate::config::AuditConfig;
use crate::models::{
    Discrepancy, DiscrepancyKind, EmployeeRef, EmployeeRecord, FieldValue, MatchedPair,
};

use super::severity::classify_severity;

/// Compares every matched pair field by field.
pub fn compare_pairs(
    records_a: &[EmployeeRecord],
    records_b: &[EmployeeRecord],
    pairs: &[MatchedPair],
    config: &AuditConfig,
) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();

    for pair in pairs {
        let record_a = &records_a[pair.record_a];
        let record_b = &records_b[pair.record_b];

        let field_names: BTreeSet<&String> =
            record_a.fields.keys().chain(record_b.fields.keys()).collect();

        for field_name in field_names {
            let value_a = record_a.fields.get(field_name);
            let value_b = record_b.fields.get(field_name);
            if let Some(discrepancy) =
                compare_field(pair, record_a, field_name, value_a, value_b, config)
            {
                discrepancies.push(discrepancy);
            }
        }
    }

    discrepancies
}

fn compare_field(
    pair: &MatchedPair,
    record_a: &EmployeeRecord,
    field_name: &str,
    value_a: Option<&FieldValue>,
    value_b: Option<&FieldValue>,
    config: &AuditConfig,
) -> Option<Discrepancy> {
    let kind = match (value_a, value_b) {
        (Some(a), Some(b)) => {
            if let (Some(dec_a), Some(dec_b)) = (a.as_decimal(), b.as_decimal()) {
                let difference = dec_b - dec_a;
                if difference.abs() <= config.tolerance_for(field_name) {
                    return None;
                }
                return Some(build(
                    pair,
                    record_a,
                    field_name,
                    value_a,
                    value_b,
                    Some(difference),
                    DiscrepancyKind::ValueMismatch,
                    config,
                ));
            }
            if !a.is_comparable_with(b) {
                DiscrepancyKind::TypeMismatch
            } else if values_equal(a, b) {
                return None;
            } else {
                DiscrepancyKind::ValueMismatch
            }
        }
        (Some(_), None) => DiscrepancyKind::MissingInB,
        (None, Some(_)) => DiscrepancyKind::MissingInA,
        (None, None) => return None,
    };

    Some(build(
        pair, record_a, field_name, value_a, value_b, None, kind, config,
    ))
}

/// Equality for non-numeric values: dates compare exactly, text compares
/// case-folded with collapsed whitespace (the same folding record names
/// get).
fn values_equal(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Date(a), FieldValue::Date(b)) => a == b,
        (FieldValue::Text(a), FieldValue::Text(b)) => fold_text(a) == fold_text(b),
        _ => a == b,
    }
}

fn fold_text(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[allow(clippy::too_many_arguments)]
fn build(
    pair: &MatchedPair,
    record_a: &EmployeeRecord,
    field_name: &str,
    value_a: Option<&FieldValue>,
    value_b: Option<&FieldValue>,
    difference: Option<rust_decimal::Decimal>,
    kind: DiscrepancyKind,
    config: &AuditConfig,
) -> Discrepancy {
    let severity = classify_severity(field_name, value_a, value_b, kind, &config.severity);
    Discrepancy {
        employee: EmployeeRef {
            record_a: Some(pair.record_a),
            record_b: Some(pair.record_b),
            label: record_a.display_name.clone(),
        },
        field_name: field_name.to_string(),
        value_a: value_a.cloned(),
        value_b: value_b.cloned(),
        difference,
        kind,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchMethod, Severity};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(fields: &[(&str, FieldValue)]) -> EmployeeRecord {
        EmployeeRecord {
            identifier: Some("E1".to_string()),
            display_name: "John Smith".to_string(),
            full_name: "john smith".to_string(),
            fields: fields
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
            unmapped: BTreeMap::new(),
            source_row: 2,
        }
    }

    fn pair() -> MatchedPair {
        MatchedPair {
            record_a: 0,
            record_b: 0,
            match_method: MatchMethod::ExactId,
            match_score: 1.0,
        }
    }

    fn compare(a: EmployeeRecord, b: EmployeeRecord, config: &AuditConfig) -> Vec<Discrepancy> {
        compare_pairs(&[a], &[b], &[pair()], config)
    }

    #[test]
    fn test_equal_values_produce_no_discrepancy() {
        let a = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        let b = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        assert!(compare(a, b, &AuditConfig::default()).is_empty());
    }

    #[test]
    fn test_delta_at_tolerance_boundary_is_clean() {
        // tolerance is inclusive: |1000.01 - 1000.00| == 0.01
        let a = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        let b = record(&[("gross_pay", FieldValue::Amount(dec("1000.01")))]);
        assert!(compare(a, b, &AuditConfig::default()).is_empty());
    }

    #[test]
    fn test_delta_over_tolerance_is_value_mismatch() {
        let a = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        let b = record(&[("gross_pay", FieldValue::Amount(dec("1000.02")))]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies.len(), 1);
        let d = &discrepancies[0];
        assert_eq!(d.kind, DiscrepancyKind::ValueMismatch);
        assert_eq!(d.difference, Some(dec("0.02")));
        assert_eq!(d.field_name, "gross_pay");
    }

    #[test]
    fn test_difference_is_signed_b_minus_a() {
        let a = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        let b = record(&[("gross_pay", FieldValue::Amount(dec("900.00")))]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies[0].difference, Some(dec("-100.00")));
    }

    #[test]
    fn test_non_monetary_numeric_compares_exactly() {
        let a = record(&[("hours", FieldValue::Amount(dec("40.0")))]);
        let b = record(&[("hours", FieldValue::Amount(dec("40.01")))]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies.len(), 1);
    }

    #[test]
    fn test_per_field_tolerance_override() {
        let mut config = AuditConfig::default();
        config.field_tolerances.insert("hours".to_string(), dec("0.5"));
        let a = record(&[("hours", FieldValue::Amount(dec("40.0")))]);
        let b = record(&[("hours", FieldValue::Amount(dec("40.25")))]);
        assert!(compare(a, b, &config).is_empty());
    }

    #[test]
    fn test_field_missing_in_b() {
        let a = record(&[("net_pay", FieldValue::Amount(dec("800.00")))]);
        let b = record(&[]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies.len(), 1);
        let d = &discrepancies[0];
        assert_eq!(d.kind, DiscrepancyKind::MissingInB);
        assert_eq!(d.value_a, Some(FieldValue::Amount(dec("800.00"))));
        assert_eq!(d.value_b, None);
        assert!(d.severity >= Severity::High);
    }

    #[test]
    fn test_field_missing_in_a() {
        let a = record(&[]);
        let b = record(&[("net_pay", FieldValue::Amount(dec("800.00")))]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies[0].kind, DiscrepancyKind::MissingInA);
    }

    #[test]
    fn test_type_mismatch() {
        let a = record(&[("gross_pay", FieldValue::Text("N/A".to_string()))]);
        let b = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies[0].kind, DiscrepancyKind::TypeMismatch);
    }

    #[test]
    fn test_integer_and_amount_compare_numerically() {
        let a = record(&[("hours", FieldValue::Integer(40))]);
        let b = record(&[("hours", FieldValue::Amount(dec("40")))]);
        assert!(compare(a, b, &AuditConfig::default()).is_empty());
    }

    #[test]
    fn test_date_mismatch() {
        let a = record(&[(
            "pay_date",
            FieldValue::Date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()),
        )]);
        let b = record(&[(
            "pay_date",
            FieldValue::Date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
        )]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(discrepancies[0].kind, DiscrepancyKind::ValueMismatch);
        assert_eq!(discrepancies[0].difference, None);
    }

    #[test]
    fn test_text_comparison_is_case_insensitive() {
        let a = record(&[("department", FieldValue::Text("Sales".to_string()))]);
        let b = record(&[("department", FieldValue::Text("SALES".to_string()))]);
        assert!(compare(a, b, &AuditConfig::default()).is_empty());
    }

    #[test]
    fn test_text_disagreement_is_value_mismatch() {
        let a = record(&[("department", FieldValue::Text("Sales".to_string()))]);
        let b = record(&[("department", FieldValue::Text("Marketing".to_string()))]);
        let discrepancies = compare(a, b, &AuditConfig::default());
        assert_eq!(discrepancies[0].kind, DiscrepancyKind::ValueMismatch);
        assert_eq!(discrepancies[0].difference, None);
    }

    #[test]
    fn test_raising_tolerance_never_adds_discrepancies() {
        let a = record(&[("gross_pay", FieldValue::Amount(dec("1000.00")))]);
        let b = record(&[("gross_pay", FieldValue::Amount(dec("1003.00")))]);

        let mut tight = AuditConfig::default();
        tight.earnings_tolerance = dec("0.01");
        let mut loose = AuditConfig::default();
        loose.earnings_tolerance = dec("5.00");

        let tight_count = compare(a.clone(), b.clone(), &tight).len();
        let loose_count = compare(a, b, &loose).len();
        assert!(loose_count <= tight_count);
        assert_eq!(loose_count, 0);
    }
}
