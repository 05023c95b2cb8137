//! Canonical employee records and the raw rows they are built from.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies which of the two uploaded files a record or warning came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSide {
    /// The first uploaded file (previous or reference data).
    A,
    /// The second uploaded file (current or comparison data).
    B,
}

impl fmt::Display for DatasetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "first file"),
            Self::B => write!(f, "second file"),
        }
    }
}

/// One row extracted from a source file, before normalization.
///
/// Column names are whatever the source used; values are carried as the
/// exact strings the parser extracted so that no numeric precision is lost
/// before the normalizer coerces them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Observed column name/value pairs, in source column order.
    pub values: Vec<(String, String)>,
    /// 1-based row or line number in the source file, when known.
    pub line: Option<usize>,
    /// Extraction confidence in [0, 1]; only the document parser sets this.
    pub confidence: Option<f64>,
}

impl RawRow {
    /// Creates a row from name/value pairs with a known source line.
    pub fn new(values: Vec<(String, String)>, line: usize) -> Self {
        Self {
            values,
            line: Some(line),
            confidence: None,
        }
    }
}

/// A typed value for one canonical field of an employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// An exact decimal amount (monetary values, hours).
    Amount(Decimal),
    /// An integer count or code.
    Integer(i64),
    /// A calendar date.
    Date(NaiveDate),
    /// Free text.
    Text(String),
}

impl FieldValue {
    /// Returns the value as an exact decimal when it is numeric.
    ///
    /// `Amount` and `Integer` are the two numeric variants; everything else
    /// returns `None`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Amount(d) => Some(*d),
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Date(_) | Self::Text(_) => None,
        }
    }

    /// Returns true if both values are numeric or both are the same
    /// non-numeric variant, i.e. they can be compared without a type
    /// mismatch.
    pub fn is_comparable_with(&self, other: &FieldValue) -> bool {
        if self.as_decimal().is_some() && other.as_decimal().is_some() {
            return true;
        }
        matches!(
            (self, other),
            (Self::Date(_), Self::Date(_)) | (Self::Text(_), Self::Text(_))
        )
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(d) => write!(f, "{d}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Canonical representation of one employee's payroll line for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Stable key (employee ID or similar token), unique within a dataset
    /// when present.
    pub identifier: Option<String>,
    /// The name exactly as it appeared in the source.
    pub display_name: String,
    /// Normalized name: case-folded, punctuation stripped, whitespace
    /// collapsed, `"Last, First"` rotated to `"first last"`. Never empty.
    pub full_name: String,
    /// Canonical field name to typed value, in field-name order.
    pub fields: BTreeMap<String, FieldValue>,
    /// Columns that resolved to no canonical field, retained under their
    /// original names. Excluded from comparison.
    pub unmapped: BTreeMap<String, String>,
    /// 1-based row in the originating file, for traceability in reports.
    /// Not used in comparison.
    pub source_row: usize,
}

impl EmployeeRecord {
    /// Returns the typed value of a canonical field, if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_dataset_side_display() {
        assert_eq!(DatasetSide::A.to_string(), "first file");
        assert_eq!(DatasetSide::B.to_string(), "second file");
    }

    #[test]
    fn test_amount_as_decimal() {
        let value = FieldValue::Amount(dec("1000.01"));
        assert_eq!(value.as_decimal(), Some(dec("1000.01")));
    }

    #[test]
    fn test_integer_as_decimal() {
        let value = FieldValue::Integer(40);
        assert_eq!(value.as_decimal(), Some(dec("40")));
    }

    #[test]
    fn test_text_is_not_numeric() {
        let value = FieldValue::Text("Engineering".to_string());
        assert_eq!(value.as_decimal(), None);
    }

    #[test]
    fn test_amount_and_integer_are_comparable() {
        let a = FieldValue::Amount(dec("40.0"));
        let b = FieldValue::Integer(40);
        assert!(a.is_comparable_with(&b));
    }

    #[test]
    fn test_text_and_amount_are_not_comparable() {
        let a = FieldValue::Text("n/a".to_string());
        let b = FieldValue::Amount(dec("12.00"));
        assert!(!a.is_comparable_with(&b));
    }

    #[test]
    fn test_dates_are_comparable() {
        let a = FieldValue::Date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        let b = FieldValue::Date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        assert!(a.is_comparable_with(&b));
    }

    #[test]
    fn test_field_value_serializes_snake_case() {
        let value = FieldValue::Amount(dec("28.54"));
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.contains("amount"), "unexpected tag in {json}");
    }

    #[test]
    fn test_record_round_trip() {
        let mut fields = BTreeMap::new();
        fields.insert("gross_pay".to_string(), FieldValue::Amount(dec("1000.00")));
        let record = EmployeeRecord {
            identifier: Some("E1".to_string()),
            display_name: "John Smith".to_string(),
            full_name: "john smith".to_string(),
            fields,
            unmapped: BTreeMap::new(),
            source_row: 2,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: EmployeeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
