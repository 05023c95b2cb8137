//! Record normalization.
//!
//! Maps raw rows, whose column names vary by source, onto canonical
//! [`EmployeeRecord`] values: resolves column-name synonyms, coerces
//! currency strings to exact decimals and date strings to dates, and
//! drops rows that identify no employee at all (with a warning, never an
//! error — auditing proceeds on the remaining valid data).

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{
    AuditConfig, DATE_FIELDS, IDENTIFIER_FIELD, MONETARY_FIELDS, NAME_FIELD,
};
use crate::models::{AuditWarning, DatasetSide, EmployeeRecord, FieldValue, RawRow};

/// Canonical records plus the warnings produced while building them.
#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    /// Records in source-row order.
    pub records: Vec<EmployeeRecord>,
    /// Dropped-row and unmapped-column warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Normalizes one dataset's raw rows. Deterministic for a given synonym
/// table.
pub fn normalize(rows: &[RawRow], side: DatasetSide, config: &AuditConfig) -> NormalizeOutput {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut unmapped_columns: BTreeSet<String> = BTreeSet::new();

    for row in rows {
        let mut resolved: BTreeMap<String, String> = BTreeMap::new();
        let mut unmapped: BTreeMap<String, String> = BTreeMap::new();

        for (column, value) in &row.values {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match config.synonyms.resolve(column) {
                // first occurrence wins when two columns resolve to the
                // same canonical field
                Some(canonical) => {
                    resolved
                        .entry(canonical.to_string())
                        .or_insert_with(|| value.to_string());
                }
                None => {
                    unmapped_columns.insert(column.clone());
                    unmapped.insert(column.clone(), value.to_string());
                }
            }
        }

        let identifier = resolved.remove(IDENTIFIER_FIELD);
        // no name column, but an identifier still identifies the
        // employee; use it for both
        let display_name = resolve_display_name(&mut resolved).or_else(|| identifier.clone());

        let Some(display_name) = display_name else {
            warnings.push(AuditWarning::Normalization {
                file: side,
                row: row.line,
                message: "row has no employee identifier or name; dropped".to_string(),
            });
            continue;
        };
        let full_name = match normalize_name(&display_name) {
            // all-punctuation names normalize to nothing; fall back to
            // the raw form so full_name is never empty
            name if name.is_empty() => display_name.to_lowercase(),
            name => name,
        };

        let mut fields = BTreeMap::new();
        for (canonical, raw) in resolved {
            let value = coerce(&canonical, &raw);
            fields.insert(canonical, value);
        }

        records.push(EmployeeRecord {
            identifier,
            display_name,
            full_name,
            fields,
            unmapped,
            source_row: row.line.unwrap_or(0),
        });
    }

    for column in unmapped_columns {
        warnings.push(AuditWarning::Normalization {
            file: side,
            row: None,
            message: format!("column '{column}' did not match any canonical field"),
        });
    }

    NormalizeOutput { records, warnings }
}

/// Pulls the employee name out of the resolved columns, combining split
/// `first_name`/`last_name` columns when no whole-name column is present.
fn resolve_display_name(resolved: &mut BTreeMap<String, String>) -> Option<String> {
    let first = resolved.remove("first_name");
    let last = resolved.remove("last_name");
    if let Some(name) = resolved.remove(NAME_FIELD) {
        return Some(name);
    }
    match (first, last) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Normalizes a display name for matching: rotates `"Last, First"`,
/// case-folds, strips punctuation, collapses whitespace.
pub(crate) fn normalize_name(raw: &str) -> String {
    let rotated = match raw.split_once(',') {
        Some((last, first)) => format!("{first} {last}"),
        None => raw.to_string(),
    };
    rotated
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coerces one raw string to the canonical field's typed value.
///
/// Uncoercible values stay as text; the comparator will surface the
/// disagreement as a type mismatch if the other side coerced.
fn coerce(canonical: &str, raw: &str) -> FieldValue {
    if DATE_FIELDS.contains(&canonical) {
        if let Some(date) = parse_date(raw) {
            return FieldValue::Date(date);
        }
        return FieldValue::Text(raw.to_string());
    }
    if MONETARY_FIELDS.contains(&canonical) || canonical == "hours" {
        if let Some(amount) = parse_amount(raw) {
            return FieldValue::Amount(amount);
        }
        return FieldValue::Text(raw.to_string());
    }
    if canonical == "department" {
        return FieldValue::Text(raw.to_string());
    }
    // user-extended canonical fields: infer the type
    if let Ok(i) = raw.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Some(amount) = parse_amount(raw) {
        return FieldValue::Amount(amount);
    }
    FieldValue::Text(raw.to_string())
}

/// Parses a currency-like string to an exact decimal.
///
/// Accepts an optional `$`, thousands separators, and
/// parentheses-for-negative (`(1,234.50)` → `-1234.50`).
fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut s = raw.trim().to_string();
    let negative = s.starts_with('(') && s.ends_with(')');
    if negative {
        s = s[1..s.len() - 1].to_string();
    }
    let s = s
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .replace(' ', "");
    if s.is_empty() {
        return None;
    }
    let amount: Decimal = s.parse().ok()?;
    Some(if negative { -amount } else { amount })
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y", "%B %d, %Y"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // ISO datetime from the spreadsheet parser
    if let Some((date_part, _)) = raw.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return Some(date);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
