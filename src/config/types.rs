//! Strongly-typed configuration structures.
//!
//! All settings deserialize from YAML with per-field defaults, so a config
//! file only needs to name the values it overrides.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Canonical field holding the stable employee key.
pub const IDENTIFIER_FIELD: &str = "employee_id";

/// Canonical field holding the employee's full name.
pub const NAME_FIELD: &str = "name";

/// Canonical fields that carry money and get the earnings tolerance.
pub const MONETARY_FIELDS: &[&str] = &[
    "gross_pay",
    "net_pay",
    "tax_withheld",
    "overtime_pay",
    "deductions",
];

/// Canonical fields coerced to calendar dates.
pub const DATE_FIELDS: &[&str] = &["pay_date"];

/// Returns true if the canonical field carries a monetary amount.
pub(crate) fn is_monetary_field(name: &str) -> bool {
    MONETARY_FIELDS.contains(&name)
}

/// Column-synonym table mapping canonical field names to the column
/// headings that should resolve to them.
///
/// Lookup is case-insensitive and treats underscores and hyphens as
/// spaces, so `"Gross"`, `"gross_pay"` and `"GROSS AMT"` all resolve to
/// `gross_pay` with the default table.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
    /// Builds a table from canonical-name → synonyms entries.
    ///
    /// Each canonical name resolves to itself even when absent from its
    /// own synonym list.
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Resolves an observed column heading to a canonical field name.
    pub fn resolve(&self, column: &str) -> Option<&str> {
        let needle = normalize_column_key(column);
        for (canonical, synonyms) in &self.entries {
            if normalize_column_key(canonical) == needle {
                return Some(canonical.as_str());
            }
            if synonyms
                .iter()
                .any(|s| normalize_column_key(s) == needle)
            {
                return Some(canonical.as_str());
            }
        }
        None
    }

    /// Merges user-supplied entries over this table. Synonym lists for the
    /// same canonical field are appended, not replaced.
    pub fn merge(&mut self, other: SynonymTable) {
        for (canonical, synonyms) in other.entries {
            self.entries.entry(canonical).or_default().extend(synonyms);
        }
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let table: &[(&str, &[&str])] = &[
            (
                IDENTIFIER_FIELD,
                &[
                    "employee id",
                    "emp id",
                    "id",
                    "employee number",
                    "emp no",
                    "staff id",
                    "payroll id",
                    "ssn",
                ],
            ),
            (
                NAME_FIELD,
                &[
                    "employee name",
                    "full name",
                    "employee",
                    "staff name",
                    "worker name",
                ],
            ),
            ("first_name", &["given name", "fname"]),
            ("last_name", &["surname", "family name", "lname"]),
            (
                "gross_pay",
                &[
                    "gross",
                    "gross amt",
                    "gross amount",
                    "gross earnings",
                    "total earnings",
                    "earnings",
                ],
            ),
            (
                "net_pay",
                &["net", "net amount", "net amt", "take home", "take home pay"],
            ),
            (
                "tax_withheld",
                &["tax", "taxes", "withholding", "federal tax", "income tax"],
            ),
            ("hours", &["hours worked", "hrs", "total hours"]),
            ("overtime_pay", &["overtime", "ot pay", "ot"]),
            ("deductions", &["total deductions", "deduction"]),
            ("pay_date", &["payment date", "check date", "pay day"]),
            ("department", &["dept", "division", "cost center"]),
        ];
        for (canonical, synonyms) in table {
            entries.insert(
                (*canonical).to_string(),
                synonyms.iter().map(|s| (*s).to_string()).collect(),
            );
        }
        Self { entries }
    }
}

fn normalize_column_key(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Breakpoints mapping a discrepancy's magnitude to a severity.
///
/// Relative breakpoints apply when the larger of the two values is at
/// least `small_denominator_floor`; below that, the absolute-delta
/// breakpoints apply instead (a 50% swing on a $2 allowance is not a
/// critical finding).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeverityBreakpoints {
    /// Relative delta at which severity becomes medium.
    pub medium_ratio: Decimal,
    /// Relative delta at which severity becomes high.
    pub high_ratio: Decimal,
    /// Relative delta at which severity becomes critical.
    pub critical_ratio: Decimal,
    /// Absolute delta at which severity becomes medium.
    pub medium_amount: Decimal,
    /// Absolute delta at which severity becomes high.
    pub high_amount: Decimal,
    /// Absolute delta at which severity becomes critical.
    pub critical_amount: Decimal,
    /// Largest-value floor below which absolute breakpoints apply.
    pub small_denominator_floor: Decimal,
}

impl Default for SeverityBreakpoints {
    fn default() -> Self {
        Self {
            medium_ratio: Decimal::new(1, 2),      // 1%
            high_ratio: Decimal::new(5, 2),        // 5%
            critical_ratio: Decimal::new(20, 2),   // 20%
            medium_amount: Decimal::ONE,
            high_amount: Decimal::new(25, 0),
            critical_amount: Decimal::new(250, 0),
            small_denominator_floor: Decimal::new(100, 0),
        }
    }
}

/// Tunables for the best-effort document-text extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentHeuristics {
    /// Rows with confidence below this are excluded from normalization and
    /// reported as warnings.
    pub min_confidence: f64,
    /// Minimum run of spaces treated as a column boundary.
    pub min_column_gap: usize,
}

impl Default for DocumentHeuristics {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            min_column_gap: 2,
        }
    }
}

/// Comparison settings for one audit run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Absolute tolerance applied to monetary fields. Inclusive.
    pub earnings_tolerance: Decimal,
    /// Minimum name similarity for a fuzzy match, in [0, 1].
    pub name_threshold: f64,
    /// Whether the fuzzy-name matching pass runs at all.
    pub fuzzy_matching: bool,
    /// Per-field tolerance overrides, by canonical field name.
    pub field_tolerances: BTreeMap<String, Decimal>,
    /// Column-synonym table used by the normalizer.
    pub synonyms: SynonymTable,
    /// Severity breakpoints used by the comparator.
    pub severity: SeverityBreakpoints,
    /// Document-text extraction heuristics.
    pub document: DocumentHeuristics,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            earnings_tolerance: Decimal::new(1, 2), // 0.01
            name_threshold: 0.8,
            fuzzy_matching: true,
            field_tolerances: BTreeMap::new(),
            synonyms: SynonymTable::default(),
            severity: SeverityBreakpoints::default(),
            document: DocumentHeuristics::default(),
        }
    }
}

impl AuditConfig {
    /// The tolerance applied to a numeric canonical field.
    ///
    /// Per-field overrides win; monetary fields fall back to
    /// `earnings_tolerance`; every other numeric field compares exactly.
    pub fn tolerance_for(&self, field: &str) -> Decimal {
        if let Some(tolerance) = self.field_tolerances.get(field) {
            return *tolerance;
        }
        if is_monetary_field(field) {
            return self.earnings_tolerance;
        }
        Decimal::ZERO
    }

    /// Checks every value is inside its allowed range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.earnings_tolerance < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "earnings_tolerance".to_string(),
                message: "must be non-negative".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.name_threshold) {
            return Err(EngineError::InvalidConfig {
                field: "name_threshold".to_string(),
                message: "must be between 0 and 1".to_string(),
            });
        }
        for (field, tolerance) in &self.field_tolerances {
            if *tolerance < Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    field: format!("field_tolerances.{field}"),
                    message: "must be non-negative".to_string(),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.document.min_confidence) {
            return Err(EngineError::InvalidConfig {
                field: "document.min_confidence".to_string(),
                message: "must be between 0 and 1".to_string(),
            });
        }
        let b = &self.severity;
        if !(b.medium_ratio < b.high_ratio && b.high_ratio < b.critical_ratio) {
            return Err(EngineError::InvalidConfig {
                field: "severity".to_string(),
                message: "ratio breakpoints must be strictly increasing".to_string(),
            });
        }
        if !(b.medium_amount < b.high_amount && b.high_amount < b.critical_amount) {
            return Err(EngineError::InvalidConfig {
                field: "severity".to_string(),
                message: "amount breakpoints must be strictly increasing".to_string(),
            });
        }
        Ok(())
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
    fn test_default_config_is_valid() {
        assert!(AuditConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_tolerances() {
        let config = AuditConfig::default();
        assert_eq!(config.earnings_tolerance, dec("0.01"));
        assert_eq!(config.tolerance_for("gross_pay"), dec("0.01"));
        assert_eq!(config.tolerance_for("hours"), Decimal::ZERO);
    }

    #[test]
    fn test_field_tolerance_override_wins() {
        let mut config = AuditConfig::default();
        config
            .field_tolerances
            .insert("hours".to_string(), dec("0.25"));
        assert_eq!(config.tolerance_for("hours"), dec("0.25"));
    }

    #[test]
    fn test_synonym_resolution_is_case_insensitive() {
        let table = SynonymTable::default();
        assert_eq!(table.resolve("Gross"), Some("gross_pay"));
        assert_eq!(table.resolve("gross_pay"), Some("gross_pay"));
        assert_eq!(table.resolve("GROSS AMT"), Some("gross_pay"));
        assert_eq!(table.resolve("Employee Name"), Some("name"));
        assert_eq!(table.resolve("SSN"), Some("employee_id"));
    }

    #[test]
    fn test_unknown_column_does_not_resolve() {
        let table = SynonymTable::default();
        assert_eq!(table.resolve("favourite colour"), None);
    }

    #[test]
    fn test_merge_extends_synonyms() {
        let mut table = SynonymTable::default();
        let mut extra = BTreeMap::new();
        extra.insert(
            "gross_pay".to_string(),
            vec!["bruttolohn".to_string()],
        );
        table.merge(SynonymTable::new(extra));
        assert_eq!(table.resolve("Bruttolohn"), Some("gross_pay"));
        assert_eq!(table.resolve("gross"), Some("gross_pay"));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut config = AuditConfig::default();
        config.earnings_tolerance = dec("-0.01");
        match config.validate() {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "earnings_tolerance");
            }
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut config = AuditConfig::default();
        config.name_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_monetary_field_classification() {
        assert!(is_monetary_field("gross_pay"));
        assert!(is_monetary_field("tax_withheld"));
        assert!(!is_monetary_field("hours"));
        assert!(!is_monetary_field("department"));
    }
}
