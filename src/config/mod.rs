//! Configuration for the reconciliation engine.
//!
//! [`AuditConfig`] carries the comparison settings (tolerances, matching
//! thresholds, column synonyms, extraction heuristics). It can be built
//! with [`AuditConfig::default`] or loaded from a YAML file with
//! [`ConfigLoader`].

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AuditConfig, DocumentHeuristics, SeverityBreakpoints, SynonymTable, DATE_FIELDS,
    IDENTIFIER_FIELD, MONETARY_FIELDS, NAME_FIELD,
};
pub(crate) use types::is_monetary_field;
