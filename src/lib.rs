//! Payroll reconciliation engine.
//!
//! This crate compares two payroll datasets originating from different
//! sources or formats (spreadsheets, delimited text, JSON, page-layout
//! documents), matches employee records across the two sets, and reports
//! every numeric or identity discrepancy with a severity and an overall
//! risk classification.
//!
//! The engine is a pure, synchronous computation over two byte buffers: it
//! performs no file or network I/O and holds no process-wide state. Callers
//! (an upload server, a CLI) own fetching the bytes and persisting the
//! [`models::AuditResult`].

#![warn(missing_docs)]

pub mod comparison;
pub mod config;
pub mod error;
pub mod models;
pub mod parse;

pub use comparison::audit;
pub use config::AuditConfig;
pub use error::{EngineError, EngineResult};
pub use models::AuditResult;
pub use parse::FileFormat;
