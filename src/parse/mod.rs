//! Format parsers.
//!
//! One parser per input format, each producing the same thing: a sequence
//! of raw row mappings (column name → exact string value) from source
//! bytes. Parsers are pure functions over their input; recoverable row
//! issues come back as warnings, and only input that yields no usable rows
//! at all is a fatal [`EngineError::Parse`].
//!
//! The format set is closed: dispatch is an exhaustive `match` on
//! [`FileFormat`], so adding a format is a compile-time-checked change.

mod delimited;
mod document;
mod spreadsheet;
mod structured;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AuditConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditWarning, DatasetSide, RawRow};

/// The declared format of an uploaded payroll file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Excel workbook (`.xlsx` / `.xls`).
    Spreadsheet,
    /// Delimiter-separated text (`.csv` / `.tsv`).
    Delimited,
    /// JSON array of flat records (`.json`).
    Structured,
    /// Page-layout text with whitespace-aligned columns (`.pdf` text
    /// layer, `.txt`).
    Document,
}

impl FileFormat {
    /// The wire tag for this format.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Delimited => "delimited",
            Self::Structured => "structured",
            Self::Document => "document",
        }
    }

    /// Maps an accepted upload extension to its format.
    ///
    /// The accepted set mirrors the upload layer: `xlsx`, `xls`, `csv`,
    /// `tsv`, `json`, `pdf`, `txt`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            "csv" | "tsv" => Some(Self::Delimited),
            "json" => Some(Self::Structured),
            "pdf" | "txt" => Some(Self::Document),
            _ => None,
        }
    }
}

impl FromStr for FileFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spreadsheet" => Ok(Self::Spreadsheet),
            "delimited" => Ok(Self::Delimited),
            "structured" => Ok(Self::Structured),
            "document" => Ok(Self::Document),
            other => Err(EngineError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// The format tags the engine recognizes, for status reporting.
pub fn supported_formats() -> &'static [&'static str] {
    &["spreadsheet", "delimited", "structured", "document"]
}

/// Raw rows extracted from one file, plus any non-fatal warnings.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Extracted rows, in source order.
    pub rows: Vec<RawRow>,
    /// Low-confidence or otherwise recoverable extraction issues.
    pub warnings: Vec<AuditWarning>,
}

/// Parses one file's bytes according to its declared format.
pub fn parse_rows(
    bytes: &[u8],
    format: FileFormat,
    side: DatasetSide,
    config: &AuditConfig,
) -> EngineResult<ParseOutput> {
    match format {
        FileFormat::Spreadsheet => spreadsheet::parse(bytes, side),
        FileFormat::Delimited => delimited::parse(bytes, side),
        FileFormat::Structured => structured::parse(bytes, side),
        FileFormat::Document => document::parse(bytes, side, &config.document),
    }
}

pub(crate) fn parse_error(
    side: DatasetSide,
    line: Option<usize>,
    message: impl Into<String>,
) -> EngineError {
    EngineError::Parse {
        file: side,
        line,
        message: message.into(),
    }
}

/// Decodes input bytes as UTF-8, falling back to Windows-1252 for the
/// encodings Excel exports tend to use.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags_round_trip() {
        for tag in supported_formats() {
            let format: FileFormat = tag.parse().unwrap();
            assert_eq!(format.tag(), *tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let result = "parquet".parse::<FileFormat>();
        match result {
            Err(EngineError::UnsupportedFormat { format }) => {
                assert_eq!(format, "parquet");
            }
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(
            FileFormat::from_extension("XLSX"),
            Some(FileFormat::Spreadsheet)
        );
        assert_eq!(FileFormat::from_extension("csv"), Some(FileFormat::Delimited));
        assert_eq!(
            FileFormat::from_extension("json"),
            Some(FileFormat::Structured)
        );
        assert_eq!(FileFormat::from_extension("pdf"), Some(FileFormat::Document));
        assert_eq!(FileFormat::from_extension("exe"), None);
    }

    #[test]
    fn test_decode_text_handles_windows_1252() {
        // "café" in Windows-1252: e9 is é
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes), "café");
    }

    #[test]
    fn test_decode_text_passes_utf8_through() {
        assert_eq!(decode_text("naïve".as_bytes()), "naïve");
    }
}
