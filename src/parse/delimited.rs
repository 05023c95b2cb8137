//! Delimited-text parser (CSV/TSV and friends).
//!
//! Header-driven: the first non-empty record names the columns, every
//! later record maps header cell → field value. The delimiter is sniffed
//! from the first few lines, and quoted fields containing the delimiter
//! survive because the `csv` crate does the splitting.

use crate::models::{DatasetSide, RawRow};

use super::{decode_text, parse_error, EngineResult, ParseOutput};

pub(super) fn parse(bytes: &[u8], side: DatasetSide) -> EngineResult<ParseOutput> {
    let content = decode_text(bytes);
    if content.trim().is_empty() {
        return Err(parse_error(side, None, "file contains no rows"));
    }

    let delimiter = sniff_delimiter(&content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize);
            parse_error(side, line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        match &header {
            None => {
                header = Some(record.iter().map(|f| f.trim().to_string()).collect());
            }
            Some(columns) => {
                let values: Vec<(String, String)> = columns
                    .iter()
                    .zip(record.iter())
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, value)| (name.clone(), value.trim().to_string()))
                    .collect();
                rows.push(RawRow::new(values, line));
            }
        }
    }

    if header.is_none() {
        return Err(parse_error(side, None, "file contains no rows"));
    }

    Ok(ParseOutput {
        rows,
        warnings: Vec::new(),
    })
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per
/// line. The delimiter producing the most consistent field count (>1
/// field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(row: &'a RawRow, name: &str) -> Option<&'a str> {
        row.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_basic_csv() {
        let bytes = b"Employee ID,Name,Gross Pay\nE1,John Smith,1000.00\nE2,Jane Doe,1200.50\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(output.rows.len(), 2);
        assert_eq!(field(&output.rows[0], "Employee ID"), Some("E1"));
        assert_eq!(field(&output.rows[0], "Gross Pay"), Some("1000.00"));
        assert_eq!(field(&output.rows[1], "Name"), Some("Jane Doe"));
    }

    #[test]
    fn test_rows_carry_line_numbers() {
        let bytes = b"id,name\nE1,John\nE2,Jane\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(output.rows[0].line, Some(2));
        assert_eq!(output.rows[1].line, Some(3));
    }

    #[test]
    fn test_quoted_field_containing_delimiter() {
        let bytes = b"id,name,gross\nE1,\"Smith, John\",1000.00\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(field(&output.rows[0], "name"), Some("Smith, John"));
    }

    #[test]
    fn test_semicolon_delimiter_sniffed() {
        let bytes = b"id;name;gross\nE1;John Smith;1000,00\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(field(&output.rows[0], "name"), Some("John Smith"));
    }

    #[test]
    fn test_tab_delimiter_sniffed() {
        let bytes = b"id\tname\nE1\tJohn\n";
        let output = parse(bytes, DatasetSide::B).unwrap();
        assert_eq!(field(&output.rows[0], "name"), Some("John"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let bytes = b"id,name\n\nE1,John\n,,\nE2,Jane\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(output.rows.len(), 2);
    }

    #[test]
    fn test_leading_blank_lines_before_header() {
        let bytes = b"\n\nid,name\nE1,John\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(output.rows.len(), 1);
        assert_eq!(field(&output.rows[0], "id"), Some("E1"));
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let result = parse(b"", DatasetSide::B);
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("second file"), "got: {message}");
    }

    #[test]
    fn test_header_only_file_yields_no_rows() {
        let output = parse(b"id,name,gross\n", DatasetSide::A).unwrap();
        assert!(output.rows.is_empty());
    }

    #[test]
    fn test_short_record_maps_available_columns() {
        let bytes = b"id,name,gross\nE1,John\n";
        let output = parse(bytes, DatasetSide::A).unwrap();
        assert_eq!(output.rows[0].values.len(), 2);
        assert_eq!(field(&output.rows[0], "gross"), None);
    }
}
