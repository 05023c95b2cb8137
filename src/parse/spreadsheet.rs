//! Spreadsheet parser (xlsx/xls) built on calamine.
//!
//! Reads the first worksheet of the workbook. The first non-empty row is
//! the header; every later row maps header cell → cell value. Merged or
//! multi-row header layouts are not supported and fail the parse, since
//! silently mis-labelling pay columns is worse than rejecting the file.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::models::{DatasetSide, RawRow};

use super::{parse_error, EngineResult, ParseOutput};

pub(super) fn parse(bytes: &[u8], side: DatasetSide) -> EngineResult<ParseOutput> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(cursor)
        .map_err(|e| parse_error(side, None, format!("not a readable workbook: {e}")))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| parse_error(side, None, "workbook contains no worksheets"))?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| parse_error(side, None, format!("failed to read sheet '{first_sheet}': {e}")))?;

    let start_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (i, cells) in range.rows().enumerate() {
        // 1-based row number as a user would see it in the sheet
        let line = start_row + i + 1;

        if cells.iter().all(is_empty_cell) {
            continue;
        }

        match &header {
            None => {
                let columns = header_columns(cells, side, line)?;
                header = Some(columns);
            }
            Some(columns) => {
                let values: Vec<(String, String)> = columns
                    .iter()
                    .zip(cells.iter())
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, cell)| (name.clone(), cell_text(cell)))
                    .collect();
                rows.push(RawRow::new(values, line));
            }
        }
    }

    if header.is_none() {
        return Err(parse_error(side, None, "worksheet contains no rows"));
    }

    Ok(ParseOutput {
        rows,
        warnings: Vec::new(),
    })
}

/// Extracts header names, rejecting layouts this parser cannot represent.
///
/// An empty cell strictly inside the used header span means the source
/// used merged cells or a multi-row header.
fn header_columns(cells: &[Data], side: DatasetSide, line: usize) -> EngineResult<Vec<String>> {
    let names: Vec<String> = cells.iter().map(cell_text).collect();
    let first = names.iter().position(|n| !n.is_empty());
    let last = names.iter().rposition(|n| !n.is_empty());
    if let (Some(first), Some(last)) = (first, last) {
        if names[first..=last].iter().any(|n| n.is_empty()) {
            return Err(parse_error(
                side,
                Some(line),
                "merged or multi-row headers are not supported",
            ));
        }
    }
    Ok(names)
}

fn is_empty_cell(cell: &Data) -> bool {
    cell_text(cell).is_empty()
}

/// Renders one cell as the exact string the normalizer will coerce.
///
/// Whole-number floats lose their `.0`, Excel date serials become
/// ISO-8601, and error cells are treated as absent.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == chrono::NaiveTime::MIN => {
                ndt.date().format("%Y-%m-%d").to_string()
            }
            Some(ndt) => ndt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_trims_strings() {
        assert_eq!(cell_text(&Data::String("  John ".to_string())), "John");
    }

    #[test]
    fn test_cell_text_whole_float_has_no_fraction() {
        assert_eq!(cell_text(&Data::Float(1000.0)), "1000");
    }

    #[test]
    fn test_cell_text_fractional_float_preserved() {
        assert_eq!(cell_text(&Data::Float(1000.01)), "1000.01");
    }

    #[test]
    fn test_error_cell_is_absent() {
        assert!(cell_text(&Data::Error(calamine::CellErrorType::Div0)).is_empty());
    }

    #[test]
    fn test_header_with_interior_gap_rejected() {
        let cells = vec![
            Data::String("id".to_string()),
            Data::Empty,
            Data::String("gross".to_string()),
        ];
        let result = header_columns(&cells, DatasetSide::A, 1);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("merged"));
    }

    #[test]
    fn test_header_with_trailing_gap_allowed() {
        let cells = vec![
            Data::String("id".to_string()),
            Data::String("gross".to_string()),
            Data::Empty,
        ];
        let columns = header_columns(&cells, DatasetSide::A, 1).unwrap();
        assert_eq!(columns, vec!["id", "gross", ""]);
    }

    #[test]
    fn test_garbage_bytes_fail_with_side_context() {
        let result = parse(b"definitely not a workbook", DatasetSide::B);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("second file"));
    }
}
