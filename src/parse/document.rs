//! Document-text parser for page-layout content.
//!
//! Extracts tabular rows from text whose columns are aligned with
//! whitespace (the shape a PDF text layer or a fixed-width report has).
//! This is inherently best-effort: every row carries a confidence score,
//! and rows under the configured threshold are excluded from comparison
//! and reported as warnings instead of failing the parse.
//!
//! The header line anchors the column layout. Later lines that split into
//! the same number of cells are taken as-is (confidence 1.0); lines that
//! do not are sliced by the header's column regions, with confidence
//! proportional to how many columns the slicing could fill.

use crate::config::DocumentHeuristics;
use crate::models::{AuditWarning, DatasetSide, RawRow};

use super::{decode_text, parse_error, EngineResult, ParseOutput};

/// Confidence assigned to rows whose cells line up with the header
/// exactly. Region-sliced rows are scaled below this.
const ALIGNED_CONFIDENCE: f64 = 1.0;
const SLICED_CONFIDENCE_SCALE: f64 = 0.85;

pub(super) fn parse(
    bytes: &[u8],
    side: DatasetSide,
    heuristics: &DocumentHeuristics,
) -> EngineResult<ParseOutput> {
    if bytes.starts_with(b"%PDF") {
        return Err(parse_error(
            side,
            None,
            "binary PDF content; the document parser reads the extracted text layer, \
             which the upload layer must produce first",
        ));
    }

    let content = decode_text(bytes);
    if content.trim().is_empty() {
        return Err(parse_error(side, None, "file contains no rows"));
    }

    let lines: Vec<&str> = content.lines().collect();
    let gap = heuristics.min_column_gap.max(1);

    let Some((header_line, columns)) = find_header(&lines, gap) else {
        return Err(parse_error(
            side,
            None,
            "no tabular content detected (no line splits into two or more columns)",
        ));
    };

    let names: Vec<String> = columns.iter().map(|(_, text)| text.clone()).collect();
    let regions = column_regions(&columns);

    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for (i, line) in lines.iter().enumerate().skip(header_line + 1) {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = i + 1;
        let cells = split_columns(line, gap);

        let (values, confidence) = if cells.len() == names.len() {
            let values = names
                .iter()
                .cloned()
                .zip(cells.into_iter().map(|(_, text)| text))
                .filter(|(_, v)| !v.is_empty())
                .collect();
            (values, ALIGNED_CONFIDENCE)
        } else {
            slice_by_regions(line, &names, &regions)
        };

        if confidence < heuristics.min_confidence {
            warnings.push(AuditWarning::LowConfidenceExtraction {
                file: side,
                row: line_number,
                confidence,
            });
            continue;
        }

        let mut row = RawRow::new(values, line_number);
        row.confidence = Some(confidence);
        rows.push(row);
    }

    Ok(ParseOutput { rows, warnings })
}

/// The header is the first line with two or more columns that is followed
/// by at least one more such line; a lone multi-column line is more likely
/// a title than a table.
fn find_header(lines: &[&str], gap: usize) -> Option<(usize, Vec<(usize, String)>)> {
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_columns(line, gap);
        if cells.len() < 2 {
            continue;
        }
        let has_table_body = lines[i + 1..]
            .iter()
            .any(|later| split_columns(later, gap).len() >= 2);
        if has_table_body {
            return Some((i, cells));
        }
    }
    None
}

/// Splits a line into (start offset, text) cells on tabs or runs of at
/// least `min_gap` spaces.
fn split_columns(line: &str, min_gap: usize) -> Vec<(usize, String)> {
    let chars: Vec<char> = line.chars().collect();
    let mut cells = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        let mut space_run = 0;
        let mut j = i;
        while j < chars.len() {
            if chars[j] == '\t' {
                break;
            }
            if chars[j] == ' ' {
                space_run += 1;
                if space_run >= min_gap {
                    break;
                }
            } else {
                space_run = 0;
                end = j;
            }
            j += 1;
        }
        let text: String = chars[start..=end].iter().collect();
        cells.push((start, text));
        i = j + 1;
    }

    cells
}

/// Character regions owned by each column, with boundaries at the
/// midpoints between adjacent header cells. Midpoints keep both
/// left-aligned text and right-aligned numbers inside their column.
fn column_regions(columns: &[(usize, String)]) -> Vec<(usize, usize)> {
    let mut regions = Vec::with_capacity(columns.len());
    for (k, (start, text)) in columns.iter().enumerate() {
        let region_start = if k == 0 {
            0
        } else {
            let (prev_start, prev_text) = &columns[k - 1];
            let prev_end = prev_start + prev_text.chars().count();
            (prev_end + start) / 2
        };
        let region_end = if k + 1 == columns.len() {
            usize::MAX
        } else {
            let end = start + text.chars().count();
            let next_start = columns[k + 1].0;
            (end + next_start) / 2
        };
        regions.push((region_start, region_end));
    }
    regions
}

/// Positional fallback for lines whose cell count disagrees with the
/// header: take whatever text falls inside each column's region.
fn slice_by_regions(
    line: &str,
    names: &[String],
    regions: &[(usize, usize)],
) -> (Vec<(String, String)>, f64) {
    let chars: Vec<char> = line.chars().collect();
    let mut values = Vec::new();
    let mut filled = 0usize;

    for (name, (start, end)) in names.iter().zip(regions) {
        let start = (*start).min(chars.len());
        let end = (*end).min(chars.len());
        let text: String = chars[start..end].iter().collect::<String>().trim().to_string();
        if !text.is_empty() {
            filled += 1;
            values.push((name.clone(), text));
        }
    }

    let confidence = if names.is_empty() {
        0.0
    } else {
        (filled as f64 / names.len() as f64) * SLICED_CONFIDENCE_SCALE
    };
    (values, confidence)
}
