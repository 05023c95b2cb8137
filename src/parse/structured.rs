//! Structured-object parser (JSON).
//!
//! Expects a top-level array of records. Nested objects are flattened by
//! dot-joining keys (`{"pay": {"gross": 1}}` → `pay.gross`), and arrays
//! by dot-joined indices. Number text is carried verbatim so no decimal
//! precision is lost.

use serde_json::Value;

use crate::models::{DatasetSide, RawRow};

use super::{parse_error, EngineResult, ParseOutput};

pub(super) fn parse(bytes: &[u8], side: DatasetSide) -> EngineResult<ParseOutput> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| parse_error(side, Some(e.line()), e.to_string()))?;

    let records = match value {
        Value::Array(records) => records,
        other => {
            return Err(parse_error(
                side,
                None,
                format!(
                    "expected a top-level array of records, found {}",
                    json_type_name(&other)
                ),
            ));
        }
    };

    let mut rows = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let Value::Object(map) = record else {
            return Err(parse_error(
                side,
                Some(index + 1),
                format!("record is {}, not an object", json_type_name(record)),
            ));
        };

        let mut values = Vec::new();
        for (key, value) in map {
            flatten(key, value, &mut values);
        }
        rows.push(RawRow::new(values, index + 1));
    }

    Ok(ParseOutput {
        rows,
        warnings: Vec::new(),
    })
}

fn flatten(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key.to_string(), b.to_string())),
        Value::Number(n) => out.push((key.to_string(), n.to_string())),
        Value::String(s) => out.push((key.to_string(), s.trim().to_string())),
        Value::Object(map) => {
            for (nested_key, nested) in map {
                flatten(&format!("{key}.{nested_key}"), nested, out);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{key}.{i}"), item, out);
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
