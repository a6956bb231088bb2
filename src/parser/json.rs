//! JSON record-array parser

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexSet;
use serde_json::Value;

use crate::config::LoadParams;
use crate::error::{FrameDiffError, Result};
use crate::model::{parse_temporal, CellValue, Column, Table};

use super::Parser;

/// Parser for JSON files holding an array of records
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path, params: &LoadParams) -> Result<Table> {
        let reader = BufReader::new(File::open(path)?);
        let value: Value = serde_json::from_reader(reader)?;
        parse_value(value, params)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("json")
    }
}

fn parse_value(value: Value, params: &LoadParams) -> Result<Table> {
    // A single object is a one-record table
    let records = match value {
        Value::Array(arr) => arr,
        Value::Object(_) => vec![value],
        _ => {
            return Err(FrameDiffError::Parse(
                "JSON must be an array of records or a single record".to_string(),
            ))
        }
    };

    // Column order is first appearance across all records
    let mut column_names: IndexSet<String> = IndexSet::new();
    for record in &records {
        if let Value::Object(obj) = record {
            column_names.extend(obj.keys().cloned());
        }
    }

    let mut table = Table::new(column_names.iter().map(Column::new).collect());
    for (position, record) in records.iter().enumerate().skip(params.skip_rows) {
        let Value::Object(obj) = record else {
            return Err(FrameDiffError::Parse(format!(
                "record {} is not an object",
                position + 1
            )));
        };
        let cells = column_names
            .iter()
            .map(|key| json_value_to_cell(obj.get(key)))
            .collect();
        table.add_row(cells, position + 1);
    }

    table.infer_dtypes();
    Ok(table)
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(Cow::Owned(n.to_string()))
            }
        }
        Some(Value::String(s)) => {
            if looks_iso(s) {
                if let Some(cell) = parse_temporal(s) {
                    return cell;
                }
            }
            CellValue::String(Cow::Owned(s.clone()))
        }
        // Nested values are kept as their JSON text
        Some(nested) => CellValue::String(Cow::Owned(nested.to_string())),
    }
}

/// Only ISO-shaped strings become dates on load
fn looks_iso(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-'
}
