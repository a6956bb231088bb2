//! CSV file parser

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::config::LoadParams;
use crate::error::{FrameDiffError, Result};
use crate::model::{CellValue, Column, Table};

use super::{unique_headers, Parser};

/// Delimiters tried, in order, when none is given
const SNIFF_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parser for CSV-like delimited text files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, params: &LoadParams) -> Result<Table> {
        let delimiter = match params.delimiter {
            Some(d) => d,
            None => sniff_delimiter(path, params)?,
        };
        tracing::debug!(path = %path.display(), delimiter = %(delimiter as char), "reading CSV");

        let reader = open_skipping(path, params.skip_rows)?;
        parse_reader(reader, delimiter, params)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// First delimiter producing more than one column, `,` if none does
fn sniff_delimiter(path: &Path, params: &LoadParams) -> Result<u8> {
    for delimiter in SNIFF_DELIMITERS {
        let reader = open_skipping(path, params.skip_rows)?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .quote(params.quote)
            .flexible(true)
            .from_reader(reader);

        let mut record = csv::StringRecord::new();
        if csv_reader.read_record(&mut record)? && record.len() > 1 {
            return Ok(delimiter);
        }
    }
    Ok(b',')
}

fn open_skipping(path: &Path, skip_rows: usize) -> Result<BufReader<File>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    for _ in 0..skip_rows {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
    }
    Ok(reader)
}

fn parse_reader<R: Read>(reader: R, delimiter: u8, params: &LoadParams) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quote(params.quote)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let first = records.next().transpose()?;

    let (mut table, first_data) = match first {
        None => (Table::new(Vec::new()), None),
        Some(header) if params.has_header => {
            let names = unique_headers(header.iter().map(|s| s.trim().to_string()));
            (Table::new(names.into_iter().map(Column::new).collect()), None)
        }
        Some(record) => {
            let columns = (0..record.len()).map(|i| Column::new(i.to_string())).collect();
            (Table::new(columns), Some(record))
        }
    };

    let header_lines = usize::from(params.has_header);
    let offset = params.skip_rows + header_lines + 1;
    for (line_num, result) in first_data.into_iter().map(Ok).chain(records).enumerate() {
        let record = result?;
        let line = line_num + offset;
        // Short records are padded with nulls, long ones have nowhere to go
        if record.len() > table.column_count() {
            return Err(FrameDiffError::Parse(format!(
                "line {}: expected {} fields, found {}",
                line,
                table.column_count(),
                record.len()
            )));
        }
        let cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
        table.add_row(cells, line);
    }

    table.infer_dtypes();
    Ok(table)
}

/// Parse a string value into a CellValue with type inference
fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    // Check for empty/null
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed == "NA"
        || trimmed == "N/A"
    {
        return CellValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    // Try parsing as integer
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Try parsing as float
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }

    // Only ISO dates are recognised on load; other formats stay text until coercion
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    // Default to string
    CellValue::String(Cow::Owned(trimmed.to_string()))
}
