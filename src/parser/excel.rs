//! Excel file parser (xlsx, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::config::LoadParams;
use crate::error::{FrameDiffError, Result};
use crate::model::{parse_temporal, CellValue, Column, Table};

use super::{unique_headers, Parser};

/// Parser for Excel files
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, path: &Path, params: &LoadParams) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)?;

        // Get sheet name
        let sheet_name = match params.sheet {
            Some(ref name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| FrameDiffError::Parse(format!("no sheets found in {}", path.display())))?,
        };
        tracing::debug!(path = %path.display(), sheet = %sheet_name, "reading sheet");

        let range: Range<Data> = workbook.worksheet_range(&sheet_name)?;
        Ok(parse_range(&range, params))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

fn parse_range(range: &Range<Data>, params: &LoadParams) -> Table {
    let (_, col_count) = range.get_size();
    let mut rows = range.rows().skip(params.skip_rows);

    let columns = if params.has_header {
        match rows.next() {
            Some(header) => unique_headers(header.iter().map(cell_to_string)),
            None => Vec::new(),
        }
    } else {
        (0..col_count).map(|i| i.to_string()).collect()
    };
    let mut table = Table::new(columns.into_iter().map(Column::new).collect());

    let offset = params.skip_rows + usize::from(params.has_header) + 1;
    for (line_num, row) in rows.enumerate() {
        let cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
        table.add_row(cells, line_num + offset);
    }

    table.infer_dtypes();
    table
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(ref dt) => from_serial(dt.as_f64()).unwrap_or(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => {
            parse_temporal(s).unwrap_or_else(|| CellValue::String(Cow::Owned(s.clone())))
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}

/// Excel serial day number (1900 system) to a date, or a date-time when it has a time part
fn from_serial(serial: f64) -> Option<CellValue> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    let dt = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    if dt.time() == NaiveTime::MIN {
        Some(CellValue::Date(dt.date()))
    } else {
        Some(CellValue::DateTime(dt))
    }
}
