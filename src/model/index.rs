//! Row index labels

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::table::CellValue;

/// A row index label.
///
/// Labels are totally ordered (by variant, then by value) so that two tables
/// with the same label set can be brought into the same row order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Label {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<&CellValue> for Label {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Null => Label::Null,
            CellValue::Bool(b) => Label::Bool(*b),
            CellValue::Int(i) => Label::Int(*i),
            // Integral floats keep integer identity, e.g. ids read from a spreadsheet
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Label::Int(*f as i64)
            }
            CellValue::Float(f) => Label::Text(f.to_string()),
            CellValue::String(s) => Label::Text(s.to_string()),
            CellValue::Date(d) => Label::Date(*d),
            CellValue::DateTime(dt) => Label::DateTime(*dt),
        }
    }
}

impl From<usize> for Label {
    fn from(position: usize) -> Self {
        Label::Int(position as i64)
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Int(i)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Null => write!(f, "NULL"),
            Label::Bool(b) => write!(f, "{}", b),
            Label::Int(i) => write!(f, "{}", i),
            Label::Text(s) => write!(f, "{}", s),
            Label::Date(d) => write!(f, "{}", d),
            Label::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}
