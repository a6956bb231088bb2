//! Column casts used by dtype coercion

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::schema::DType;
use super::table::CellValue;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

/// Parse a string as a date or date-time in one of the supported formats
pub fn parse_temporal(s: &str) -> Option<CellValue> {
    let trimmed = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(CellValue::Date(d));
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(CellValue::DateTime(dt));
        }
    }
    None
}

/// Cast a whole column to `to`.
///
/// All-or-nothing: `None` if any single cell cannot be represented.
/// Casting to `Object` always succeeds and leaves the cells untouched.
pub fn cast_column<'a>(
    cells: impl IntoIterator<Item = &'a CellValue>,
    to: DType,
) -> Option<Vec<CellValue>> {
    cells.into_iter().map(|cell| cast_cell(cell, to)).collect()
}

fn cast_cell(cell: &CellValue, to: DType) -> Option<CellValue> {
    match to {
        DType::Object => Some(cell.clone()),
        DType::Int => to_int(cell).map(CellValue::Int),
        DType::Float => match cell {
            CellValue::Null => Some(CellValue::Null),
            other => to_float(other).map(CellValue::Float),
        },
        DType::Bool => to_bool(cell).map(CellValue::Bool),
        DType::Date => match to_temporal(cell)? {
            CellValue::DateTime(dt) if dt.time() == NaiveTime::MIN => Some(CellValue::Date(dt.date())),
            CellValue::DateTime(_) => None,
            other => Some(other),
        },
        DType::DateTime => match to_temporal(cell)? {
            CellValue::Date(d) => Some(CellValue::DateTime(d.and_time(NaiveTime::MIN))),
            other => Some(other),
        },
    }
}

fn to_int(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
        CellValue::Bool(b) => Some(i64::from(*b)),
        CellValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_bool(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Bool(b) => Some(*b),
        CellValue::Int(0) => Some(false),
        CellValue::Int(1) => Some(true),
        CellValue::Float(f) if *f == 0.0 => Some(false),
        CellValue::Float(f) if *f == 1.0 => Some(true),
        CellValue::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        CellValue::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn to_temporal(cell: &CellValue) -> Option<CellValue> {
    match cell {
        CellValue::Null | CellValue::Date(_) | CellValue::DateTime(_) => Some(cell.clone()),
        CellValue::String(s) => parse_temporal(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_to_int_is_all_or_nothing() {
        let ok = [CellValue::from("1"), CellValue::Float(2.0), CellValue::Int(3)];
        assert_eq!(
            cast_column(&ok, DType::Int),
            Some(vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)])
        );

        let with_null = [CellValue::Int(1), CellValue::Null];
        assert_eq!(cast_column(&with_null, DType::Int), None);

        let with_sentinel = [CellValue::Int(1), CellValue::from("MISSING")];
        assert_eq!(cast_column(&with_sentinel, DType::Int), None);
    }

    #[test]
    fn test_cast_to_int_rejects_out_of_range_floats() {
        assert_eq!(cast_column(&[CellValue::Float(1e19)], DType::Int), None);
        assert_eq!(cast_column(&[CellValue::Float(-1e19)], DType::Int), None);
        assert_eq!(cast_column(&[CellValue::Float(f64::INFINITY)], DType::Int), None);
        assert_eq!(
            cast_column(&[CellValue::Float(-3.0)], DType::Int),
            Some(vec![CellValue::Int(-3)])
        );
    }

    #[test]
    fn test_cast_to_float_keeps_nulls() {
        let cells = [CellValue::Int(1), CellValue::Null, CellValue::from("0.5")];
        assert_eq!(
            cast_column(&cells, DType::Float),
            Some(vec![CellValue::Float(1.0), CellValue::Null, CellValue::Float(0.5)])
        );
    }

    #[test]
    fn test_cast_to_dates() {
        let cells = [CellValue::from("12.08.1978"), CellValue::from("2016-08-18")];
        let cast = cast_column(&cells, DType::Date).unwrap();
        assert_eq!(cast[0], CellValue::Date(NaiveDate::from_ymd_opt(1978, 8, 12).unwrap()));
        assert_eq!(cast[1], CellValue::Date(NaiveDate::from_ymd_opt(2016, 8, 18).unwrap()));

        assert_eq!(cast_column(&[CellValue::from("not a date")], DType::DateTime), None);
    }

    #[test]
    fn test_cast_to_object_is_identity() {
        let cells = [CellValue::Int(1), CellValue::from("x")];
        assert_eq!(cast_column(&cells, DType::Object), Some(cells.to_vec()));
    }
}
