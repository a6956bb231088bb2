//! Dtype coercion between two column-aligned tables

use crate::model::{cast_column, DType, Table};
use crate::report::{Event, Reporter};

/// Column dtypes match position by position
pub fn identical_dtypes(t1: &Table, t2: &Table) -> bool {
    t1.dtypes() == t2.dtypes()
}

/// Coerce `target` column by column toward the dtypes of `reference`.
///
/// Date-like reference columns parse the target as dates, `Object` reference
/// columns leave the target alone, anything else is cast. A failed cast
/// leaves that column as it was. Returns the names of columns whose dtypes
/// still differ, and the coerced target.
pub fn attempt_coerce(reference: &Table, mut target: Table) -> (Vec<String>, Table) {
    for (idx, column) in reference.columns.iter().enumerate() {
        let Some(current) = target.columns.get(idx).map(|c| c.dtype) else {
            break;
        };
        if current == column.dtype || column.dtype == DType::Object {
            continue;
        }

        match cast_column(target.column_values(idx), column.dtype) {
            Some(cells) => target.replace_column(idx, column.dtype, cells),
            None => tracing::debug!(
                column = %column.name,
                from = %current,
                to = %column.dtype,
                "cast failed, column left unconverted"
            ),
        }
    }

    let residual = reference
        .columns
        .iter()
        .zip(&target.columns)
        .filter(|(a, b)| a.dtype != b.dtype)
        .map(|(a, _)| a.name.clone())
        .collect();
    (residual, target)
}

/// Try table 1's dtypes on table 2, then table 2's on table 1.
///
/// When neither direction reconciles every column, the residual columns are
/// reported and the pair from the second attempt is returned as-is.
pub fn enforce_dtype_identity(t1: Table, t2: Table, reporter: &mut dyn Reporter) -> (Table, Table) {
    let (residual, t2) = attempt_coerce(&t1, t2);
    if residual.is_empty() {
        return (t1, t2);
    }
    tracing::debug!(?residual, "coercing table 2 left mismatches, trying the other way round");

    let (residual, t1) = attempt_coerce(&t2, t1);
    if !residual.is_empty() {
        tracing::warn!(?residual, "dtype identity not possible");
        reporter.report(&Event::DtypeResidual { columns: residual });
    }
    (t1, t2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use crate::report::EventLog;

    fn base() -> Table {
        Table::from_columns(vec![
            ("date_1", vec![CellValue::from("12.08.1978"), CellValue::from("12.08.1978")]),
            ("int_2", vec![CellValue::Int(1), CellValue::Int(1)]),
            ("float_4", vec![CellValue::Float(1000.0), CellValue::Float(500.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_attempt_coerce_casts_toward_reference() {
        let reference = base();
        let target = Table::from_columns(vec![
            ("date_1", vec![CellValue::from("12.08.1978"), CellValue::from("12.08.1978")]),
            ("int_2", vec![CellValue::from("1"), CellValue::from("1")]),
            ("float_4", vec![CellValue::Int(1000), CellValue::Int(500)]),
        ])
        .unwrap();

        let (residual, coerced) = attempt_coerce(&reference, target);
        assert!(residual.is_empty());
        assert_eq!(coerced.dtypes(), reference.dtypes());
        assert_eq!(coerced.rows[0].cells[2], CellValue::Float(1000.0));
    }

    #[test]
    fn test_object_reference_leaves_target_untouched() {
        let (residual, coerced) = attempt_coerce(
            &base(),
            Table::from_columns(vec![
                ("date_1", vec![CellValue::Int(1), CellValue::Int(2)]),
                ("int_2", vec![CellValue::Int(1), CellValue::Int(1)]),
                ("float_4", vec![CellValue::Float(1.0), CellValue::Float(2.0)]),
            ])
            .unwrap(),
        );
        assert_eq!(residual, vec!["date_1".to_string()]);
        assert_eq!(coerced.columns[0].dtype, DType::Int);
    }

    #[test]
    fn test_second_direction_resolves_mismatch() {
        // 1.5 can't become an int, but table 1's ints can become floats
        let t1 = Table::from_columns(vec![("n", vec![CellValue::Int(1), CellValue::Int(2)])]).unwrap();
        let t2 =
            Table::from_columns(vec![("n", vec![CellValue::Float(1.5), CellValue::Float(2.0)])]).unwrap();

        let mut log = EventLog::new();
        let (t1, t2) = enforce_dtype_identity(t1, t2, &mut log);
        assert!(log.events.is_empty());
        assert!(identical_dtypes(&t1, &t2));
        assert_eq!(t1.rows[0].cells[0], CellValue::Float(1.0));
        assert_eq!(t2.rows[0].cells[0], CellValue::Float(1.5));
    }

    #[test]
    fn test_object_column_never_coerced() {
        let t1 = base();
        let t2 = Table::from_columns(vec![
            ("date_1", vec![CellValue::from("12.08.1978"), CellValue::from("12.08.1978")]),
            ("int_2", vec![CellValue::Int(1), CellValue::from("MISSING")]),
            ("float_4", vec![CellValue::Float(1000.0), CellValue::Float(500.0)]),
        ])
        .unwrap();

        let mut log = EventLog::new();
        let (t1, t2) = enforce_dtype_identity(t1, t2, &mut log);
        assert_eq!(log.events, vec![Event::DtypeResidual { columns: vec!["int_2".into()] }]);
        assert_eq!(t1.columns[1].dtype, DType::Int);
        assert_eq!(t2.columns[1].dtype, DType::Object);
    }

    #[test]
    fn test_residual_mismatch_is_reported() {
        let t1 = Table::from_columns(vec![
            ("a", vec![CellValue::Int(1)]),
            ("b", vec![CellValue::Float(1.5)]),
        ])
        .unwrap();
        let t2 = Table::from_columns(vec![
            ("a", vec![CellValue::Int(1)]),
            ("b", vec![CellValue::from("str")]),
        ])
        .unwrap();

        let mut log = EventLog::new();
        let (t1, t2) = enforce_dtype_identity(t1, t2, &mut log);
        assert_eq!(log.events, vec![Event::DtypeResidual { columns: vec!["b".into()] }]);
        assert_eq!(t1.columns[1].dtype, DType::Float);
        assert_eq!(t2.columns[1].dtype, DType::Object);
    }
}
