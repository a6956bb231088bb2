//! Missing-value normalization.
//!
//! The diff treats a null as different from everything, including another
//! null. Replacing nulls with a sentinel string first keeps tables that are
//! missing data in the same places from reporting spurious differences.

use std::borrow::Cow;

use crate::model::{CellValue, DType, Table};

/// Default marker for missing cells
pub const DEFAULT_SENTINEL: &str = "MISSING";

/// Replace every null in `table` with `sentinel`.
///
/// A column that received a sentinel becomes `Object`; other columns,
/// the column order, and the row order are unchanged.
pub fn impute_missing(mut table: Table, sentinel: &str) -> Table {
    let mut touched = vec![false; table.column_count()];
    for row in &mut table.rows {
        for (idx, cell) in row.cells.iter_mut().enumerate() {
            if cell.is_null() {
                *cell = CellValue::String(Cow::Owned(sentinel.to_string()));
                touched[idx] = true;
            }
        }
    }

    for (column, _) in table.columns.iter_mut().zip(&touched).filter(|&(_, &t)| t) {
        column.dtype = DType::Object;
    }
    table
}

/// Normalize both tables with the same sentinel
pub fn impute_missing_values(t1: Table, t2: Table, sentinel: &str) -> (Table, Table) {
    (impute_missing(t1, sentinel), impute_missing(t2, sentinel))
}
