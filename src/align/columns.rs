//! Column width, identity and order resolution

use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::model::Table;
use crate::report::{Event, Reporter};

/// Both tables have the same number of columns
pub fn same_width(t1: &Table, t2: &Table) -> bool {
    t1.column_count() == t2.column_count()
}

/// Both tables carry the same set of column names, in any order
pub fn identical_column_names(t1: &Table, t2: &Table) -> bool {
    let names_1: FxHashSet<&str> = t1.columns.iter().map(|c| c.name.as_str()).collect();
    let names_2: FxHashSet<&str> = t2.columns.iter().map(|c| c.name.as_str()).collect();
    names_1 == names_2
}

/// Column names found only in `t1`, and only in `t2`, each in its own table's order
pub fn exclusive_columns(t1: &Table, t2: &Table) -> (Vec<String>, Vec<String>) {
    let only_in = |a: &Table, b: &Table| -> Vec<String> {
        a.columns
            .iter()
            .filter(|c| b.column_index(&c.name).is_none())
            .map(|c| c.name.clone())
            .collect()
    };
    (only_in(t1, t2), only_in(t2, t1))
}

/// Remove the columns each table does not share with the other
pub fn drop_non_overlapping_columns(
    t1: Table,
    t2: Table,
    reporter: &mut dyn Reporter,
) -> (Table, Table) {
    let (only_in_first, only_in_second) = exclusive_columns(&t1, &t2);
    if only_in_first.is_empty() && only_in_second.is_empty() {
        return (t1, t2);
    }

    tracing::info!(?only_in_first, ?only_in_second, "dropping non-overlapping columns");
    let t1 = t1.drop_columns(&only_in_first.iter().cloned().collect());
    let t2 = t2.drop_columns(&only_in_second.iter().cloned().collect());
    reporter.report(&Event::ColumnsDropped {
        only_in_first,
        only_in_second,
    });
    (t1, t2)
}

/// Give `t2` the column names of `t1`, position by position.
///
/// Only meaningful for tables of equal width; cell values are untouched.
pub fn enforce_column_identity(
    t1: Table,
    t2: Table,
    reporter: &mut dyn Reporter,
) -> (Table, Table) {
    let from = t2.column_names();
    let to = t1.column_names();
    tracing::info!(?from, ?to, "forcing column names of table 1 onto table 2");
    let t2 = t2.rename_columns(&to);
    reporter.report(&Event::ColumnsRenamed { from, to });
    (t1, t2)
}

/// Reorder the columns of `t2` to follow `t1`
pub fn sort_columns(t1: Table, t2: Table) -> Result<(Table, Table)> {
    let order = t1.column_names();
    let t2 = t2.select_columns(&order)?;
    Ok((t1, t2))
}
