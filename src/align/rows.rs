//! Row identity resolution on the index labels

use rustc_hash::FxHashSet;

use crate::model::{Label, Table};
use crate::report::{Event, Reporter};

/// Both tables carry the same set of row labels
pub fn identical_index_values(t1: &Table, t2: &Table) -> bool {
    t1.label_set() == t2.label_set()
}

/// Labels found only in `t1`, and only in `t2`, each in its own table's order
pub fn exclusive_labels(t1: &Table, t2: &Table) -> (Vec<Label>, Vec<Label>) {
    let only_in = |a: &Table, b: &Table| -> Vec<Label> {
        let others = b.label_set();
        a.labels().filter(|l| !others.contains(l)).cloned().collect()
    };
    (only_in(t1, t2), only_in(t2, t1))
}

/// Drop the rows whose labels are missing from the other table, then sort
/// both tables by label so equal label sets line up row by row
pub fn align_rows(t1: Table, t2: Table, reporter: &mut dyn Reporter) -> (Table, Table) {
    let (t1, t2) = if identical_index_values(&t1, &t2) {
        (t1, t2)
    } else {
        drop_non_overlapping_rows(t1, t2, reporter)
    };
    (t1.sort_by_label(), t2.sort_by_label())
}

fn drop_non_overlapping_rows(t1: Table, t2: Table, reporter: &mut dyn Reporter) -> (Table, Table) {
    let (only_in_first, only_in_second) = exclusive_labels(&t1, &t2);
    tracing::info!(
        first = only_in_first.len(),
        second = only_in_second.len(),
        "dropping rows missing from the other table"
    );

    let t1 = t1.drop_rows(&only_in_first.iter().cloned().collect::<FxHashSet<_>>());
    let t2 = t2.drop_rows(&only_in_second.iter().cloned().collect::<FxHashSet<_>>());
    reporter.report(&Event::RowsDropped {
        only_in_first,
        only_in_second,
    });
    (t1, t2)
}
