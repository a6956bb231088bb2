//! Structural alignment of two tables ahead of the cell comparison.
//!
//! The steps run in a fixed order, each one relying on what the previous one
//! established:
//!
//! 1. early exit when the tables are already identical
//! 2. column width and name resolution (may consult the [`DecisionProvider`])
//! 3. column order of table 2 follows table 1
//! 4. row resolution on the index labels, then sort by label
//! 5. dtype coercion of table 2 toward table 1, then the reverse
//!
//! Mismatches are never fatal here; they are resolved and reported.

pub mod columns;
pub mod dtypes;
pub mod rows;

use crate::decision::{AlignmentDecision, DecisionProvider, Scenario};
use crate::error::{FrameDiffError, Result};
use crate::model::Table;
use crate::report::{Event, Reporter, Side};

pub use columns::{
    drop_non_overlapping_columns, enforce_column_identity, exclusive_columns,
    identical_column_names, same_width, sort_columns,
};
pub use dtypes::{attempt_coerce, enforce_dtype_identity, identical_dtypes};
pub use rows::{align_rows, exclusive_labels, identical_index_values};

/// Two tables after alignment
#[derive(Debug, Clone)]
pub struct Alignment {
    pub table_1: Table,
    pub table_2: Table,
    /// The early-exit check matched and no step ran
    pub already_identical: bool,
}

/// Same shape, column sequence, dtypes, label sequence and values
pub fn tables_identical(t1: &Table, t2: &Table) -> bool {
    t1.structurally_equal(t2)
}

/// Runs the alignment steps in order
pub struct StructuralAligner<'a> {
    decider: &'a mut dyn DecisionProvider,
    reporter: &'a mut dyn Reporter,
}

impl<'a> StructuralAligner<'a> {
    pub fn new(decider: &'a mut dyn DecisionProvider, reporter: &'a mut dyn Reporter) -> Self {
        Self { decider, reporter }
    }

    /// Align `t1` and `t2` so they can be compared cell by cell.
    ///
    /// Fails only if a table's row labels are not unique.
    pub fn align(&mut self, t1: Table, t2: Table) -> Result<Alignment> {
        if tables_identical(&t1, &t2) {
            tracing::info!("tables identical, skipping alignment");
            self.reporter.report(&Event::Identical {
                rows: t1.row_count(),
                columns: t1.column_count(),
            });
            return Ok(Alignment {
                table_1: t1,
                table_2: t2,
                already_identical: true,
            });
        }

        ensure_unique(&t1, Side::First)?;
        ensure_unique(&t2, Side::Second)?;

        let (t1, t2) = self.resolve_columns(t1, t2);
        let (t1, t2) = sort_columns(t1, t2)?;
        let (t1, t2) = align_rows(t1, t2, self.reporter);
        let (t1, t2) = if identical_dtypes(&t1, &t2) {
            (t1, t2)
        } else {
            enforce_dtype_identity(t1, t2, self.reporter)
        };

        Ok(Alignment {
            table_1: t1,
            table_2: t2,
            already_identical: false,
        })
    }

    /// Width and name resolution: equal widths with differing names ask the
    /// decider, differing widths always drop the non-overlapping columns
    pub fn resolve_columns(&mut self, t1: Table, t2: Table) -> (Table, Table) {
        if !same_width(&t1, &t2) {
            tracing::debug!(
                first = t1.column_count(),
                second = t2.column_count(),
                "column counts differ"
            );
            return drop_non_overlapping_columns(t1, t2, self.reporter);
        }
        if identical_column_names(&t1, &t2) {
            return (t1, t2);
        }

        let decision = AlignmentDecision::from(self.decider.decide(Scenario::ColumnNameMismatch));
        tracing::debug!(?decision, "column names differ at equal width");
        match decision {
            AlignmentDecision::DropNonOverlapping => {
                drop_non_overlapping_columns(t1, t2, self.reporter)
            }
            AlignmentDecision::ForceIdentity => enforce_column_identity(t1, t2, self.reporter),
        }
    }
}

/// Column names and row labels must both be unique
fn ensure_unique(table: &Table, side: Side) -> Result<()> {
    let columns = table.duplicate_columns();
    if !columns.is_empty() {
        return Err(FrameDiffError::DuplicateColumns {
            table: side.to_string(),
            columns: columns.join(", "),
        });
    }

    let duplicates = table.duplicate_labels();
    if duplicates.is_empty() {
        return Ok(());
    }
    Err(FrameDiffError::DuplicateLabels {
        table: side.to_string(),
        labels: duplicates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;
    use crate::model::{CellValue, Label};
    use crate::report::EventLog;

    fn ints(names: &[&str], rows: usize) -> Table {
        Table::from_columns(names.iter().enumerate().map(|(c, n)| {
            (*n, (0..rows).map(|r| CellValue::Int((r * 10 + c) as i64)).collect())
        }))
        .unwrap()
    }

    fn align_with(t1: Table, t2: Table, answer: Decision) -> (Alignment, Vec<Event>, usize) {
        let mut asked = 0;
        let mut decider = |_: Scenario| {
            asked += 1;
            answer
        };
        let mut log = EventLog::new();
        let alignment = StructuralAligner::new(&mut decider, &mut log)
            .align(t1, t2)
            .unwrap();
        (alignment, log.into_events(), asked)
    }

    #[test]
    fn test_identical_tables_short_circuit() {
        let (alignment, events, asked) = align_with(ints(&["a"], 2), ints(&["a"], 2), Decision::Negative);
        assert!(alignment.already_identical);
        assert_eq!(events, vec![Event::Identical { rows: 2, columns: 1 }]);
        assert_eq!(asked, 0);
    }

    #[test]
    fn test_identical_check_is_symmetric() {
        let a = ints(&["a", "b"], 3);
        let b = ints(&["b", "a"], 3);
        assert_eq!(tables_identical(&a, &b), tables_identical(&b, &a));
        assert_eq!(tables_identical(&a, &a.clone()), tables_identical(&a.clone(), &a));
    }

    #[test]
    fn test_drop_decision_on_equal_width() {
        let (alignment, events, asked) =
            align_with(ints(&["A", "B", "C"], 2), ints(&["B", "C", "D"], 2), Decision::Affirmative);
        assert_eq!(asked, 1);
        assert_eq!(alignment.table_1.column_names(), vec!["B".to_string(), "C".to_string()]);
        assert_eq!(alignment.table_2.column_names(), vec!["B".to_string(), "C".to_string()]);
        assert!(events.contains(&Event::ColumnsDropped {
            only_in_first: vec!["A".into()],
            only_in_second: vec!["D".into()],
        }));
    }

    #[test]
    fn test_force_identity_on_equal_width() {
        let t2 = ints(&["p", "q", "r"], 2);
        let values = t2.rows.iter().map(|r| r.cells.clone()).collect::<Vec<_>>();
        let (alignment, _, asked) = align_with(ints(&["x", "y", "z"], 2), t2, Decision::Negative);
        assert_eq!(asked, 1);
        assert_eq!(
            alignment.table_2.column_names(),
            vec!["x".to_string(), "y".to_string(), "z".to_string()]
        );
        let after = alignment.table_2.rows.iter().map(|r| r.cells.clone()).collect::<Vec<_>>();
        assert_eq!(after, values);
    }

    #[test]
    fn test_different_width_drops_without_asking() {
        let (alignment, _, asked) =
            align_with(ints(&["a", "b", "c"], 2), ints(&["c", "a"], 2), Decision::Negative);
        assert_eq!(asked, 0);
        assert_eq!(alignment.table_1.column_names(), alignment.table_2.column_names());
        assert_eq!(alignment.table_1.column_names(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_postconditions_hold_for_mixed_drift() {
        let t1 = ints(&["a", "b", "c"], 4);
        let mut t2 = ints(&["c", "b", "d", "e"], 2);
        t2.rows[1].label = Label::Int(7);

        let (alignment, _, _) = align_with(t1, t2, Decision::Affirmative);
        let (t1, t2) = (alignment.table_1, alignment.table_2);
        assert_eq!(t1.column_names(), t2.column_names());
        assert_eq!(t1.label_set(), t2.label_set());
        assert_eq!(t1.labels().cloned().collect::<Vec<_>>(), vec![Label::Int(0)]);
    }

    #[test]
    fn test_duplicate_labels_are_fatal() {
        let t1 = ints(&["a"], 2);
        let mut t2 = ints(&["a"], 3);
        t2.rows[2].label = Label::Int(0);

        let mut decider = |_: Scenario| Decision::Affirmative;
        let mut log = EventLog::new();
        let err = StructuralAligner::new(&mut decider, &mut log)
            .align(t1, t2)
            .unwrap_err();
        assert!(matches!(err, FrameDiffError::DuplicateLabels { .. }));
    }

    #[test]
    fn test_repeated_column_names_are_fatal() {
        let t1 = ints(&["a", "b", "c"], 1);
        let mut t2 = ints(&["a", "b", "c"], 1);
        t2.columns[2].name = "b".to_string();

        let mut decider = |_: Scenario| Decision::Affirmative;
        let mut log = EventLog::new();
        let err = StructuralAligner::new(&mut decider, &mut log)
            .align(t1, t2)
            .unwrap_err();
        assert!(matches!(
            err,
            FrameDiffError::DuplicateColumns { ref table, ref columns } if table == "table 2" && columns == "b"
        ));
        assert!(log.events.is_empty());
    }
}
