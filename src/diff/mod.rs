//! Diff engine for comparing aligned tables

pub mod cell_diff;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{FrameDiffError, Result};
use crate::model::{Label, Table};

pub use cell_diff::row_mask;

/// Outcome of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Identical,
    NotIdentical {
        differences: usize,
        /// Differing cells per column, in column order
        per_column: IndexMap<String, usize>,
    },
}

impl Verdict {
    pub fn is_identical(&self) -> bool {
        matches!(self, Verdict::Identical)
    }
}

/// Boolean grid shaped like the compared tables; `true` marks a differing cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffMatrix {
    pub columns: Vec<String>,
    pub labels: Vec<Label>,
    pub index_name: Option<String>,
    pub cells: Vec<Vec<bool>>,
}

impl DiffMatrix {
    /// An all-false grid in the shape of `table`
    pub fn all_equal(table: &Table) -> Self {
        Self {
            columns: table.column_names(),
            labels: table.labels().cloned().collect(),
            index_name: table.index_name.clone(),
            cells: vec![vec![false; table.column_count()]; table.row_count()],
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.labels.len(), self.columns.len())
    }

    /// Number of differing cells
    pub fn total(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&d| d).count())
            .sum()
    }

    /// Differing cells per column, in column order
    pub fn column_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> =
            self.columns.iter().map(|c| (c.clone(), 0)).collect();
        for row in &self.cells {
            for (name, _) in self.columns.iter().zip(row).filter(|&(_, &d)| d) {
                if let Some(count) = counts.get_mut(name) {
                    *count += 1;
                }
            }
        }
        counts
    }

    pub fn is_identical(&self) -> bool {
        self.total() == 0
    }

    pub fn verdict(&self) -> Verdict {
        let differences = self.total();
        if differences == 0 {
            Verdict::Identical
        } else {
            Verdict::NotIdentical {
                differences,
                per_column: self.column_counts(),
            }
        }
    }

    /// Positions of differing cells as (row label, column name)
    pub fn differing_cells(&self) -> impl Iterator<Item = (&Label, &str)> + '_ {
        self.labels.iter().zip(&self.cells).flat_map(move |(label, row)| {
            self.columns
                .iter()
                .zip(row)
                .filter(|&(_, &d)| d)
                .map(move |(name, _)| (label, name.as_str()))
        })
    }
}

/// Main diff engine
pub struct DiffEngine;

impl DiffEngine {
    /// Compare two aligned tables cell by cell.
    ///
    /// Both tables must share the column sequence and the row label sequence.
    pub fn compare(t1: &Table, t2: &Table) -> Result<DiffMatrix> {
        if t1.column_names() != t2.column_names() {
            return Err(FrameDiffError::Misaligned(
                "column sequences differ".to_string(),
            ));
        }
        if t1.row_count() != t2.row_count() || t1.labels().ne(t2.labels()) {
            return Err(FrameDiffError::Misaligned(
                "row label sequences differ".to_string(),
            ));
        }

        let cells = t1
            .rows
            .par_iter()
            .zip(t2.rows.par_iter())
            .map(|(a, b)| row_mask(a, b))
            .collect();

        let diff = DiffMatrix {
            columns: t1.column_names(),
            labels: t1.labels().cloned().collect(),
            index_name: t1.index_name.clone(),
            cells,
        };
        tracing::debug!(differences = diff.total(), "comparison done");
        Ok(diff)
    }
}

/// Convenience function to compare two aligned tables
pub fn compare(t1: &Table, t2: &Table) -> Result<DiffMatrix> {
    DiffEngine::compare(t1, t2)
}
