//! Cell-level comparison logic

use crate::model::Row;

/// Elementwise inequality of two aligned rows.
///
/// Nulls never compare equal, so callers normalize missing values first.
pub fn row_mask(a: &Row, b: &Row) -> Vec<bool> {
    a.cells
        .iter()
        .zip(&b.cells)
        .map(|(x, y)| x.differs(y))
        .collect()
}
