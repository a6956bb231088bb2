//! Table, Row, and Cell data structures

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::index::Label;
use super::schema::{Column, DType};
use crate::error::{FrameDiffError, Result};

/// A cell value with type information
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Structural equality: nulls match nulls, NaN matches NaN.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            // A date is midnight of that day
            (CellValue::Date(a), CellValue::DateTime(b))
            | (CellValue::DateTime(b), CellValue::Date(a)) => a.and_time(NaiveTime::MIN) == *b,
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Elementwise inequality as used for the diff grid.
    ///
    /// Unlike `==`, a null never equals anything, not even another null.
    pub fn differs(&self, other: &Self) -> bool {
        if self.is_null() || other.is_null() {
            return true;
        }
        self != other
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row index label
    pub label: Label,
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed, 0 if built in memory)
    pub source_line: usize,
}

impl Row {
    pub fn new(label: Label, cells: Vec<CellValue>, source_line: usize) -> Self {
        Self {
            label,
            cells,
            source_line,
        }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing typed columns and labeled rows.
///
/// Every row holds exactly one cell per column. Transformations consume the
/// table and hand back a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
    /// Name of the column the row index was built from, if any
    pub index_name: Option<String>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            index_name: None,
        }
    }

    /// Build a table from named columns, with a positional index and inferred dtypes
    pub fn from_columns<N, I>(columns: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<CellValue>)>,
    {
        let (names, data): (Vec<String>, Vec<Vec<CellValue>>) = columns
            .into_iter()
            .map(|(name, cells)| (name.into(), cells))
            .unzip();

        let height = data.first().map_or(0, Vec::len);
        if let Some((name, cells)) = names.iter().zip(&data).find(|(_, c)| c.len() != height) {
            return Err(FrameDiffError::RaggedColumns {
                column: name.clone(),
                expected: height,
                found: cells.len(),
            });
        }

        let mut table = Table::new(names.into_iter().map(Column::new).collect());
        let duplicates = table.duplicate_columns();
        if !duplicates.is_empty() {
            return Err(FrameDiffError::DuplicateColumns {
                table: "table".to_string(),
                columns: duplicates.join(", "),
            });
        }
        let mut columns: Vec<_> = data.into_iter().map(Vec::into_iter).collect();
        for _ in 0..height {
            let cells = columns.iter_mut().filter_map(Iterator::next).collect();
            table.add_row(cells, 0);
        }
        table.infer_dtypes();
        Ok(table)
    }

    /// Add a row with the next positional label
    pub fn add_row(&mut self, cells: Vec<CellValue>, source_line: usize) {
        let label = Label::from(self.rows.len());
        self.add_labeled_row(label, cells, source_line);
    }

    /// Add a row with an explicit label. Short rows are padded with nulls.
    pub fn add_labeled_row(&mut self, label: Label, mut cells: Vec<CellValue>, source_line: usize) {
        cells.resize(self.column_count(), CellValue::Null);
        self.rows.push(Row::new(label, cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Column dtypes in order
    pub fn dtypes(&self) -> Vec<DType> {
        self.columns.iter().map(|c| c.dtype).collect()
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |r| r.get(index))
    }

    /// Row labels in order
    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.rows.iter().map(|r| &r.label)
    }

    /// Set of row labels
    pub fn label_set(&self) -> FxHashSet<&Label> {
        self.labels().collect()
    }

    /// Labels that occur more than once, in first-seen order
    pub fn duplicate_labels(&self) -> Vec<Label> {
        let mut counts: FxHashMap<&Label, usize> = FxHashMap::default();
        let mut duplicates = Vec::new();
        for label in self.labels() {
            let count = counts.entry(label).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(label.clone());
            }
        }
        duplicates
    }

    /// Column names that occur more than once, in first-seen order
    pub fn duplicate_columns(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut duplicates = Vec::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) && !duplicates.contains(&column.name) {
                duplicates.push(column.name.clone());
            }
        }
        duplicates
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Infer every column's dtype from its cells
    pub fn infer_dtypes(&mut self) {
        for col_idx in 0..self.column_count() {
            let dtype = DType::infer(self.column_values(col_idx));
            self.columns[col_idx].dtype = dtype;
        }
    }

    /// Replace the cells and dtype of one column
    pub fn replace_column(&mut self, index: usize, dtype: DType, cells: Vec<CellValue>) {
        debug_assert_eq!(cells.len(), self.row_count());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.cells[index] = cell;
        }
        self.columns[index].dtype = dtype;
    }

    /// Turn a column into the row index, removing it from the columns.
    ///
    /// The column must exist and hold unique values.
    pub fn set_index_column(mut self, name: &str, table: &str) -> Result<Self> {
        let col_idx = self
            .column_index(name)
            .ok_or_else(|| FrameDiffError::IndexColumnNotFound {
                column: name.to_string(),
                table: table.to_string(),
            })?;

        for row in &mut self.rows {
            row.label = Label::from(&row.cells.remove(col_idx));
        }
        self.columns.remove(col_idx);

        if !self.duplicate_labels().is_empty() {
            return Err(FrameDiffError::DuplicateIndex {
                column: name.to_string(),
                table: table.to_string(),
            });
        }

        self.index_name = Some(name.to_string());
        Ok(self)
    }

    /// Keep only the named columns, in the given order
    pub fn select_columns(self, names: &[String]) -> Result<Self> {
        let positions = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| FrameDiffError::Misaligned(format!("no column named '{}'", name)))
            })
            .collect::<Result<Vec<_>>>()?;

        let columns = positions.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let cells = positions.iter().map(|&i| row.cells[i].clone()).collect();
                Row::new(row.label, cells, row.source_line)
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            index_name: self.index_name,
        })
    }

    /// Remove the named columns, keeping the order of the rest
    pub fn drop_columns(self, names: &FxHashSet<String>) -> Self {
        let keep: Vec<bool> = self.columns.iter().map(|c| !names.contains(&c.name)).collect();
        let columns = self
            .columns
            .into_iter()
            .zip(&keep)
            .filter_map(|(c, &k)| k.then_some(c))
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let cells = row
                    .cells
                    .into_iter()
                    .zip(&keep)
                    .filter_map(|(c, &k)| k.then_some(c))
                    .collect();
                Row::new(row.label, cells, row.source_line)
            })
            .collect();

        Self {
            columns,
            rows,
            index_name: self.index_name,
        }
    }

    /// Remove every row whose label is in `labels`
    pub fn drop_rows(mut self, labels: &FxHashSet<Label>) -> Self {
        self.rows.retain(|row| !labels.contains(&row.label));
        self
    }

    /// Overwrite the column names positionally
    pub fn rename_columns(mut self, names: &[String]) -> Self {
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name.clone();
        }
        self
    }

    /// Stable sort of the rows by label, ascending
    pub fn sort_by_label(mut self) -> Self {
        self.rows.sort_by(|a, b| a.label.cmp(&b.label));
        self
    }

    /// Same shape, column sequence, dtypes, label sequence and cell values
    pub fn structurally_equal(&self, other: &Table) -> bool {
        self.columns == other.columns
            && self.row_count() == other.row_count()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.label == b.label && a.cells == b.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("id", vec![CellValue::from("c"), CellValue::from("a"), CellValue::from("b")]),
            ("n", vec![CellValue::Int(3), CellValue::Int(1), CellValue::Int(2)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_infers_and_indexes() {
        let table = sample();
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.dtypes(), vec![DType::Object, DType::Int]);
        assert_eq!(
            table.labels().cloned().collect::<Vec<_>>(),
            vec![Label::Int(0), Label::Int(1), Label::Int(2)]
        );
    }

    #[test]
    fn test_from_columns_rejects_ragged_input() {
        let err = Table::from_columns(vec![
            ("a", vec![CellValue::Int(1)]),
            ("b", vec![CellValue::Int(1), CellValue::Int(2)]),
        ])
        .unwrap_err();
        assert!(matches!(err, FrameDiffError::RaggedColumns { .. }));
    }

    #[test]
    fn test_from_columns_rejects_repeated_names() {
        let err = Table::from_columns(vec![
            ("a", vec![CellValue::Int(1)]),
            ("a", vec![CellValue::Int(2)]),
            ("b", vec![CellValue::Int(3)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            FrameDiffError::DuplicateColumns { ref columns, .. } if columns == "a"
        ));
    }

    #[test]
    fn test_set_index_column() {
        let table = sample().set_index_column("id", "t").unwrap().sort_by_label();
        assert_eq!(table.column_names(), vec!["n".to_string()]);
        assert_eq!(table.index_name.as_deref(), Some("id"));
        assert_eq!(
            table.labels().cloned().collect::<Vec<_>>(),
            vec![Label::from("a"), Label::from("b"), Label::from("c")]
        );
        assert_eq!(table.rows[0].cells, vec![CellValue::Int(1)]);
    }

    #[test]
    fn test_set_index_column_errors() {
        let missing = sample().set_index_column("nope", "t").unwrap_err();
        assert!(matches!(missing, FrameDiffError::IndexColumnNotFound { .. }));

        let table = Table::from_columns(vec![("k", vec![CellValue::Int(1), CellValue::Int(1)])]).unwrap();
        let dup = table.set_index_column("k", "t").unwrap_err();
        assert!(matches!(dup, FrameDiffError::DuplicateIndex { .. }));
    }

    #[test]
    fn test_select_and_drop_columns() {
        let table = sample();
        let reordered = table.clone().select_columns(&["n".into(), "id".into()]).unwrap();
        assert_eq!(reordered.column_names(), vec!["n".to_string(), "id".to_string()]);
        assert_eq!(reordered.rows[0].cells[0], CellValue::Int(3));

        let dropped = table.drop_columns(&FxHashSet::from_iter(["id".to_string()]));
        assert_eq!(dropped.column_names(), vec!["n".to_string()]);
        assert_eq!(dropped.rows[2].cells, vec![CellValue::Int(2)]);
    }

    #[test]
    fn test_null_semantics() {
        assert_eq!(CellValue::Null, CellValue::Null);
        assert!(CellValue::Null.differs(&CellValue::Null));
        assert!(!CellValue::Int(1).differs(&CellValue::Float(1.0)));
        assert!(CellValue::from("1").differs(&CellValue::Int(1)));
    }
}
