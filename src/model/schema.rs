//! Column metadata and dtype information

use serde::{Deserialize, Serialize};

use super::table::CellValue;

/// Storage type of a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int,
    Float,
    Date,
    DateTime,
    /// Untyped: strings, sentinels, or any mix the other types cannot hold
    Object,
}

impl DType {
    /// Type of a single non-null cell
    pub fn of(cell: &CellValue) -> Option<DType> {
        match cell {
            CellValue::Null => None,
            CellValue::Bool(_) => Some(DType::Bool),
            CellValue::Int(_) => Some(DType::Int),
            CellValue::Float(_) => Some(DType::Float),
            CellValue::String(_) => Some(DType::Object),
            CellValue::Date(_) => Some(DType::Date),
            CellValue::DateTime(_) => Some(DType::DateTime),
        }
    }

    /// Widen the type to accommodate another type
    pub fn widen(self, other: DType) -> DType {
        if self == other {
            return self;
        }

        match (self, other) {
            (DType::Int, DType::Float) | (DType::Float, DType::Int) => DType::Float,
            (DType::Date, DType::DateTime) | (DType::DateTime, DType::Date) => DType::DateTime,
            _ => DType::Object,
        }
    }

    /// Infer the dtype of a column from its cells.
    ///
    /// Nulls cannot live in an integer or boolean column: an all-null column
    /// is `Float`, ints with nulls widen to `Float`, bools with nulls become
    /// `Object`.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> DType {
        let mut inferred: Option<DType> = None;
        let mut has_null = false;

        for cell in cells {
            match DType::of(cell) {
                None => has_null = true,
                Some(t) => inferred = Some(inferred.map_or(t, |acc| acc.widen(t))),
            }
        }

        match (inferred, has_null) {
            (None, _) => DType::Float,
            (Some(DType::Int), true) => DType::Float,
            (Some(DType::Bool), true) => DType::Object,
            (Some(t), _) => t,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::Int => write!(f, "int64"),
            DType::Float => write!(f, "float64"),
            DType::Date => write!(f, "date"),
            DType::DateTime => write!(f, "datetime"),
            DType::Object => write!(f, "object"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header)
    pub name: String,
    /// Storage type of the column
    pub dtype: DType,
}

impl Column {
    /// Create a new untyped column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: DType::Object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_plain_types() {
        assert_eq!(DType::infer(&[CellValue::Int(1), CellValue::Int(2)]), DType::Int);
        assert_eq!(
            DType::infer(&[CellValue::Int(1), CellValue::Float(2.5)]),
            DType::Float
        );
        assert_eq!(
            DType::infer(&[CellValue::from("a"), CellValue::Int(2)]),
            DType::Object
        );
    }

    #[test]
    fn test_infer_with_nulls() {
        assert_eq!(DType::infer(&[CellValue::Null, CellValue::Null]), DType::Float);
        assert_eq!(DType::infer(&[CellValue::Int(1), CellValue::Null]), DType::Float);
        assert_eq!(
            DType::infer(&[CellValue::Bool(true), CellValue::Null]),
            DType::Object
        );
        assert_eq!(
            DType::infer(&[CellValue::from("x"), CellValue::Null]),
            DType::Object
        );
    }
}
