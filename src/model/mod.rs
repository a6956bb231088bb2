//! Data model for tabular data representation

mod cast;
mod index;
mod schema;
mod table;

pub use cast::{cast_column, parse_temporal};
pub use index::Label;
pub use schema::{Column, DType};
pub use table::{CellValue, Row, Table};
