//! framediff - Reconcile two tabular datasets
//!
//! Loads two tables (CSV-like text, spreadsheets, or JSON records, or tables
//! built in memory), brings them into the same shape on a best-effort basis,
//! and reports which cells differ.

pub mod align;
pub mod compare;
pub mod config;
pub mod decision;
pub mod diff;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod report;

pub use compare::{reconcile, Comparison, ComparisonInput, Reconciliation, Source};
pub use config::{Config, LoadParams};
pub use decision::{Decision, DecisionProvider, Scenario};
pub use diff::{DiffMatrix, Verdict};
pub use error::{FrameDiffError, Result};
pub use model::Table;
pub use report::{Event, Reporter};
