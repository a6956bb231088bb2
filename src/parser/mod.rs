//! Parser layer for reading tables from files

mod csv;
mod excel;
mod json;

use std::path::Path;

use crate::config::LoadParams;
use crate::decision::{DecisionProvider, Scenario};
use crate::error::{FrameDiffError, Result};
use crate::model::Table;
use rustc_hash::{FxHashMap, FxHashSet};

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;
pub use self::json::JsonParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table with a positional index
    fn parse(&self, path: &Path, params: &LoadParams) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(ExcelParser), Box::new(JsonParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = extension(path);
        self.parsers
            .iter()
            .find(|p| p.supports_extension(&ext))
            .map(|p| p.as_ref())
            .ok_or(FrameDiffError::UnsupportedFormat(ext))
    }

    /// Both files must share a supported extension
    pub fn identify_file_format(&self, path_1: &Path, path_2: &Path) -> Result<String> {
        let (ext_1, ext_2) = (extension(path_1), extension(path_2));
        if ext_1 != ext_2 {
            return Err(FrameDiffError::FormatMismatch {
                first: ext_1,
                second: ext_2,
            });
        }
        self.get_parser(path_1)?;
        Ok(ext_1)
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, params: &LoadParams) -> Result<Table> {
        if !path.exists() {
            return Err(FrameDiffError::PathNotFound(path.to_path_buf()));
        }
        let parser = self.get_parser(path)?;
        parser.parse(path, params)
    }

    /// Load one input table, ready for the engine.
    ///
    /// A single-column result without explicit parameters asks the decider
    /// whether to go on. With `index_col` set, that column becomes the row
    /// index (it must exist and be unique). The table comes back sorted by
    /// label.
    pub fn load(
        &self,
        path: &Path,
        params: &LoadParams,
        index_col: Option<&str>,
        decider: &mut dyn DecisionProvider,
    ) -> Result<Table> {
        let table = self.parse(path, params)?;
        tracing::info!(path = %path.display(), rows = table.row_count(), columns = table.column_count(), "table loaded");

        if table.column_count() == 1
            && params.is_default()
            && !decider.decide(Scenario::SingleColumnLoad).is_affirmative()
        {
            return Err(FrameDiffError::LoadAborted(path.to_path_buf()));
        }

        let table = match index_col {
            Some(column) => table.set_index_column(column, &path.display().to_string())?,
            None => table,
        };
        Ok(table.sort_by_label())
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Make header names unique: blanks become `Unnamed: i`, repeats get `.1`,
/// `.2`, ... skipping any suffix already taken by another header
pub(crate) fn unique_headers(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let bases: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect();

    let mut taken: FxHashSet<String> = bases.iter().cloned().collect();
    let mut used: FxHashSet<String> = FxHashSet::default();
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    let mut names = Vec::with_capacity(bases.len());
    for base in bases {
        if used.insert(base.clone()) {
            names.push(base);
            continue;
        }
        let count = counts.entry(base.clone()).or_insert(0);
        let unique = loop {
            *count += 1;
            let candidate = format!("{}.{}", base, count);
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(unique.clone());
        used.insert(unique.clone());
        names.push(unique);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;

    #[test]
    fn test_unique_headers() {
        let names = unique_headers(["a".to_string(), "a".to_string(), " ".to_string(), "b".to_string()]);
        assert_eq!(names, vec!["a", "a.1", "Unnamed: 2", "b"]);
    }

    #[test]
    fn test_unique_headers_skips_taken_suffixes() {
        let names = unique_headers(["a", "a", "a.1"].map(String::from));
        assert_eq!(names, vec!["a", "a.2", "a.1"]);

        let names = unique_headers(["x", "x.1", "x", "x"].map(String::from));
        assert_eq!(names, vec!["x", "x.1", "x.2", "x.3"]);
    }

    #[test]
    fn test_identify_file_format() {
        let factory = ParserFactory::new();
        assert_eq!(
            factory
                .identify_file_format(Path::new("a.CSV"), Path::new("b.csv"))
                .unwrap(),
            "csv"
        );
        assert!(matches!(
            factory.identify_file_format(Path::new("a.csv"), Path::new("b.xlsx")),
            Err(FrameDiffError::FormatMismatch { .. })
        ));
        assert!(matches!(
            factory.identify_file_format(Path::new("a.parquet"), Path::new("b.parquet")),
            Err(FrameDiffError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let mut decider = |_: Scenario| Decision::Affirmative;
        let err = ParserFactory::new()
            .load(Path::new("/no/such/file.csv"), &LoadParams::default(), None, &mut decider)
            .unwrap_err();
        assert!(matches!(err, FrameDiffError::PathNotFound(_)));
    }
}
