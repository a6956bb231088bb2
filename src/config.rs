//! Configuration handling for framediff

use std::path::PathBuf;

use crate::error::{FrameDiffError, Result};
use crate::normalize::DEFAULT_SENTINEL;

/// Output format for the reconciliation report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Per-table load parameters, given as `key=value` pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadParams {
    /// Field delimiter; sniffed from `, ; \t |` when unset
    pub delimiter: Option<u8>,
    /// Quote character
    pub quote: u8,
    /// First (non-skipped) row holds the column names
    pub has_header: bool,
    /// Lines to skip before the header
    pub skip_rows: usize,
    /// For spreadsheets: which sheet to load
    pub sheet: Option<String>,
}

impl Default for LoadParams {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            has_header: true,
            skip_rows: 0,
            sheet: None,
        }
    }
}

impl LoadParams {
    /// Parse `key=value` pairs.
    ///
    /// Known keys: `sep`/`delimiter`, `quotechar`, `header` (`infer`, `0` or
    /// `none`), `skiprows`, `sheet`/`sheet_name`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| FrameDiffError::InvalidLoadParam {
                key: pair.to_string(),
                reason: "expected key=value".to_string(),
            })?;
            params.set(key.trim(), value.trim())?;
        }
        Ok(params)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |reason: &str| FrameDiffError::InvalidLoadParam {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        let value = value.trim_matches(|c| c == '\'' || c == '"');

        match key.trim_matches(|c| c == '\'' || c == '"') {
            "sep" | "delimiter" => {
                self.delimiter = Some(single_byte(value).ok_or_else(|| invalid("expected a single character"))?);
            }
            "quotechar" => {
                self.quote = single_byte(value).ok_or_else(|| invalid("expected a single character"))?;
            }
            "header" => {
                self.has_header = match value.to_lowercase().as_str() {
                    "infer" | "0" => true,
                    "none" => false,
                    _ => return Err(invalid("expected infer, 0 or none")),
                };
            }
            "skiprows" => {
                self.skip_rows = value.parse().map_err(|_| invalid("expected a row count"))?;
            }
            "sheet" | "sheet_name" => self.sheet = Some(value.to_string()),
            _ => return Err(invalid("unknown parameter")),
        }
        Ok(())
    }

    /// No parameter was given explicitly
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn single_byte(value: &str) -> Option<u8> {
    match value {
        "\\t" | "tab" => Some(b'\t'),
        _ if value.len() == 1 => value.bytes().next(),
        _ => None,
    }
}

/// Configuration for a comparison run
#[derive(Debug, Clone)]
pub struct Config {
    /// Load parameters for the first file
    pub load_params_1: LoadParams,
    /// Load parameters for the second file
    pub load_params_2: LoadParams,
    /// Column to use as row index in both files
    pub index_col: Option<String>,
    /// Replacement for missing cells
    pub sentinel: String,
    /// Output format
    pub output_format: OutputFormat,
    /// Where to write the diff workbook when the inputs have no path
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_params_1: LoadParams::default(),
            load_params_2: LoadParams::default(),
            index_col: None,
            sentinel: DEFAULT_SENTINEL.to_string(),
            output_format: OutputFormat::default(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set load parameters for the first file
    pub fn with_load_params_1(mut self, params: LoadParams) -> Self {
        self.load_params_1 = params;
        self
    }

    /// Set load parameters for the second file
    pub fn with_load_params_2(mut self, params: LoadParams) -> Self {
        self.load_params_2 = params;
        self
    }

    /// Set the shared index column
    pub fn with_index_col(mut self, column: impl Into<String>) -> Self {
        self.index_col = Some(column.into());
        self
    }

    /// Set the missing-value sentinel
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the fallback directory for exported workbooks
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}
