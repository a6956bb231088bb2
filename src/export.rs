//! Persisting the difference grid as a spreadsheet

use std::path::{Path, PathBuf};

use chrono::Local;
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::diff::DiffMatrix;
use crate::error::Result;

/// Name of the single worksheet in an exported workbook
pub const SHEET_NAME: &str = "diff";

/// Writes a [`DiffMatrix`] somewhere and says where
pub trait Exporter {
    /// `anchor` is the first input file, when there is one
    fn export(&mut self, diff: &DiffMatrix, anchor: Option<&Path>) -> Result<PathBuf>;
}

/// Writes `framediff_diff_output_<timestamp>.xlsx` next to the first input,
/// or into a fixed directory when the inputs have no path
#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    output_dir: Option<PathBuf>,
}

impl XlsxExporter {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    /// Directory the workbook goes to
    pub fn target_dir(&self, anchor: Option<&Path>) -> PathBuf {
        let beside_anchor = anchor
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        match (beside_anchor, &self.output_dir) {
            (Some(dir), _) => dir,
            (None, Some(dir)) => dir.clone(),
            (None, None) => PathBuf::from("."),
        }
    }
}

impl Exporter for XlsxExporter {
    fn export(&mut self, diff: &DiffMatrix, anchor: Option<&Path>) -> Result<PathBuf> {
        let path = self.target_dir(anchor).join(output_file_name());
        write_workbook(diff, &path)?;
        tracing::info!(path = %path.display(), "diff grid exported");
        Ok(path)
    }
}

fn output_file_name() -> String {
    format!(
        "framediff_diff_output_{}.xlsx",
        Local::now().format("%Y-%m-%d-%H-%M-%S")
    )
}

/// One header row (index name, then column names), then one row per label
pub fn write_workbook(diff: &DiffMatrix, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let differs_format = Format::new().set_background_color(Color::RGB(0xFFC7CE));

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let index_header = diff.index_name.as_deref().unwrap_or("");
    sheet.write_string_with_format(0, 0, index_header, &header_format)?;
    for (col, name) in diff.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16 + 1, name, &header_format)?;
    }

    for (row, (label, cells)) in diff.labels.iter().zip(&diff.cells).enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, label.to_string())?;
        for (col, &differs) in cells.iter().enumerate() {
            let col = col as u16 + 1;
            if differs {
                sheet.write_boolean_with_format(row, col, differs, &differs_format)?;
            } else {
                sheet.write_boolean(row, col, differs)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
