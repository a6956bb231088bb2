//! Colored terminal output

use std::fmt::Display;
use std::io::{self, Write};

use indexmap::IndexMap;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compare::Reconciliation;
use crate::diff::Verdict;
use crate::error::Result;
use crate::report::{Event, Reporter, Side};

use super::ReportSink;

/// Human-readable report, written as the events arrive
pub struct TerminalReporter<W> {
    writer: W,
}

impl TerminalReporter<StandardStream> {
    pub fn stdout(color_choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(color_choice))
    }
}

impl<W: WriteColor> TerminalReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        self.writer
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.writer, "{}", text)?;
        self.writer.reset()
    }

    /// "Found differences in the {dim}" plus one block per side that lost values
    fn write_removed<T: Display>(
        &mut self,
        dim: &str,
        only_in_first: &[T],
        only_in_second: &[T],
    ) -> io::Result<()> {
        writeln!(self.writer)?;
        self.write_colored(
            Color::Yellow,
            &format!("Found differences in the {} of the two tables.", dim),
        )?;
        writeln!(self.writer)?;

        for (side, values) in [(Side::First, only_in_first), (Side::Second, only_in_second)] {
            if values.is_empty() {
                continue;
            }
            writeln!(
                self.writer,
                "- {} has {} value(s) in {} that could not be found in the other table and will be removed:",
                side,
                values.len(),
                dim
            )?;
            for value in values {
                writeln!(self.writer, "  - {}", value)?;
            }
        }
        Ok(())
    }

    fn write_event(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Loaded {
                side,
                path,
                rows,
                columns,
            } => writeln!(
                self.writer,
                "- {} loaded from {}, with original shape of ({}, {})",
                side, path, rows, columns
            ),
            Event::Identical { rows, columns } => {
                writeln!(self.writer)?;
                self.write_colored(
                    Color::Green,
                    &format!(
                        "Successfully compared, tables with shape ({}, {}) are identical.",
                        rows, columns
                    ),
                )?;
                writeln!(self.writer)
            }
            Event::ColumnsDropped {
                only_in_first,
                only_in_second,
            } => self.write_removed("columns", only_in_first, only_in_second),
            Event::ColumnsRenamed { from, to } => {
                writeln!(self.writer)?;
                writeln!(
                    self.writer,
                    "Column names of table 2 were replaced by those of table 1:"
                )?;
                for (old, new) in from.iter().zip(to).filter(|(old, new)| old != new) {
                    writeln!(self.writer, "  - {} -> {}", old, new)?;
                }
                Ok(())
            }
            Event::RowsDropped {
                only_in_first,
                only_in_second,
            } => self.write_removed("index", only_in_first, only_in_second),
            Event::DtypeResidual { columns } => {
                writeln!(self.writer)?;
                self.write_colored(
                    Color::Yellow,
                    &format!(
                        "Not possible to enforce dtype identity on following column(s): [{}]. \
                         Process continues with differing dtypes.",
                        columns.join(", ")
                    ),
                )?;
                writeln!(self.writer)
            }
            Event::Compared {
                rows,
                columns,
                verdict,
            } => self.write_verdict(*rows, *columns, verdict),
            Event::Exported { path } => {
                writeln!(self.writer)?;
                writeln!(self.writer, "Output saved to:")?;
                writeln!(self.writer, "{}", path)
            }
        }
    }

    fn write_verdict(&mut self, rows: usize, columns: usize, verdict: &Verdict) -> io::Result<()> {
        writeln!(self.writer)?;
        write!(
            self.writer,
            "Tables successfully compared with shape ({}, {}). ",
            rows, columns
        )?;
        match verdict {
            Verdict::Identical => {
                self.write_colored(Color::Green, "They are identical.")?;
                writeln!(self.writer)
            }
            Verdict::NotIdentical { per_column, .. } => {
                self.write_colored(Color::Red, "They are NOT identical.")?;
                writeln!(self.writer)?;
                writeln!(self.writer)?;
                writeln!(self.writer, "# of differences per column:")?;
                writeln!(self.writer, "{}", counts_table(per_column))
            }
        }
    }
}

impl<W: WriteColor> Reporter for TerminalReporter<W> {
    fn report(&mut self, event: &Event) {
        if let Err(err) = self.write_event(event) {
            tracing::warn!(%err, "failed to write report");
        }
    }
}

impl<W: WriteColor> ReportSink for TerminalReporter<W> {
    fn finish(&mut self, _outcome: &Reconciliation) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn counts_table(per_column: &IndexMap<String, usize>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["column", "differences"]);
    for (name, count) in per_column {
        builder.push_record([name.clone(), count.to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;
    use termcolor::Buffer;

    fn render(events: &[Event]) -> String {
        let mut reporter = TerminalReporter::new(Buffer::no_color());
        for event in events {
            reporter.report(event);
        }
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn test_rows_dropped_lists_each_side() {
        let text = render(&[Event::RowsDropped {
            only_in_first: vec![Label::Int(2)],
            only_in_second: vec![],
        }]);
        assert!(text.contains("Found differences in the index of the two tables."));
        assert!(text.contains("- table 1 has 1 value(s) in index"));
        assert!(text.contains("  - 2\n"));
        assert!(!text.contains("table 2 has"));
    }

    #[test]
    fn test_not_identical_prints_counts() {
        let per_column: IndexMap<String, usize> =
            [("int_2".to_string(), 0), ("string_6".to_string(), 1)].into_iter().collect();
        let text = render(&[Event::Compared {
            rows: 2,
            columns: 6,
            verdict: Verdict::NotIdentical {
                differences: 1,
                per_column,
            },
        }]);
        assert!(text.contains("Tables successfully compared with shape (2, 6). They are NOT identical."));
        assert!(text.contains("string_6"));
        assert!(text.contains("# of differences per column:"));
    }

    #[test]
    fn test_dtype_residual_warning() {
        let text = render(&[Event::DtypeResidual {
            columns: vec!["a".to_string(), "b".to_string()],
        }]);
        assert!(text.contains("following column(s): [a, b]"));
    }
}
