//! End-to-end reconciliation: resolve inputs, load, normalize, align, diff,
//! and optionally export the difference grid.

use std::path::{Path, PathBuf};

use crate::align::StructuralAligner;
use crate::config::Config;
use crate::decision::{DecisionProvider, Scenario};
use crate::diff::{DiffEngine, DiffMatrix, Verdict};
use crate::error::{FrameDiffError, Result};
use crate::export::Exporter;
use crate::model::Table;
use crate::normalize::impute_missing_values;
use crate::parser::ParserFactory;
use crate::report::{Event, Reporter, Side};

/// One side of a comparison: a file to load or a table already in memory
#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Table(Table),
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<Table> for Source {
    fn from(table: Table) -> Self {
        Source::Table(table)
    }
}

/// Two inputs of the same kind
#[derive(Debug, Clone)]
pub enum ComparisonInput {
    Paths(PathBuf, PathBuf),
    Tables(Table, Table),
}

impl ComparisonInput {
    /// Pair two sources; mixing a path with a table is an error
    pub fn from_sources(first: impl Into<Source>, second: impl Into<Source>) -> Result<Self> {
        match (first.into(), second.into()) {
            (Source::Path(a), Source::Path(b)) => Ok(ComparisonInput::Paths(a, b)),
            (Source::Table(a), Source::Table(b)) => Ok(ComparisonInput::Tables(a, b)),
            _ => Err(FrameDiffError::InvalidInputPair),
        }
    }

    /// First input path, if the inputs are files
    pub fn anchor(&self) -> Option<&Path> {
        match self {
            ComparisonInput::Paths(first, _) => Some(first),
            ComparisonInput::Tables(..) => None,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub diff: DiffMatrix,
    /// Table 1 as compared, after normalization and alignment
    pub table_1: Table,
    /// Table 2 as compared, after normalization and alignment
    pub table_2: Table,
    pub verdict: Verdict,
    /// Where the difference grid was saved, if it was
    pub exported: Option<PathBuf>,
}

/// Align two in-memory tables and compare them cell by cell.
///
/// No loading, normalization, or export happens here.
pub fn reconcile(
    t1: Table,
    t2: Table,
    decider: &mut dyn DecisionProvider,
    reporter: &mut dyn Reporter,
) -> Result<Reconciliation> {
    let alignment = StructuralAligner::new(decider, reporter).align(t1, t2)?;

    if alignment.already_identical {
        return Ok(Reconciliation {
            diff: DiffMatrix::all_equal(&alignment.table_1),
            table_1: alignment.table_1,
            table_2: alignment.table_2,
            verdict: Verdict::Identical,
            exported: None,
        });
    }

    let diff = DiffEngine::compare(&alignment.table_1, &alignment.table_2)?;
    let verdict = diff.verdict();
    let (rows, columns) = diff.shape();
    reporter.report(&Event::Compared {
        rows,
        columns,
        verdict: verdict.clone(),
    });

    Ok(Reconciliation {
        diff,
        table_1: alignment.table_1,
        table_2: alignment.table_2,
        verdict,
        exported: None,
    })
}

/// A configured comparison run
pub struct Comparison {
    config: Config,
    factory: ParserFactory,
}

impl Comparison {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            factory: ParserFactory::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline on `input`
    pub fn run(
        &self,
        input: ComparisonInput,
        decider: &mut dyn DecisionProvider,
        reporter: &mut dyn Reporter,
        exporter: &mut dyn Exporter,
    ) -> Result<Reconciliation> {
        let anchor = input.anchor().map(Path::to_path_buf);
        let (t1, t2) = self.load(input, decider, reporter)?;
        let (t1, t2) = impute_missing_values(t1, t2, &self.config.sentinel);

        let mut outcome = reconcile(t1, t2, decider, reporter)?;

        if !outcome.verdict.is_identical()
            && decider.decide(Scenario::SaveDiffOutput).is_affirmative()
        {
            let path = exporter.export(&outcome.diff, anchor.as_deref())?;
            reporter.report(&Event::Exported {
                path: path.display().to_string(),
            });
            outcome.exported = Some(path);
        }
        Ok(outcome)
    }

    fn load(
        &self,
        input: ComparisonInput,
        decider: &mut dyn DecisionProvider,
        reporter: &mut dyn Reporter,
    ) -> Result<(Table, Table)> {
        match input {
            ComparisonInput::Tables(t1, t2) => Ok((t1, t2)),
            ComparisonInput::Paths(p1, p2) => {
                let format = self.factory.identify_file_format(&p1, &p2)?;
                tracing::debug!(%format, "input format identified");

                let index_col = self.config.index_col.as_deref();
                let t1 = self
                    .factory
                    .load(&p1, &self.config.load_params_1, index_col, decider)?;
                report_loaded(reporter, Side::First, &p1, &t1);
                let t2 = self
                    .factory
                    .load(&p2, &self.config.load_params_2, index_col, decider)?;
                report_loaded(reporter, Side::Second, &p2, &t2);
                Ok((t1, t2))
            }
        }
    }
}

fn report_loaded(reporter: &mut dyn Reporter, side: Side, path: &Path, table: &Table) {
    reporter.report(&Event::Loaded {
        side,
        path: path.display().to_string(),
        rows: table.row_count(),
        columns: table.column_count(),
    });
}
