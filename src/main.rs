//! framediff - Reconcile two tabular datasets

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use framediff::config::{Config, LoadParams, OutputFormat};
use framediff::decision::{
    AlignmentDecision, Decision, DecisionProvider, FixedPolicy, PolicyThenAsk, PromptDecider,
};
use framediff::export::XlsxExporter;
use framediff::normalize::DEFAULT_SENTINEL;
use framediff::output::{OutputFactory, ReportSink};
use framediff::{Comparison, ComparisonInput};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliColumns {
    /// Drop the columns the tables do not share
    Drop,
    /// Give table 2 the column names of table 1
    Force,
}

impl From<CliColumns> for AlignmentDecision {
    fn from(c: CliColumns) -> Self {
        match c {
            CliColumns::Drop => AlignmentDecision::DropNonOverlapping,
            CliColumns::Force => AlignmentDecision::ForceIdentity,
        }
    }
}

/// Load two tables (CSV, Excel, JSON), align them and report the differing cells
#[derive(Parser, Debug)]
#[command(name = "framediff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the first file
    path_1: PathBuf,

    /// Path to the second file
    path_2: PathBuf,

    /// Load parameter for the first file, e.g. `sep=;` (repeatable)
    #[arg(short = 'l', long = "load-param-1", value_name = "KEY=VALUE")]
    load_params_1: Vec<String>,

    /// Load parameter for the second file, e.g. `header=none` (repeatable)
    #[arg(short = 'L', long = "load-param-2", value_name = "KEY=VALUE")]
    load_params_2: Vec<String>,

    /// Column to use as row index in both files
    #[arg(short, long)]
    index_col: Option<String>,

    /// What to do when equally wide tables have different column names
    #[arg(long, value_enum)]
    columns: Option<CliColumns>,

    /// Save the difference grid as XLSX without asking
    #[arg(long, conflicts_with = "no_save")]
    save: bool,

    /// Never save the difference grid
    #[arg(long)]
    no_save: bool,

    /// Answer every remaining question with yes
    #[arg(short, long)]
    yes: bool,

    /// Replacement for missing cells
    #[arg(long, default_value = DEFAULT_SENTINEL)]
    sentinel: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Directory for the XLSX output when it cannot go next to the first file
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Cli {
    fn policy(&self) -> FixedPolicy {
        let default = if self.yes {
            Decision::Affirmative
        } else {
            Decision::Negative
        };
        let mut policy = FixedPolicy::always(default);
        if let Some(columns) = self.columns {
            policy = policy.with_column_mismatch(columns.into());
        }
        if self.save {
            policy = policy.with_save_diff(true);
        }
        if self.no_save {
            policy = policy.with_save_diff(false);
        }
        policy
    }

    fn decider(&self) -> Box<dyn DecisionProvider> {
        let policy = self.policy();
        if self.yes {
            Box::new(policy)
        } else {
            let prompt = PromptDecider::new(std::io::stdin().lock(), std::io::stderr());
            Box::new(PolicyThenAsk::new(policy, prompt))
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::new()
        .with_load_params_1(
            LoadParams::from_pairs(&cli.load_params_1)
                .context("Invalid load parameters for the first file")?,
        )
        .with_load_params_2(
            LoadParams::from_pairs(&cli.load_params_2)
                .context("Invalid load parameters for the second file")?,
        )
        .with_sentinel(cli.sentinel.clone())
        .with_output_format(cli.format.into());
    if let Some(ref index_col) = cli.index_col {
        config = config.with_index_col(index_col.clone());
    }
    if let Some(ref dir) = cli.output_dir {
        config = config.with_output_dir(dir.clone());
    }

    let input = ComparisonInput::from_sources(cli.path_1.clone(), cli.path_2.clone())?;
    let mut decider = cli.decider();
    let mut sink = OutputFactory::create(config.output_format);
    let mut exporter = XlsxExporter::new(config.output_dir.clone());

    let outcome = Comparison::new(config)
        .run(input, decider.as_mut(), &mut sink, &mut exporter)
        .with_context(|| {
            format!(
                "Failed to compare {} with {}",
                cli.path_1.display(),
                cli.path_2.display()
            )
        })?;

    sink.finish(&outcome)?;
    Ok(())
}
