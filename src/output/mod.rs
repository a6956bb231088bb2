//! Output formatting for reconciliation reports

mod json;
mod terminal;

use termcolor::ColorChoice;

use crate::compare::Reconciliation;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::Reporter;

pub use json::JsonOutput;
pub use terminal::TerminalReporter;

/// A [`Reporter`] that may have something left to write when the run ends
pub trait ReportSink: Reporter {
    fn finish(&mut self, outcome: &Reconciliation) -> Result<()>;
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn finish(&mut self, outcome: &Reconciliation) -> Result<()> {
        (**self).finish(outcome)
    }
}

/// Factory for creating report sinks
pub struct OutputFactory;

impl OutputFactory {
    /// Create a sink writing to stdout in the given format
    pub fn create(format: OutputFormat) -> Box<dyn ReportSink> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalReporter::stdout(ColorChoice::Auto)),
            OutputFormat::Json => Box::new(JsonOutput::new(std::io::stdout())),
        }
    }
}
