//! JSON output format

use std::io::Write;

use serde::Serialize;

use crate::compare::Reconciliation;
use crate::diff::Verdict;
use crate::error::Result;
use crate::report::{Event, EventLog, Reporter};

use super::ReportSink;

/// Collects events and writes a single JSON document once the run is over
pub struct JsonOutput<W> {
    log: EventLog,
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            log: EventLog::new(),
            writer,
            pretty: true,
        }
    }

    pub fn compact(writer: W) -> Self {
        Self {
            pretty: false,
            ..Self::new(writer)
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    shape: (usize, usize),
    verdict: &'a Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    exported: Option<String>,
    events: &'a [Event],
}

impl<W: Write> Reporter for JsonOutput<W> {
    fn report(&mut self, event: &Event) {
        self.log.report(event);
    }
}

impl<W: Write> ReportSink for JsonOutput<W> {
    fn finish(&mut self, outcome: &Reconciliation) -> Result<()> {
        let summary = JsonSummary {
            shape: outcome.diff.shape(),
            verdict: &outcome.verdict,
            exported: outcome.exported.as_ref().map(|p| p.display().to_string()),
            events: &self.log.events,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &summary)?;
        } else {
            serde_json::to_writer(&mut self.writer, &summary)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}
