//! Progress and diagnostic events emitted while reconciling

use serde::Serialize;

use crate::diff::Verdict;
use crate::model::Label;

/// Which of the two inputs an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    First,
    Second,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::First => write!(f, "table 1"),
            Side::Second => write!(f, "table 2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Loaded {
        side: Side,
        path: String,
        rows: usize,
        columns: usize,
    },
    /// The early-exit check matched; nothing else ran
    Identical { rows: usize, columns: usize },
    ColumnsDropped {
        only_in_first: Vec<String>,
        only_in_second: Vec<String>,
    },
    ColumnsRenamed { from: Vec<String>, to: Vec<String> },
    RowsDropped {
        only_in_first: Vec<Label>,
        only_in_second: Vec<Label>,
    },
    /// Columns whose dtypes could not be reconciled in either direction
    DtypeResidual { columns: Vec<String> },
    Compared {
        rows: usize,
        columns: usize,
        verdict: Verdict,
    },
    Exported { path: String },
}

/// Write-only sink for [`Event`]s
pub trait Reporter {
    fn report(&mut self, event: &Event);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &Event) {
        (**self).report(event)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, event: &Event) {
        (**self).report(event)
    }
}

/// Keeps every event in order
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Reporter for EventLog {
    fn report(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
