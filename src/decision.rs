//! Binary policy choices the engine cannot make on its own

use std::io::{BufRead, Write};

use serde::Serialize;

/// A point where the engine needs a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Same column count, different names: drop non-overlapping (yes) or
    /// force table 1's names onto table 2 (no)
    ColumnNameMismatch,
    /// Differences were found: persist the diff grid?
    SaveDiffOutput,
    /// A file loaded as a single column: proceed anyway?
    SingleColumnLoad,
}

impl Scenario {
    /// Question shown to a human
    pub fn prompt(self) -> &'static str {
        match self {
            Scenario::ColumnNameMismatch => {
                "The tables have the same number of columns, but their names differ. \
                 Press 'y' to drop the non-overlapping columns for the comparison, \
                 or 'n' to give table 2 the column names of table 1 for a full comparison."
            }
            Scenario::SaveDiffOutput => {
                "Save an XLSX file marking every differing value? \
                 It is written next to the first input file."
            }
            Scenario::SingleColumnLoad => {
                "The loaded table has only one column. You may need different load \
                 parameters. Press 'y' to proceed anyway, 'n' to abort."
            }
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::ColumnNameMismatch => write!(f, "columns-name-mismatch"),
            Scenario::SaveDiffOutput => write!(f, "save-diff-output"),
            Scenario::SingleColumnLoad => write!(f, "single-column-load-ambiguous"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Affirmative,
    Negative,
}

impl Decision {
    pub fn is_affirmative(self) -> bool {
        self == Decision::Affirmative
    }
}

impl From<bool> for Decision {
    fn from(yes: bool) -> Self {
        if yes {
            Decision::Affirmative
        } else {
            Decision::Negative
        }
    }
}

/// How to resolve same-width tables whose column names differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentDecision {
    DropNonOverlapping,
    ForceIdentity,
}

impl From<Decision> for AlignmentDecision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Affirmative => AlignmentDecision::DropNonOverlapping,
            Decision::Negative => AlignmentDecision::ForceIdentity,
        }
    }
}

impl std::str::FromStr for AlignmentDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" | "drop-non-overlapping" => Ok(AlignmentDecision::DropNonOverlapping),
            "force" | "force-identity" => Ok(AlignmentDecision::ForceIdentity),
            _ => Err(format!("Unknown column decision: {}", s)),
        }
    }
}

/// Supplies answers for [`Scenario`]s
pub trait DecisionProvider {
    fn decide(&mut self, scenario: Scenario) -> Decision;
}

impl<F> DecisionProvider for F
where
    F: FnMut(Scenario) -> Decision,
{
    fn decide(&mut self, scenario: Scenario) -> Decision {
        self(scenario)
    }
}

/// Pre-set answers, with one answer for everything left unset
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy {
    pub column_mismatch: Option<Decision>,
    pub save_diff: Option<Decision>,
    pub single_column: Option<Decision>,
    pub default: Decision,
}

impl FixedPolicy {
    /// Answer every scenario with `decision`
    pub fn always(decision: Decision) -> Self {
        Self {
            column_mismatch: None,
            save_diff: None,
            single_column: None,
            default: decision,
        }
    }

    pub fn with_column_mismatch(mut self, decision: AlignmentDecision) -> Self {
        self.column_mismatch = Some(match decision {
            AlignmentDecision::DropNonOverlapping => Decision::Affirmative,
            AlignmentDecision::ForceIdentity => Decision::Negative,
        });
        self
    }

    pub fn with_save_diff(mut self, save: bool) -> Self {
        self.save_diff = Some(save.into());
        self
    }

    pub fn with_single_column(mut self, proceed: bool) -> Self {
        self.single_column = Some(proceed.into());
        self
    }

    fn preset(&self, scenario: Scenario) -> Option<Decision> {
        match scenario {
            Scenario::ColumnNameMismatch => self.column_mismatch,
            Scenario::SaveDiffOutput => self.save_diff,
            Scenario::SingleColumnLoad => self.single_column,
        }
    }
}

impl DecisionProvider for FixedPolicy {
    fn decide(&mut self, scenario: Scenario) -> Decision {
        self.preset(scenario).unwrap_or(self.default)
    }
}

/// Asks a human on a line-oriented reader until it gets `y` or `n`.
///
/// End of input counts as `n`.
pub struct PromptDecider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DecisionProvider for PromptDecider<R, W> {
    fn decide(&mut self, scenario: Scenario) -> Decision {
        loop {
            // A broken terminal is treated like end of input
            if write!(self.output, "\n{} [y/n] ", scenario.prompt())
                .and_then(|_| self.output.flush())
                .is_err()
            {
                return Decision::Negative;
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return Decision::Negative,
                Ok(_) => {}
            }

            match line.trim() {
                "y" | "Y" => return Decision::Affirmative,
                "n" | "N" => return Decision::Negative,
                other => tracing::debug!(answer = other, %scenario, "unrecognised answer, asking again"),
            }
        }
    }
}

/// Preset answers first, a fallback provider (usually a prompt) for the rest
pub struct PolicyThenAsk<D> {
    policy: FixedPolicy,
    fallback: D,
}

impl<D: DecisionProvider> PolicyThenAsk<D> {
    pub fn new(policy: FixedPolicy, fallback: D) -> Self {
        Self { policy, fallback }
    }
}

impl<D: DecisionProvider> DecisionProvider for PolicyThenAsk<D> {
    fn decide(&mut self, scenario: Scenario) -> Decision {
        self.policy
            .preset(scenario)
            .unwrap_or_else(|| self.fallback.decide(scenario))
    }
}
