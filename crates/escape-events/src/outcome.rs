//! Run Outcomes
//!
//! Terminal outcome of a single run and the tally kept across a batch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The escapee shared a cell with a guard, or was cornered.
    Caught,
    /// The escapee crossed the border.
    Escaped,
    /// A caller-imposed tick limit was reached first.
    Timeout,
}

impl RunOutcome {
    /// Numeric result code: 0 caught, 1 escaped, 2 timeout.
    pub fn code(&self) -> u8 {
        match self {
            RunOutcome::Caught => 0,
            RunOutcome::Escaped => 1,
            RunOutcome::Timeout => 2,
        }
    }

    pub fn all() -> &'static [RunOutcome] {
        &[RunOutcome::Caught, RunOutcome::Escaped, RunOutcome::Timeout]
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunOutcome::Caught => "caught",
            RunOutcome::Escaped => "escaped",
            RunOutcome::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// Outcome counts over a batch of runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub caught: u64,
    pub escaped: u64,
    pub timed_out: u64,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Caught => self.caught += 1,
            RunOutcome::Escaped => self.escaped += 1,
            RunOutcome::Timeout => self.timed_out += 1,
        }
    }

    pub fn count(&self, outcome: RunOutcome) -> u64 {
        match outcome {
            RunOutcome::Caught => self.caught,
            RunOutcome::Escaped => self.escaped,
            RunOutcome::Timeout => self.timed_out,
        }
    }

    pub fn total(&self) -> u64 {
        self.caught + self.escaped + self.timed_out
    }

    /// Fraction of recorded runs that ended in escape; 0.0 for an empty tally.
    pub fn escape_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.escaped as f64 / n as f64,
        }
    }
}

impl FromIterator<RunOutcome> for OutcomeTally {
    fn from_iter<I: IntoIterator<Item = RunOutcome>>(iter: I) -> Self {
        let mut tally = OutcomeTally::new();
        for outcome in iter {
            tally.record(outcome);
        }
        tally
    }
}
