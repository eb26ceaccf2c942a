//! Statistics Output
//!
//! Aggregates run reports from a batch for printing or JSON export.

use escape_events::{CaptureCause, EventKind, OutcomeTally, RunOutcome};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::simulation::RunReport;

/// Summary of a batch of runs
#[derive(Debug, Clone, Serialize)]
pub struct BatchStats {
    pub runs: u64,
    pub tally: OutcomeTally,
    pub escape_rate: f64,
    pub average_ticks: f64,
    pub longest_run: u64,
    /// Co-location captures per guard name
    pub captures_by_guard: BTreeMap<String, u64>,
    /// Captures with no legal step left
    pub cornered: u64,
    pub weapon_uses: u64,
    /// Times each alarm fired across the batch
    pub alarms_triggered: BTreeMap<String, u64>,
}

/// Collects statistics from finished runs
#[derive(Debug, Default)]
pub struct StatsCollector {
    tally: OutcomeTally,
    total_ticks: u64,
    longest_run: u64,
    captures_by_guard: BTreeMap<String, u64>,
    cornered: u64,
    weapon_uses: u64,
    alarms_triggered: BTreeMap<String, u64>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished run
    pub fn record(&mut self, report: &RunReport) {
        self.tally.record(report.outcome);
        self.total_ticks += report.ticks;
        self.longest_run = self.longest_run.max(report.ticks);

        for event in &report.events {
            match &event.kind {
                EventKind::Captured {
                    guard: Some(guard),
                    cause: CaptureCause::CoLocation,
                    ..
                } => *self.captures_by_guard.entry(guard.clone()).or_insert(0) += 1,
                EventKind::Captured {
                    cause: CaptureCause::Cornered,
                    ..
                } => self.cornered += 1,
                EventKind::WeaponUsed { .. } => self.weapon_uses += 1,
                EventKind::AlarmTriggered { alarm, .. } => {
                    *self.alarms_triggered.entry(alarm.clone()).or_insert(0) += 1
                }
                _ => {}
            }
        }
    }

    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }

    /// Generate final statistics
    pub fn generate_stats(&self) -> BatchStats {
        let runs = self.tally.total();
        let average_ticks = if runs > 0 {
            self.total_ticks as f64 / runs as f64
        } else {
            0.0
        };

        BatchStats {
            runs,
            tally: self.tally.clone(),
            escape_rate: self.tally.escape_rate(),
            average_ticks,
            longest_run: self.longest_run,
            captures_by_guard: self.captures_by_guard.clone(),
            cornered: self.cornered,
            weapon_uses: self.weapon_uses,
            alarms_triggered: self.alarms_triggered.clone(),
        }
    }
}

impl BatchStats {
    /// Plain-text report, one line per outcome.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for &outcome in RunOutcome::all() {
            out.push_str(&format!("{:<8} {}\n", outcome.to_string(), self.tally.count(outcome)));
        }
        out.push_str(&format!("escape rate {:.3}\n", self.escape_rate));
        out.push_str(&format!("average ticks {:.1}\n", self.average_ticks));
        for (guard, count) in &self.captures_by_guard {
            out.push_str(&format!("  caught by {}: {}\n", guard, count));
        }
        if self.cornered > 0 {
            out.push_str(&format!("  cornered: {}\n", self.cornered));
        }
        out
    }
}

/// Write statistics to `path` as pretty JSON
pub fn write_stats(path: impl AsRef<Path>, stats: &BatchStats) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(path, json)?;
    Ok(())
}
