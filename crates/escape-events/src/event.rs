//! Event Types
//!
//! Notable moments of a run, in the order they happened.

use serde::{Deserialize, Serialize};

use crate::Position;

/// How a capture came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureCause {
    /// A guard and the escapee occupied the same cell.
    CoLocation,
    /// Every neighbouring cell was watched, leaving no legal step.
    Cornered,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    AlarmTriggered {
        alarm: String,
        at: Position,
    },
    WeaponUsed {
        guard: String,
        at: Position,
    },
    Captured {
        guard: Option<String>,
        at: Position,
        cause: CaptureCause,
    },
    Escaped {
        at: Position,
    },
    TimedOut {
        at: Position,
    },
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Run identifier (the seed, for replay)
    pub run: u64,
    /// Tick at which the event happened, starting from 0
    pub tick: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl SimEvent {
    pub fn new(run: u64, tick: u64, kind: EventKind) -> Self {
        Self { run, tick, kind }
    }

    /// True for the events that end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Captured { .. } | EventKind::Escaped { .. } | EventKind::TimedOut { .. }
        )
    }

    /// Serializes the event to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
