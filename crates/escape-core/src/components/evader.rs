//! Escapee Component
//!
//! The single fleeing agent and its one-way lifecycle.

use escape_events::Position;
use serde::{Deserialize, Serialize};

use super::body::Body;

/// Lifecycle of the escapee within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaderState {
    #[default]
    Running,
    Caught,
    Escaped,
}

/// Per-axis step distributions over `{-1, 0, +1}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBias {
    pub x: [f64; 3],
    pub y: [f64; 3],
}

impl Default for AxisBias {
    fn default() -> Self {
        let third = 1.0 / 3.0;
        Self {
            x: [third; 3],
            y: [third; 3],
        }
    }
}

/// The escapee.
#[derive(Debug, Clone)]
pub struct Evader {
    pub body: Body,
    state: EvaderState,
    weapon: bool,
    bias: AxisBias,
}

impl Evader {
    pub fn new(start: Position, border: u32, weapon: bool) -> Self {
        Self {
            body: Body::new(start, Some(border)),
            state: EvaderState::Running,
            weapon,
            bias: AxisBias::default(),
        }
    }

    pub fn location(&self) -> Position {
        self.body.location()
    }

    pub fn state(&self) -> EvaderState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EvaderState::Running
    }

    pub fn has_weapon(&self) -> bool {
        self.weapon
    }

    /// The weapon is single use.
    pub fn disarm(&mut self) {
        self.weapon = false;
    }

    pub fn bias(&self) -> &AxisBias {
        &self.bias
    }

    pub fn set_bias(&mut self, bias: AxisBias) {
        self.bias = bias;
    }

    /// Running -> Caught. Returns false if the run was already resolved.
    pub fn capture(&mut self) -> bool {
        self.resolve(EvaderState::Caught)
    }

    /// Running -> Escaped. Returns false if the run was already resolved.
    pub fn escape(&mut self) -> bool {
        self.resolve(EvaderState::Escaped)
    }

    fn resolve(&mut self, terminal: EvaderState) -> bool {
        if self.state != EvaderState::Running {
            return false;
        }
        self.state = terminal;
        true
    }
}
