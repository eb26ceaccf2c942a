//! Escape Simulation Engine
//!
//! A pursuit-evasion run on an integer grid: one escapee tries to cross the
//! border while guards with distinct movement shapes patrol, pursue and
//! escalate through alarms.

pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{EvaderPolicy, Feature, RunConfig, DEFAULT_CONFIG_PATH};
pub use error::{RunError, SetupError, SimError};
pub use escape_events::{CaptureCause, EventKind, OutcomeTally, Position, RunOutcome, SimEvent};
pub use simulation::{run_batch, run_seeded, RunReport, Simulation};
