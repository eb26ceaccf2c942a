//! Shared event types and serialization for the escape simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod event;
pub mod outcome;
pub mod position;

pub use event::{CaptureCause, EventKind, SimEvent};
pub use outcome::{OutcomeTally, RunOutcome};
pub use position::Position;
