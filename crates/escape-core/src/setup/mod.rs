//! Run Setup
//!
//! Builds the escapee, the enabled guards and the alarms for one run.

pub mod agents;
pub mod alarms;

pub use agents::*;
pub use alarms::*;
