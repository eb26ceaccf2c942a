//! Systems
//!
//! Movement policies for the escapee and the guards, plus the shared
//! visibility and selection helpers they are built from.

pub mod bias;
pub mod evader;
pub mod guard;
pub mod select;
pub mod sight;

pub use bias::{smart_distribution, BiasParams, CellDistribution};
pub use evader::{
    line_of_sight_step, random_delta, random_step, resolve_encounter, smart_step, super_step,
    Encounter, StepOutcome,
};
pub use guard::{pursue, step as guard_step};
pub use select::{uniform_choice, weighted_choice};
pub use sight::{pursuit_targets, unwatched_steps, watched_cells};
