//! Components
//!
//! Agent and alarm state: bodies, the escapee, guards, and alarm zones.

pub mod alarm;
pub mod body;
pub mod evader;
pub mod guard;

pub use alarm::{Alarm, AlarmKind, AlarmState};
pub use body::Body;
pub use evader::{AxisBias, Evader, EvaderState};
pub use guard::{validate_trail, Guard, GuardKind, Movement, Zone};
