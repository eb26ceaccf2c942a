//! Alarm Components
//!
//! Zone watchers that escalate guard tempo once tripped.

use escape_events::Position;
use serde::{Deserialize, Serialize};

use super::guard::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    #[default]
    Armed,
    Triggered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    /// Trips when any guard stands inside the zone
    Center { zone: Zone },
    /// Trips when the escapee stands exactly on the trigger point
    Quartile { point: Position, zone_border: u32 },
}

#[derive(Debug, Clone)]
pub struct Alarm {
    label: String,
    kind: AlarmKind,
    state: AlarmState,
}

impl Alarm {
    pub fn center(center: Position, zone_border: u32) -> Self {
        Self {
            label: "center".to_string(),
            kind: AlarmKind::Center {
                zone: Zone {
                    center,
                    border: zone_border,
                },
            },
            state: AlarmState::Armed,
        }
    }

    /// `quadrant` is 1-based and only used for the label.
    pub fn quartile(quadrant: usize, point: Position, zone_border: u32) -> Self {
        Self {
            label: format!("quartile_{}", quadrant),
            kind: AlarmKind::Quartile { point, zone_border },
            state: AlarmState::Armed,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &AlarmKind {
        &self.kind
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn is_triggered(&self) -> bool {
        self.state == AlarmState::Triggered
    }

    pub fn is_quartile(&self) -> bool {
        matches!(self.kind, AlarmKind::Quartile { .. })
    }

    /// The region this alarm watches; for quartile alarms, the square around
    /// the trigger point that a redirected teleporter jumps into.
    pub fn zone(&self) -> Zone {
        match self.kind {
            AlarmKind::Center { zone } => zone,
            AlarmKind::Quartile { point, zone_border } => Zone {
                center: point,
                border: zone_border,
            },
        }
    }

    /// Checks guard positions. Returns true only on the Armed -> Triggered
    /// transition. Quartile alarms ignore guards.
    pub fn observe_guards(&mut self, guards: impl IntoIterator<Item = Position>) -> bool {
        let AlarmKind::Center { zone } = self.kind else {
            return false;
        };
        let tripped = guards
            .into_iter()
            .any(|g| (g - zone.center).ring() <= zone.border);
        tripped && self.trigger()
    }

    /// Checks the escapee's position. Returns true only on the
    /// Armed -> Triggered transition. Center alarms ignore the escapee.
    pub fn observe_evader(&mut self, evader: Position) -> bool {
        let AlarmKind::Quartile { point, .. } = self.kind else {
            return false;
        };
        evader == point && self.trigger()
    }

    fn trigger(&mut self) -> bool {
        if self.state == AlarmState::Triggered {
            return false;
        }
        self.state = AlarmState::Triggered;
        true
    }

    pub fn reset(&mut self) {
        self.state = AlarmState::Armed;
    }
}
