//! Alarm Setup

use crate::components::Alarm;
use crate::config::{Feature, RunConfig};

/// Create the alarms enabled by the configuration. The center alarm, when
/// present, comes first; quartile alarms follow in trigger-point order.
pub fn create_alarms(config: &RunConfig) -> Vec<Alarm> {
    let mut alarms = Vec::new();

    if config.has(Feature::CenterAlarm) {
        alarms.push(Alarm::center(config.alarms.center, config.alarms.center_border));
    }

    if config.has(Feature::QuartileAlarms) {
        alarms.extend(
            config
                .alarms
                .quartile_points
                .iter()
                .enumerate()
                .map(|(i, &point)| Alarm::quartile(i + 1, point, config.alarms.quartile_border)),
        );
    }

    alarms
}
