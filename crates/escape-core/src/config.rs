//! Configuration System
//!
//! Run parameters loaded from a TOML file. Every section has defaults, so a
//! partial file (or none at all) reproduces the reference scenario.

use escape_events::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::components::{validate_trail, GuardKind};
use crate::error::SetupError;
use crate::systems::BiasParams;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "escape.toml";

/// Optional behaviours layered on top of the basic walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Escapee moves twice per tick
    #[serde(alias = "sprint")]
    EvaderSprint,
    /// Guards move twice per tick regardless of alarms
    GuardSprint,
    /// Alarm tripped by any guard near the center
    CenterAlarm,
    /// Alarms tripped by the escapee on fixed points, one per quadrant
    QuartileAlarms,
    /// Guards pursue an escapee they can see
    #[serde(alias = "visibility")]
    GuardVisibility,
    /// Escapee carries a single-use weapon
    Weapon,
}

/// How the escapee picks its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaderPolicy {
    #[default]
    Random,
    /// Biased toward the nearest border
    Smart,
    /// Avoids every cell a guard watches
    LineOfSight,
    /// Biased and avoiding watched cells
    Super,
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Half-width of the board; crossing it is an escape
    pub border: u32,
    pub features: BTreeSet<Feature>,
    pub evader: EvaderConfig,
    pub guards: GuardConfig,
    pub alarms: AlarmConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            border: 4,
            features: BTreeSet::new(),
            evader: EvaderConfig::default(),
            guards: GuardConfig::default(),
            alarms: AlarmConfig::default(),
        }
    }
}

/// Escapee settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaderConfig {
    pub policy: EvaderPolicy,
    /// Chance that an armed escapee is still captured on contact
    pub weapon_probability: f64,
    /// Per-ring boost for border-facing cells (smart and super policies)
    pub bias_increment: f64,
    /// Per-ring cut for center-facing cells (smart and super policies)
    pub bias_decrement: f64,
    /// Starting cell; the origin when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
}

impl Default for EvaderConfig {
    fn default() -> Self {
        let bias = BiasParams::default();
        Self {
            policy: EvaderPolicy::Random,
            weapon_probability: 0.1,
            bias_increment: bias.increment,
            bias_decrement: bias.decrement,
            start: None,
        }
    }
}

/// Which guards take part, in update order, and their shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub enabled: Vec<GuardKind>,
    pub perimeter_radius: u32,
    pub trail: Vec<Position>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: GuardKind::all().to_vec(),
            perimeter_radius: 5,
            trail: [
                (1, 1),
                (2, 1),
                (1, 2),
                (2, 2),
                (1, 3),
                (0, 4),
                (0, 3),
                (-1, 2),
                (-1, 1),
                (-1, 0),
                (-1, -1),
                (0, -1),
            ]
            .into_iter()
            .map(Position::from)
            .collect(),
        }
    }
}

/// Alarm placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub center: Position,
    pub center_border: u32,
    /// Trigger points, one alarm each
    pub quartile_points: Vec<Position>,
    /// Half-width of the square a redirected teleporter jumps into
    pub quartile_border: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            center: Position::ORIGIN,
            center_border: 1,
            quartile_points: vec![
                Position::new(-2, -2),
                Position::new(-2, 2),
                Position::new(2, 2),
                Position::new(2, -2),
            ],
            quartile_border: 1,
        }
    }
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SetupError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, SetupError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from `path`, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn bias_params(&self) -> BiasParams {
        BiasParams {
            increment: self.evader.bias_increment,
            decrement: self.evader.bias_decrement,
        }
    }

    /// Rejects configurations no run could start from.
    pub fn validate(&self) -> Result<(), SetupError> {
        let p = self.evader.weapon_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(SetupError::InvalidProbability {
                name: "weapon_probability",
                value: p,
            });
        }

        for (name, value) in [
            ("bias_increment", self.evader.bias_increment),
            ("bias_decrement", self.evader.bias_decrement),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SetupError::InvalidBias { name, value });
            }
        }

        if let Some(start) = self.evader.start {
            if start.exceeds(self.border) {
                return Err(SetupError::StartOutOfBounds {
                    agent: "escapee".to_string(),
                    point: start,
                    border: self.border,
                });
            }
        }

        if self.guards.enabled.contains(&GuardKind::Perimeter) && self.guards.perimeter_radius == 0
        {
            return Err(SetupError::ZeroPerimeterRadius);
        }

        if self.guards.enabled.contains(&GuardKind::Trail) {
            validate_trail(&self.guards.trail, self.border)?;
        }

        Ok(())
    }
}
