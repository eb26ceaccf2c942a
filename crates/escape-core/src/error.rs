//! Error Types
//!
//! Setup errors abort a run before its first tick; simulation errors signal
//! an agent state that the movement rules cannot produce.

use escape_events::Position;
use thiserror::Error;

/// Problems found while building a run from its configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("trail is empty")]
    EmptyTrail,

    #[error("trail step {index} from {from} to {to} is not between adjacent cells")]
    InvalidTrail {
        index: usize,
        from: Position,
        to: Position,
    },

    #[error("trail point {point} lies outside border {border}")]
    TrailOutOfBounds { point: Position, border: u32 },

    #[error("{agent} start {point} lies outside border {border}")]
    StartOutOfBounds {
        agent: String,
        point: Position,
        border: u32,
    },

    #[error("perimeter radius must be at least 1")]
    ZeroPerimeterRadius,

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidBias { name: &'static str, value: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Contract violations detected while a run is in progress.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{guard} at {location} is not on the square of radius {radius} around {center}")]
    OffPerimeter {
        guard: String,
        location: Position,
        center: Position,
        radius: u32,
    },
}

/// Anything that can stop a seeded run from producing a report.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
}
