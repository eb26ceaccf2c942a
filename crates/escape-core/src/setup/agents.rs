//! Agent Spawning
//!
//! Places the escapee and instantiates guards in configuration order.

use escape_events::Position;
use rand::Rng;
use tracing::debug;

use crate::components::{Evader, Guard, GuardKind};
use crate::config::{Feature, RunConfig};
use crate::error::SetupError;

/// Spawn the escapee at its configured start, or the origin.
pub fn spawn_evader(config: &RunConfig) -> Result<Evader, SetupError> {
    let start = config.evader.start.unwrap_or(Position::ORIGIN);
    if start.exceeds(config.border) {
        return Err(SetupError::StartOutOfBounds {
            agent: "escapee".to_string(),
            point: start,
            border: config.border,
        });
    }
    Ok(Evader::new(start, config.border, config.has(Feature::Weapon)))
}

/// Generate a guard name: the kind label, suffixed from the second guard of
/// the same kind onwards.
fn guard_name(kind: GuardKind, ordinal: usize) -> String {
    if ordinal == 0 {
        kind.label().to_string()
    } else {
        format!("{}_{}", kind.label(), ordinal + 1)
    }
}

/// Spawn one guard of `kind`.
pub fn spawn_guard<R: Rng>(
    config: &RunConfig,
    kind: GuardKind,
    name: String,
    rng: &mut R,
) -> Result<Guard, SetupError> {
    let guard = match kind {
        GuardKind::Perimeter => {
            if config.guards.perimeter_radius == 0 {
                return Err(SetupError::ZeroPerimeterRadius);
            }
            Guard::perimeter(name, Position::ORIGIN, config.guards.perimeter_radius, rng)
        }
        GuardKind::Trail => Guard::trail(name, config.guards.trail.clone(), config.border, rng)?,
        GuardKind::Diagonal | GuardKind::Orthogonal | GuardKind::LShaped | GuardKind::Teleport => {
            let Some(guard) = Guard::roaming(name, kind, config.border, None, rng) else {
                unreachable!("{kind} is a roaming guard");
            };
            guard
        }
    };
    debug!(guard = guard.name(), at = %guard.location(), "spawned guard");
    Ok(guard)
}

/// Spawn every enabled guard, in the order listed.
pub fn spawn_guards<R: Rng>(config: &RunConfig, rng: &mut R) -> Result<Vec<Guard>, SetupError> {
    let mut guards = Vec::with_capacity(config.guards.enabled.len());
    for (i, &kind) in config.guards.enabled.iter().enumerate() {
        let ordinal = config.guards.enabled[..i]
            .iter()
            .filter(|&&k| k == kind)
            .count();
        guards.push(spawn_guard(config, kind, guard_name(kind, ordinal), rng)?);
    }
    Ok(guards)
}
