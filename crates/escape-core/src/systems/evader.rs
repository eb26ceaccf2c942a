//! Escapee Policies
//!
//! Step selection for the escapee plus the weapon roll on contact.

use escape_events::Position;
use rand::Rng;
use tracing::trace;

use crate::components::Evader;

use super::bias::{smart_distribution, BiasParams};
use super::select::uniform_choice;
use super::sight::unwatched_steps;

/// Result of a policy that can leave the escapee without a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved(Position),
    /// Every neighbouring cell was watched; the escapee is now caught
    Cornered,
}

/// Result of sharing a cell with a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    Captured,
    /// The weapon was used up and the escapee fell back to the origin
    Survived,
}

/// A random unit move that is never `(0, 0)`.
///
/// `dx` is uniform over `{-1, 0, 1}`; a zero `dx` forces a non-zero `dy`.
pub fn random_delta<R: Rng>(rng: &mut R) -> Position {
    let dx = rng.gen_range(-1..=1);
    let dy = if dx == 0 {
        if rng.gen_bool(0.5) {
            1
        } else {
            -1
        }
    } else {
        rng.gen_range(-1..=1)
    };
    Position::new(dx, dy)
}

pub fn random_step<R: Rng>(evader: &mut Evader, rng: &mut R) -> Position {
    let delta = random_delta(rng);
    evader.body.move_by(delta);
    trace!(to = %evader.location(), "escapee random step");
    evader.location()
}

/// Biased step toward the nearest border. Falls back to a random step at the
/// origin. Records the per-axis marginals of the distribution it used.
pub fn smart_step<R: Rng>(
    evader: &mut Evader,
    border: u32,
    params: BiasParams,
    rng: &mut R,
) -> Position {
    let Some(dist) = smart_distribution(evader.location(), border, params) else {
        return random_step(evader, rng);
    };

    let delta = dist.sample(rng);
    evader.set_bias(dist.marginals());
    evader.body.move_by(delta);
    trace!(to = %evader.location(), "escapee smart step");
    evader.location()
}

/// Step uniformly into a cell no guard occupies or watches. With no such
/// cell the escapee is caught where it stands.
pub fn line_of_sight_step<R: Rng>(
    evader: &mut Evader,
    watchers: &[Position],
    rng: &mut R,
) -> StepOutcome {
    let options = unwatched_steps(evader.location(), watchers);
    move_or_corner(evader, &options, rng)
}

/// Border-favoured cells that are also unwatched. When none qualify, the
/// plain line-of-sight step is used, never the unconstrained biased one.
pub fn super_step<R: Rng>(
    evader: &mut Evader,
    border: u32,
    params: BiasParams,
    watchers: &[Position],
    rng: &mut R,
) -> StepOutcome {
    let here = evader.location();
    let safe = unwatched_steps(here, watchers);

    let favored: Vec<Position> = match smart_distribution(here, border, params) {
        Some(dist) => {
            evader.set_bias(dist.marginals());
            dist.favored().into_iter().map(|d| here + d).collect()
        }
        // No preferred direction at the origin
        None => safe.clone(),
    };

    let both: Vec<Position> = safe
        .iter()
        .copied()
        .filter(|cell| favored.contains(cell))
        .collect();

    if both.is_empty() {
        move_or_corner(evader, &safe, rng)
    } else {
        move_or_corner(evader, &both, rng)
    }
}

fn move_or_corner<R: Rng>(evader: &mut Evader, options: &[Position], rng: &mut R) -> StepOutcome {
    match uniform_choice(rng, options) {
        Some(target) => {
            let delta = target - evader.location();
            evader.body.move_by(delta);
            trace!(to = %target, "escapee unseen step");
            StepOutcome::Moved(target)
        }
        None => {
            evader.capture();
            StepOutcome::Cornered
        }
    }
}

/// Resolves contact with a guard.
///
/// Unarmed, capture is certain. Armed, capture happens with
/// `capture_probability`; otherwise the weapon is spent and the escapee is
/// sent back to the origin.
pub fn resolve_encounter<R: Rng>(
    evader: &mut Evader,
    capture_probability: f64,
    rng: &mut R,
) -> Encounter {
    if evader.has_weapon() && !rng.gen_bool(capture_probability.clamp(0.0, 1.0)) {
        evader.disarm();
        evader.body.set_location(Position::ORIGIN);
        return Encounter::Survived;
    }
    evader.capture();
    Encounter::Captured
}
