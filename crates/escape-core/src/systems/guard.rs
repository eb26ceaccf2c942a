//! Guard Policies
//!
//! One `step` for every movement shape, and one `pursue` for visibility
//! pursuit. Random steps follow the same recipe: list the relative moves the
//! shape allows, drop any that leave the guard's border, pick uniformly.

use escape_events::Position;
use rand::Rng;
use tracing::trace;

use crate::components::{Guard, GuardKind, Movement};
use crate::error::SimError;
use crate::geometry::{self, DIAGONAL_MOVES, ORTHOGONAL_MOVES};

use super::select::uniform_choice;
use super::sight::{in_view, pursuit_targets};

/// Unit steps along the long leg of an L-shaped jump.
pub const LONG_LEG: i32 = 2;

/// One random move according to the guard's shape.
pub fn step<R: Rng>(guard: &mut Guard, rng: &mut R) -> Result<(), SimError> {
    match guard.kind() {
        GuardKind::Perimeter => {
            let options = perimeter_options(guard)?;
            let delta = options[rng.gen_range(0..2)];
            guard.body.move_by(delta);
        }
        GuardKind::Trail => {
            let (index, target) = trail_options(guard)[rng.gen_range(0..2)];
            set_trail_index(guard, index, target);
        }
        GuardKind::Diagonal => adjacent_step(guard, &DIAGONAL_MOVES, rng),
        GuardKind::Orthogonal => adjacent_step(guard, &ORTHOGONAL_MOVES, rng),
        GuardKind::LShaped => l_shaped_step(guard, rng),
        GuardKind::Teleport => {
            let zone = guard.zone();
            let target = geometry::random_in_square(rng, zone.center, zone.border);
            guard.body.set_location(target);
        }
    }
    trace!(guard = guard.name(), to = %guard.location(), "guard step");
    Ok(())
}

/// Visibility pursuit toward the escapee at `evader`; a random step when the
/// escapee is out of sight or the shape does not pursue.
pub fn pursue<R: Rng>(guard: &mut Guard, evader: Position, rng: &mut R) -> Result<(), SimError> {
    let here = guard.location();
    match guard.kind() {
        GuardKind::Perimeter if in_view(here, evader) => {
            let options = perimeter_options(guard)?;
            let pick = closer(evader, [here + options[0], here + options[1]]);
            guard.body.move_by(options[pick]);
        }
        GuardKind::Trail if in_view(here, evader) => {
            let options = trail_options(guard);
            let pick = closer(evader, [options[0].1, options[1].1]);
            let (index, target) = options[pick];
            set_trail_index(guard, index, target);
        }
        GuardKind::Diagonal | GuardKind::Orthogonal => {
            let template: &[Position] = if guard.kind() == GuardKind::Diagonal {
                &DIAGONAL_MOVES
            } else {
                &ORTHOGONAL_MOVES
            };
            let targets: Vec<Position> = pursuit_targets(here, template, evader)
                .into_iter()
                .filter(|&cell| guard.body.contains(cell))
                .collect();
            match uniform_choice(rng, &targets) {
                Some(target) => guard.body.set_location(target),
                None => return step(guard, rng),
            }
        }
        _ => return step(guard, rng),
    }
    trace!(guard = guard.name(), to = %guard.location(), "guard pursuit");
    Ok(())
}

/// Index (0 or 1) of the candidate nearer to `evader`; ties go to the first.
fn closer(evader: Position, candidates: [Position; 2]) -> usize {
    let d0 = geometry::distance(candidates[0], evader);
    let d1 = geometry::distance(candidates[1], evader);
    usize::from(d1 < d0)
}

/// The two legal relative moves on the perimeter square.
///
/// At a corner these are the two edge directions; along an edge they are
/// forward and back along that edge.
fn perimeter_options(guard: &Guard) -> Result<[Position; 2], SimError> {
    let Movement::Perimeter { radius } = *guard.movement() else {
        unreachable!("perimeter options requested for a {} guard", guard.kind());
    };
    let r = radius as i32;
    let rel = guard.location() - guard.center();

    let options = match (rel.x, rel.y) {
        (x, y) if x == r && y == r => [Position::new(-1, 0), Position::new(0, -1)],
        (x, y) if x == r && y == -r => [Position::new(-1, 0), Position::new(0, 1)],
        (x, y) if x == -r && y == r => [Position::new(1, 0), Position::new(0, -1)],
        (x, y) if x == -r && y == -r => [Position::new(1, 0), Position::new(0, 1)],
        (x, y) if x.abs() == r && y.abs() < r => [Position::new(0, -1), Position::new(0, 1)],
        (x, y) if y.abs() == r && x.abs() < r => [Position::new(-1, 0), Position::new(1, 0)],
        _ => {
            return Err(SimError::OffPerimeter {
                guard: guard.name().to_string(),
                location: guard.location(),
                center: guard.center(),
                radius,
            })
        }
    };
    Ok(options)
}

/// Previous and next trail entries as `(index, cell)`, wrapping around.
fn trail_options(guard: &Guard) -> [(usize, Position); 2] {
    let Movement::Trail { trail, index } = guard.movement() else {
        unreachable!("trail options requested for a {} guard", guard.kind());
    };
    let len = trail.len();
    let prev = (index + len - 1) % len;
    let next = (index + 1) % len;
    [(prev, trail[prev]), (next, trail[next])]
}

fn set_trail_index(guard: &mut Guard, new_index: usize, target: Position) {
    if let Movement::Trail { index, .. } = guard.movement_mut() {
        *index = new_index;
    }
    guard.body.set_location(target);
}

fn adjacent_step<R: Rng>(guard: &mut Guard, moves: &[Position], rng: &mut R) {
    let here = guard.location();
    let targets: Vec<Position> = moves
        .iter()
        .map(|&m| here + m)
        .filter(|&cell| guard.body.contains(cell))
        .collect();
    if let Some(target) = uniform_choice(rng, &targets) {
        guard.body.set_location(target);
    }
}

/// Knight-style jump taken as unit sub-steps, long leg first, so the border
/// is evaluated after every sub-step.
fn l_shaped_step<R: Rng>(guard: &mut Guard, rng: &mut R) {
    let here = guard.location();
    let mut jumps = Vec::with_capacity(8);
    for vertical in [false, true] {
        for long in [-1, 1] {
            for short in [-1, 1] {
                let net = if vertical {
                    Position::new(short, long * LONG_LEG)
                } else {
                    Position::new(long * LONG_LEG, short)
                };
                if guard.body.contains(here + net) {
                    jumps.push((vertical, long, short));
                }
            }
        }
    }

    let Some((vertical, long, short)) = uniform_choice(rng, &jumps) else {
        return;
    };
    for _ in 0..LONG_LEG {
        if vertical {
            guard.body.move_y(long);
        } else {
            guard.body.move_x(long);
        }
    }
    if vertical {
        guard.body.move_x(short);
    } else {
        guard.body.move_y(short);
    }
}
