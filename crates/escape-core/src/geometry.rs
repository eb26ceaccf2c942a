//! Geometry Utilities
//!
//! Pure functions over grid positions. Neighbourhoods are returned in a fixed
//! row-major order so that seeded choices over them are reproducible.

use escape_events::Position;
use rand::Rng;

/// The eight unit moves, row-major from the bottom-left.
pub const KING_MOVES: [Position; 8] = [
    Position::new(-1, -1),
    Position::new(0, -1),
    Position::new(1, -1),
    Position::new(-1, 0),
    Position::new(1, 0),
    Position::new(-1, 1),
    Position::new(0, 1),
    Position::new(1, 1),
];

pub const DIAGONAL_MOVES: [Position; 4] = [
    Position::new(-1, -1),
    Position::new(1, -1),
    Position::new(-1, 1),
    Position::new(1, 1),
];

pub const ORTHOGONAL_MOVES: [Position; 4] = [
    Position::new(0, -1),
    Position::new(-1, 0),
    Position::new(1, 0),
    Position::new(0, 1),
];

/// Component-wise sum.
pub fn add(p1: Position, p2: Position) -> Position {
    p1 + p2
}

/// Euclidean distance. Only used to break ties between candidate moves.
pub fn distance(p1: Position, p2: Position) -> f64 {
    let dx = f64::from(p1.x - p2.x);
    let dy = f64::from(p1.y - p2.y);
    dx.hypot(dy)
}

/// All cells within Chebyshev distance `radius` of `pos`, excluding `pos`.
///
/// Yields `(2 * radius + 1)^2 - 1` cells.
pub fn neighborhood(pos: Position, radius: u32) -> Vec<Position> {
    let r = radius as i32;
    let mut cells = Vec::with_capacity(((2 * r + 1) * (2 * r + 1) - 1).max(0) as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            cells.push(Position::new(pos.x + dx, pos.y + dy));
        }
    }
    cells
}

/// Signed distance from `pos` to the edge of the border square.
///
/// Positive inside, zero on the edge, negative once past it.
pub fn nearest_border_distance(pos: Position, border: u32) -> f64 {
    f64::from(border) - f64::from(pos.ring())
}

/// Points among `points` closest to the border square (all ties kept).
pub fn closest_perimeter_points(points: &[Position], border: u32) -> Vec<Position> {
    extreme_points(points, border, |candidate, best| candidate < best)
}

/// Points among `points` farthest from the border square (all ties kept).
pub fn farthest_perimeter_points(points: &[Position], border: u32) -> Vec<Position> {
    extreme_points(points, border, |candidate, best| candidate > best)
}

fn extreme_points(
    points: &[Position],
    border: u32,
    better: impl Fn(f64, f64) -> bool,
) -> Vec<Position> {
    let mut best: Option<f64> = None;
    let mut chosen = Vec::new();

    for &point in points {
        let d = nearest_border_distance(point, border);
        match best {
            Some(b) if d == b => chosen.push(point),
            Some(b) if !better(d, b) => {}
            _ => {
                best = Some(d);
                chosen.clear();
                chosen.push(point);
            }
        }
    }

    chosen
}

/// Uniform cell of the closed square `[-border, border]^2` offset by `center`.
pub fn random_in_square<R: Rng>(rng: &mut R, center: Position, border: u32) -> Position {
    let b = border as i32;
    Position::new(
        center.x + rng.gen_range(-b..=b),
        center.y + rng.gen_range(-b..=b),
    )
}

/// Uniform non-origin cell of `[-border, border]^2`.
///
/// A zero border has no such cell; the origin is returned.
pub fn random_location<R: Rng>(rng: &mut R, border: u32) -> Position {
    if border == 0 {
        return Position::ORIGIN;
    }
    loop {
        let loc = random_in_square(rng, Position::ORIGIN, border);
        if loc != Position::ORIGIN {
            return loc;
        }
    }
}
