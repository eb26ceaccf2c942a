//! Border Bias
//!
//! Step distribution for the "smart" escapee: cells nearest the border get an
//! elevated share that grows with distance from the center.
//!
//! The distribution is recomputed from scratch on every call. Nothing is
//! carried between steps except the per-axis marginals the escapee records.

use escape_events::Position;
use rand::Rng;

use crate::components::AxisBias;
use crate::geometry::{self, KING_MOVES};

use super::select::weighted_choice;

/// Baseline share of each of the eight neighbouring cells.
const UNIFORM_SHARE: f64 = 1.0 / 8.0;

/// Probability shifts applied per ring of distance from the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasParams {
    /// Added to each border-facing cell, per ring beyond the first
    pub increment: f64,
    /// Removed from each center-facing cell, per ring beyond the first
    pub decrement: f64,
}

impl Default for BiasParams {
    fn default() -> Self {
        Self {
            increment: 0.04,
            decrement: 0.02,
        }
    }
}

/// Probability for each of the eight unit moves. Always sums to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CellDistribution {
    cells: Vec<(Position, f64)>,
}

impl CellDistribution {
    /// Builds a distribution from raw non-negative weights, normalizing them.
    /// All-zero weights become uniform.
    fn normalized(mut cells: Vec<(Position, f64)>) -> Self {
        let total: f64 = cells.iter().map(|(_, w)| w).sum();
        if total > 0.0 {
            for (_, w) in cells.iter_mut() {
                *w /= total;
            }
        } else {
            let share = 1.0 / cells.len() as f64;
            for (_, w) in cells.iter_mut() {
                *w = share;
            }
        }
        Self { cells }
    }

    pub fn cells(&self) -> &[(Position, f64)] {
        &self.cells
    }

    pub fn probability(&self, delta: Position) -> f64 {
        self.cells
            .iter()
            .find(|(d, _)| *d == delta)
            .map_or(0.0, |(_, w)| *w)
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().map(|(_, w)| w).sum()
    }

    /// Moves carrying the highest probability (all ties kept).
    pub fn favored(&self) -> Vec<Position> {
        let best = self
            .cells
            .iter()
            .map(|(_, w)| *w)
            .fold(f64::NEG_INFINITY, f64::max);
        self.cells
            .iter()
            .filter(|(_, w)| (*w - best).abs() < 1e-12)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Per-axis marginals over `{-1, 0, +1}`.
    pub fn marginals(&self) -> AxisBias {
        let mut bias = AxisBias {
            x: [0.0; 3],
            y: [0.0; 3],
        };
        for (delta, w) in &self.cells {
            bias.x[(delta.x + 1) as usize] += w;
            bias.y[(delta.y + 1) as usize] += w;
        }
        bias
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Position {
        weighted_choice(rng, &self.cells)
            .copied()
            .unwrap_or(Position::ORIGIN)
    }
}

/// Distribution over unit moves from `pos` that favours the nearest border.
///
/// Returns `None` at the origin, where no direction is closer to the border.
pub fn smart_distribution(
    pos: Position,
    border: u32,
    params: BiasParams,
) -> Option<CellDistribution> {
    if pos == Position::ORIGIN {
        return None;
    }

    let targets: Vec<Position> = KING_MOVES.iter().map(|&m| pos + m).collect();
    let toward = geometry::closest_perimeter_points(&targets, border);
    let away = geometry::farthest_perimeter_points(&targets, border);

    let multiplier = f64::from(pos.ring().saturating_sub(1));
    let toward_share = UNIFORM_SHARE + multiplier * params.increment;
    let toward_mass = (toward_share * toward.len() as f64).min(1.0);

    let rest = KING_MOVES.len() - toward.len();
    let rest_share = if rest > 0 {
        (1.0 - toward_mass) / rest as f64
    } else {
        0.0
    };
    let away_share = (rest_share - multiplier * params.decrement).max(0.0);

    let cells = KING_MOVES
        .iter()
        .map(|&delta| {
            let target = pos + delta;
            let weight = if toward.contains(&target) {
                toward_mass / toward.len() as f64
            } else if away.contains(&target) {
                away_share
            } else {
                rest_share
            };
            (delta, weight)
        })
        .collect();

    Some(CellDistribution::normalized(cells))
}
