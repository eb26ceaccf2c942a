//! Line of Sight
//!
//! Visibility is neighbourhood intersection: an agent watches the eight cells
//! around it. The escapee avoids watched cells; guards close in on the cells
//! around the escapee.

use escape_events::Position;
use std::collections::HashSet;

use crate::geometry;

/// Every cell occupied or watched by the given guards.
pub fn watched_cells(watchers: &[Position]) -> HashSet<Position> {
    let mut watched = HashSet::with_capacity(watchers.len() * 9);
    for &guard in watchers {
        watched.insert(guard);
        watched.extend(geometry::neighborhood(guard, 1));
    }
    watched
}

/// Cells around `evader` that no guard occupies or watches, in neighbourhood
/// order.
pub fn unwatched_steps(evader: Position, watchers: &[Position]) -> Vec<Position> {
    let watched = watched_cells(watchers);
    geometry::neighborhood(evader, 1)
        .into_iter()
        .filter(|cell| !watched.contains(cell))
        .collect()
}

/// Cells of a guard's sight template (offsets from `guard`) that lie in the
/// escapee's neighbourhood. The escapee's own cell is never a target.
pub fn pursuit_targets(guard: Position, template: &[Position], evader: Position) -> Vec<Position> {
    template
        .iter()
        .map(|&offset| guard + offset)
        .filter(|&cell| in_view(cell, evader))
        .collect()
}

/// True if the escapee stands in one of the eight cells around `guard`.
pub fn in_view(guard: Position, evader: Position) -> bool {
    guard.chebyshev(evader) == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DIAGONAL_MOVES, ORTHOGONAL_MOVES};

    #[test]
    fn test_unwatched_steps_removes_guard_cells() {
        let evader = Position::ORIGIN;
        let guard = Position::new(2, 0);
        let steps = unwatched_steps(evader, &[guard]);

        // Column x = 1 is inside the guard's view
        assert_eq!(steps.len(), 5);
        assert!(steps.iter().all(|s| s.x <= 0));
    }

    #[test]
    fn test_adjacent_guard_cell_is_never_a_step() {
        let steps = unwatched_steps(Position::ORIGIN, &[Position::new(1, 1)]);
        assert!(!steps.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_guard_on_escapee_blocks_everything() {
        assert!(unwatched_steps(Position::new(3, 3), &[Position::new(3, 3)]).is_empty());
    }

    #[test]
    fn test_no_guards_leaves_all_steps() {
        assert_eq!(unwatched_steps(Position::ORIGIN, &[]).len(), 8);
    }

    #[test]
    fn test_pursuit_targets() {
        let guard = Position::ORIGIN;
        let evader = Position::new(2, 1);

        let orthogonal = pursuit_targets(guard, &ORTHOGONAL_MOVES, evader);
        assert_eq!(orthogonal, vec![Position::new(1, 0)]);

        let diagonal = pursuit_targets(guard, &DIAGONAL_MOVES, evader);
        assert_eq!(diagonal, vec![Position::new(1, 1)]);

        let far = pursuit_targets(guard, &ORTHOGONAL_MOVES, Position::new(4, 4));
        assert!(far.is_empty());
    }

    #[test]
    fn test_pursuit_targets_skip_escapee_cell() {
        let evader = Position::new(1, 0);
        let targets = pursuit_targets(Position::ORIGIN, &ORTHOGONAL_MOVES, evader);
        assert_eq!(targets, vec![Position::new(0, -1), Position::new(0, 1)]);
        assert!(!targets.contains(&evader));
    }

    #[test]
    fn test_in_view() {
        assert!(in_view(Position::ORIGIN, Position::new(-1, 1)));
        assert!(!in_view(Position::ORIGIN, Position::ORIGIN));
        assert!(!in_view(Position::ORIGIN, Position::new(2, 0)));
    }
}
