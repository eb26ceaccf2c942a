//! Grid Positions
//!
//! Integer coordinates on the unbounded board.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A cell on the integer grid.
///
/// Serialized as a two-element array `[x, y]` so that configuration files can
/// list trails and trigger points compactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev norm: the ring of the square this cell sits on.
    pub fn ring(&self) -> u32 {
        self.x.unsigned_abs().max(self.y.unsigned_abs())
    }

    /// Chebyshev distance to another cell.
    pub fn chebyshev(&self, other: Position) -> u32 {
        (*self - other).ring()
    }

    /// True if either coordinate lies outside `[-border, border]`.
    pub fn exceeds(&self, border: u32) -> bool {
        self.ring() > border
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (i32, i32) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(2, -3);
        let b = Position::new(-1, 1);
        assert_eq!(a + b, Position::new(1, -2));
        assert_eq!(a - b, Position::new(3, -4));

        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
    }

    #[test]
    fn test_ring_and_bounds() {
        assert_eq!(Position::ORIGIN.ring(), 0);
        assert_eq!(Position::new(-3, 2).ring(), 3);
        assert!(Position::new(5, 0).exceeds(4));
        assert!(!Position::new(4, -4).exceeds(4));
        assert_eq!(Position::new(1, 1).chebyshev(Position::new(-1, 2)), 2);
    }

    #[test]
    fn test_position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(-2, 7)).unwrap();
        assert_eq!(json, "[-2,7]");

        let parsed: Position = serde_json::from_str("[3,-1]").unwrap();
        assert_eq!(parsed, Position::new(3, -1));
    }
}
