//! Agent Body
//!
//! Position and border bookkeeping shared by the escapee and every guard.

use escape_events::Position;

use crate::geometry;

/// Where an agent stands and whether it has ever crossed its border.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Half-width of the square the agent must stay in; `None` is unbounded
    border: Option<u32>,
    location: Position,
    /// Sticky: set by the first move that leaves the border square
    out_of_bounds: bool,
}

impl Body {
    pub fn new(location: Position, border: Option<u32>) -> Self {
        Self {
            border,
            location,
            out_of_bounds: false,
        }
    }

    pub fn location(&self) -> Position {
        self.location
    }

    pub fn loc_x(&self) -> i32 {
        self.location.x
    }

    pub fn loc_y(&self) -> i32 {
        self.location.y
    }

    pub fn border(&self) -> Option<u32> {
        self.border
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.out_of_bounds
    }

    /// True if `pos` lies inside this body's border square.
    pub fn contains(&self, pos: Position) -> bool {
        self.border.map_or(true, |b| !pos.exceeds(b))
    }

    /// Relative move. The move is always applied; leaving the border square
    /// only raises the out-of-bounds flag.
    pub fn move_by(&mut self, delta: Position) {
        let target = geometry::add(self.location, delta);
        if !self.contains(target) {
            self.out_of_bounds = true;
        }
        self.location = target;
    }

    pub fn move_x(&mut self, dx: i32) {
        self.move_by(Position::new(dx, 0));
    }

    pub fn move_y(&mut self, dy: i32) {
        self.move_by(Position::new(0, dy));
    }

    /// Absolute reposition. Does not evaluate the border.
    pub fn set_location(&mut self, pos: Position) {
        self.location = pos;
    }

    pub fn neighborhood(&self, radius: u32) -> Vec<Position> {
        geometry::neighborhood(self.location, radius)
    }
}
