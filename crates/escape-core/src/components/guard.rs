//! Guard Component
//!
//! A single guard type whose movement shape is a tagged value rather than a
//! subclass. Policies that act on these live in `systems::guard`.

use escape_events::Position;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::body::Body;
use crate::error::SetupError;
use crate::geometry;

/// Guard variant tags, as named in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    /// Walks the boundary of a fixed square
    Perimeter,
    /// Walks a fixed list of cells one index at a time
    Trail,
    /// Steps diagonally
    Diagonal,
    /// Steps along the axes
    Orthogonal,
    /// Knight-style jumps
    #[serde(alias = "knight")]
    LShaped,
    /// Jumps anywhere inside its zone
    #[serde(alias = "teleporter")]
    Teleport,
}

impl GuardKind {
    pub fn label(&self) -> &'static str {
        match self {
            GuardKind::Perimeter => "perimeter",
            GuardKind::Trail => "trail",
            GuardKind::Diagonal => "diagonal",
            GuardKind::Orthogonal => "orthogonal",
            GuardKind::LShaped => "l_shaped",
            GuardKind::Teleport => "teleport",
        }
    }

    /// Whether this variant reacts to a nearby escapee when visibility is on.
    pub fn pursues(&self) -> bool {
        !matches!(self, GuardKind::LShaped | GuardKind::Teleport)
    }

    pub fn all() -> &'static [GuardKind] {
        &[
            GuardKind::Perimeter,
            GuardKind::Trail,
            GuardKind::Diagonal,
            GuardKind::Orthogonal,
            GuardKind::LShaped,
            GuardKind::Teleport,
        ]
    }
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Movement shape plus any state the shape needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Movement {
    Perimeter { radius: u32 },
    Trail { trail: Vec<Position>, index: usize },
    Diagonal,
    Orthogonal,
    LShaped,
    Teleport,
}

impl Movement {
    pub fn kind(&self) -> GuardKind {
        match self {
            Movement::Perimeter { .. } => GuardKind::Perimeter,
            Movement::Trail { .. } => GuardKind::Trail,
            Movement::Diagonal => GuardKind::Diagonal,
            Movement::Orthogonal => GuardKind::Orthogonal,
            Movement::LShaped => GuardKind::LShaped,
            Movement::Teleport => GuardKind::Teleport,
        }
    }
}

/// A square region: teleport destinations and alarm zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub center: Position,
    pub border: u32,
}

#[derive(Debug, Clone)]
pub struct Guard {
    name: String,
    pub body: Body,
    center: Position,
    movement: Movement,
    /// Replaces center and border for teleports while an alarm holds it
    redirect: Option<Zone>,
}

impl Guard {
    fn with_movement(name: String, body: Body, center: Position, movement: Movement) -> Self {
        Self {
            name,
            body,
            center,
            movement,
            redirect: None,
        }
    }

    /// Perimeter guard starting on a random corner of its square.
    pub fn perimeter<R: Rng>(
        name: impl Into<String>,
        center: Position,
        radius: u32,
        rng: &mut R,
    ) -> Self {
        let r = radius as i32;
        let corner = Position::new(
            if rng.gen_bool(0.5) { r } else { -r },
            if rng.gen_bool(0.5) { r } else { -r },
        );
        Self::perimeter_at(name, center, radius, center + corner)
    }

    /// Perimeter guard at an explicit cell, which must lie on its square.
    pub fn perimeter_at(
        name: impl Into<String>,
        center: Position,
        radius: u32,
        start: Position,
    ) -> Self {
        let border = radius + center.ring();
        Self::with_movement(
            name.into(),
            Body::new(start, Some(border)),
            center,
            Movement::Perimeter { radius },
        )
    }

    /// Trail guard starting on a random trail point.
    pub fn trail<R: Rng>(
        name: impl Into<String>,
        trail: Vec<Position>,
        border: u32,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        validate_trail(&trail, border)?;
        let index = rng.gen_range(0..trail.len());
        Self::trail_at(name, trail, border, index)
    }

    /// Trail guard starting at `index` (wrapped into range).
    pub fn trail_at(
        name: impl Into<String>,
        trail: Vec<Position>,
        border: u32,
        index: usize,
    ) -> Result<Self, SetupError> {
        validate_trail(&trail, border)?;
        let index = index % trail.len();
        let start = trail[index];
        Ok(Self::with_movement(
            name.into(),
            Body::new(start, Some(border)),
            Position::ORIGIN,
            Movement::Trail { trail, index },
        ))
    }

    /// Free-roaming guard (diagonal, orthogonal, L-shaped or teleport).
    ///
    /// Without a start cell it is placed uniformly anywhere but the origin.
    /// Returns `None` for the patrol kinds, which need a square or a trail.
    pub fn roaming<R: Rng>(
        name: impl Into<String>,
        kind: GuardKind,
        border: u32,
        start: Option<Position>,
        rng: &mut R,
    ) -> Option<Self> {
        let movement = match kind {
            GuardKind::Diagonal => Movement::Diagonal,
            GuardKind::Orthogonal => Movement::Orthogonal,
            GuardKind::LShaped => Movement::LShaped,
            GuardKind::Teleport => Movement::Teleport,
            GuardKind::Perimeter | GuardKind::Trail => return None,
        };
        let start = start.unwrap_or_else(|| geometry::random_location(rng, border));
        Some(Self::with_movement(
            name.into(),
            Body::new(start, Some(border)),
            Position::ORIGIN,
            movement,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GuardKind {
        self.movement.kind()
    }

    pub fn location(&self) -> Position {
        self.body.location()
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub(crate) fn movement_mut(&mut self) -> &mut Movement {
        &mut self.movement
    }

    /// Current trail index, for trail guards.
    pub fn trail_index(&self) -> Option<usize> {
        match &self.movement {
            Movement::Trail { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The square this guard may currently occupy or jump within.
    pub fn zone(&self) -> Zone {
        self.redirect.unwrap_or(Zone {
            center: self.center,
            border: self.body.border().unwrap_or(0),
        })
    }

    pub fn is_redirected(&self) -> bool {
        self.redirect.is_some()
    }

    /// Send this guard's jumps into `zone` until `clear_redirect`.
    pub fn redirect_to(&mut self, zone: Zone) {
        self.redirect = Some(zone);
    }

    pub fn clear_redirect(&mut self) {
        self.redirect = None;
    }
}

/// Checks that a trail is non-empty, inside `border`, and that every
/// consecutive pair of points is Chebyshev-adjacent.
///
/// The wrap from last point back to first is not checked.
pub fn validate_trail(trail: &[Position], border: u32) -> Result<(), SetupError> {
    if trail.is_empty() {
        return Err(SetupError::EmptyTrail);
    }

    if let Some(&point) = trail.iter().find(|p| p.exceeds(border)) {
        return Err(SetupError::TrailOutOfBounds { point, border });
    }

    for (index, pair) in trail.windows(2).enumerate() {
        if pair[0].chebyshev(pair[1]) > 1 {
            return Err(SetupError::InvalidTrail {
                index,
                from: pair[0],
                to: pair[1],
            });
        }
    }

    Ok(())
}
