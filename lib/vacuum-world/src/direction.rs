/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! The eight compass directions the agent can move in.

use crate::error::VacuumError;
use crate::grid_map::Position;

/// Compass direction. North is `-y`, east is `+x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `(1, 0)`
    East,
    /// `(-1, 0)`
    West,
    /// `(0, 1)`
    South,
    /// `(0, -1)`
    North,
    /// `(1, 1)`
    SouthEast,
    /// `(1, -1)`
    NorthEast,
    /// `(-1, 1)`
    SouthWest,
    /// `(-1, -1)`
    NorthWest,
}

impl Direction {
    /// All directions. This order is the tie-break order wherever moves are ranked.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
        Direction::SouthEast,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// The four axis-aligned directions, clockwise from north.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit `(dx, dy)` offset.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
            Direction::SouthEast => (1, 1),
            Direction::NorthEast => (1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Short name, e.g. `"NE"`.
    pub fn name(self) -> &'static str {
        match self {
            Direction::East => "E",
            Direction::West => "W",
            Direction::South => "S",
            Direction::North => "N",
            Direction::SouthEast => "SE",
            Direction::NorthEast => "NE",
            Direction::SouthWest => "SW",
            Direction::NorthWest => "NW",
        }
    }

    /// Where a single step from `from` lands.
    pub fn apply(self, from: Position) -> Position {
        let (dx, dy) = self.delta();
        from.offset(dx, dy)
    }

    /// The direction of a single step from `from` to `to`, if they are neighbours.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let delta = (to.x - from.x, to.y - from.y);
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// case-insensitive, surrounding whitespace ignored.
impl std::str::FromStr for Direction {
    type Err = VacuumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == upper)
            .ok_or_else(|| VacuumError::UnknownDirection(s.to_string()))
    }
}
