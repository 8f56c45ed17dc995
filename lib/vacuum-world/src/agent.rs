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

//! The vacuum agent: a position on the grid plus the movement rules.

use crate::direction::Direction;
use crate::error::VacuumError;
use crate::grid_map::{GridMap, Position};

/// The vacuum agent.
///
/// The agent does not own the grid, every operation is handed the [`GridMap`] it acts on. It is
/// always on an in-bounds, non-obstacle cell: this is checked in [`Agent::new`] and on every
/// [`Agent::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Agent {
    position: Position,
}

impl Agent {
    /// Place an agent at `start`.
    pub fn new(map: &GridMap, start: Position) -> Result<Self, VacuumError> {
        if !map.is_passable(start) {
            return Err(VacuumError::InvalidStart {
                x: start.x,
                y: start.y,
            });
        }
        Ok(Self { position: start })
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Every direction the agent can legally move in, with its destination, in
    /// [`Direction::ALL`] order.
    pub fn available_moves(&self, map: &GridMap) -> Vec<(Direction, Position)> {
        Direction::ALL
            .into_iter()
            .map(|d| (d, d.apply(self.position)))
            .filter(|&(_, to)| map.is_passable(to))
            .collect()
    }

    /// Just the directions of [`Agent::available_moves`].
    pub fn allowed_moves(&self, map: &GridMap) -> Vec<Direction> {
        self.available_moves(map)
            .into_iter()
            .map(|(d, _)| d)
            .collect()
    }

    /// Move one step. Returns false and stays put if the destination is out of bounds or an
    /// obstacle. Cleaning the new cell is left to the caller.
    pub fn step(&mut self, direction: Direction, map: &GridMap) -> bool {
        let to = direction.apply(self.position);
        if !map.is_passable(to) {
            return false;
        }
        self.position = to;
        true
    }

    /// [`Agent::step`] by direction name. Unknown names are rejected like blocked moves.
    pub fn step_named(&mut self, name: &str, map: &GridMap) -> bool {
        match name.parse::<Direction>() {
            Ok(direction) => self.step(direction, map),
            Err(_) => false,
        }
    }

    /// Clean the cell under the agent if it is dirty. Returns whether anything was cleaned.
    pub fn clean_current_spot(&self, map: &mut GridMap) -> bool {
        map.clean(self.position)
    }
}
