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

//! S-shaped sweep.

use crate::agent::Agent;
use crate::direction::Direction;
use crate::grid_map::GridMap;
use crate::strategy::Strategy;

/// Runs east along a row until blocked, drops one row south, then runs west, and so on. Stops
/// (no-op) when it can neither continue the row nor drop down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepStrategy {
    going_east: bool,
}

impl Default for SweepStrategy {
    fn default() -> Self {
        Self { going_east: true }
    }
}

impl SweepStrategy {
    /// Start sweeping east.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for SweepStrategy {
    fn name(&self) -> &'static str {
        "sweep"
    }

    fn choose_move(&mut self, agent: &Agent, map: &GridMap) -> Option<Direction> {
        let moves = agent.allowed_moves(map);
        let along_row = if self.going_east {
            Direction::East
        } else {
            Direction::West
        };

        if moves.contains(&along_row) {
            return Some(along_row);
        }
        if moves.contains(&Direction::South) {
            self.going_east = !self.going_east;
            return Some(Direction::South);
        }
        log::debug!("sweep blocked at {}", agent.position());
        None
    }
}
