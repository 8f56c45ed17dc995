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

//! Depth-first exploration of the agent's connected region.
//!
//! The traversal stack is kept explicitly in the strategy rather than on the call stack, one
//! step per tick, so memory is bounded by the number of cells and large grids cannot overflow.

use rustc_hash::FxHashSet;

use crate::agent::Agent;
use crate::direction::Direction;
use crate::grid_map::{GridMap, Position};
use crate::strategy::{step_toward, Strategy};

/// Visits every cell reachable from where the agent starts, depth-first.
///
/// From the current cell it steps to the first unvisited neighbour in [`Direction::CARDINAL`]
/// order, counting the neighbour as visited once the move is chosen. When none is left it walks
/// back along its path to the last cell that still has one. Once the path is empty the region is
/// fully covered and the strategy no-ops.
///
/// Coverage follows 4-connectivity even though the agent can step diagonally, so a cell that is
/// only reachable through a diagonal gap is never visited.
#[derive(Debug, Clone, Default)]
pub struct ExplorationStrategy {
    visited: FxHashSet<Position>,
    visit_order: Vec<Position>,
    path: Vec<Position>,
}

impl ExplorationStrategy {
    /// Nothing visited yet. The agent's cell counts as the first visit on the first call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells in the order they were first visited.
    pub fn visit_order(&self) -> &[Position] {
        &self.visit_order
    }

    /// Whether `pos` has been visited.
    pub fn has_visited(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }

    /// Whether the traversal has finished.
    pub fn is_complete(&self) -> bool {
        !self.visited.is_empty() && self.path.is_empty()
    }

    fn next_unvisited(&self, from: Position, map: &GridMap) -> Option<Direction> {
        Direction::CARDINAL.into_iter().find(|d| {
            let to = d.apply(from);
            map.is_passable(to) && !self.visited.contains(&to)
        })
    }
}

impl Strategy for ExplorationStrategy {
    fn name(&self) -> &'static str {
        "exploration"
    }

    fn choose_move(&mut self, agent: &Agent, map: &GridMap) -> Option<Direction> {
        let here = agent.position();
        if self.visited.insert(here) {
            self.visit_order.push(here);
            self.path.push(here);
        }

        while let Some(&top) = self.path.last() {
            if top == here {
                if let Some(direction) = self.next_unvisited(here, map) {
                    let to = direction.apply(here);
                    self.visited.insert(to);
                    self.visit_order.push(to);
                    self.path.push(to);
                    return Some(direction);
                }
                self.path.pop();
                continue;
            }

            // backtracking. normally `top` is a neighbour, but after a strategy swap the agent
            // may have wandered off the path.
            match step_toward(agent, map, top) {
                Some((direction, _)) => return Some(direction),
                None => {
                    self.path.pop();
                }
            }
        }

        log::debug!(
            "exploration complete: {} cells visited",
            self.visit_order.len()
        );
        None
    }
}
