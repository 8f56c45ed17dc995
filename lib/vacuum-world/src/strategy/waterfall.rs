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

//! Waterfall: greedy descent towards the nearest dirt.
//!
//! Two breadth-first passes per tick:
//!
//! 1. From the agent, to find the nearest reachable dirt (the target).
//! 2. From the target, to rank the agent's available moves by how close each destination is to
//!    the target.
//!
//! Taking the best-ranked move every tick follows a shortest path to the target without ever
//! storing one. The target is re-picked every tick, so the agent always heads for whatever dirt
//! is nearest right now.

use crate::agent::Agent;
use crate::direction::Direction;
use crate::distance_field::DistanceField;
use crate::grid_map::{GridMap, Position};
use crate::strategy::{step_toward, Strategy};

/// See the module documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaterfallStrategy {}

impl WaterfallStrategy {
    /// Create the strategy. It has no state.
    pub fn new() -> Self {
        Self {}
    }

    /// The nearest dirt reachable from the agent, ties broken by BFS order.
    pub fn select_target(agent: &Agent, map: &GridMap) -> Option<Position> {
        if map.count_remaining_dirt() == 0 {
            return None;
        }
        let from_agent = DistanceField::from_source(map, agent.position());
        from_agent
            .nearest(|pos| map.is_dirt(pos))
            .map(|(pos, _)| pos)
    }
}

impl Strategy for WaterfallStrategy {
    fn name(&self) -> &'static str {
        "waterfall"
    }

    fn choose_move(&mut self, agent: &Agent, map: &GridMap) -> Option<Direction> {
        let Some(target) = Self::select_target(agent, map) else {
            log::debug!("waterfall: no reachable dirt");
            return None;
        };
        match step_toward(agent, map, target) {
            Some((direction, remaining)) => {
                log::debug!(
                    "waterfall: target {}, moving {} ({} steps left after)",
                    target,
                    direction,
                    remaining
                );
                Some(direction)
            }
            None => {
                log::debug!("waterfall: no move gets closer to {}", target);
                None
            }
        }
    }
}
