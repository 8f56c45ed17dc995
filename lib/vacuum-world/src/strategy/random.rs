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

//! Random walk.

use std::cell::RefCell;
use std::rc::Rc;

use rand::seq::SliceRandom;

use crate::agent::Agent;
use crate::direction::Direction;
use crate::grid_map::GridMap;
use crate::strategy::Strategy;
use crate::Rng;

/// Picks uniformly among the currently legal moves.
pub struct RandomStrategy {
    rng: Rc<RefCell<Rng>>,
}

impl RandomStrategy {
    /// Draw from the shared `rng`.
    pub fn new(rng: Rc<RefCell<Rng>>) -> Self {
        Self { rng }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_move(&mut self, agent: &Agent, map: &GridMap) -> Option<Direction> {
        let moves = agent.allowed_moves(map);
        let mut rng = self.rng.borrow_mut();
        moves.choose(&mut *rng).copied()
    }
}
