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

//! Decision policies for the agent.
//!
//! A [`Strategy`] sees the agent and the grid and picks the next move. Like an agent program in
//! the PEAS model it never mutates the world itself; the [`crate::Simulation`] carries the move
//! out.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::direction::Direction;
use crate::distance_field::DistanceField;
use crate::error::VacuumError;
use crate::grid_map::{GridMap, Position};
use crate::Rng;

pub mod exploration;
pub mod random;
pub mod sweep;
pub mod waterfall;

pub use exploration::ExplorationStrategy;
pub use random::RandomStrategy;
pub use sweep::SweepStrategy;
pub use waterfall::WaterfallStrategy;

/// Picks the agent's next move each tick.
///
/// Implementations may keep state between calls (e.g. a sweep direction) but must not assume
/// they saw every previous tick: strategies can be swapped in mid-run.
pub trait Strategy {
    /// Human readable name.
    fn name(&self) -> &'static str;

    /// The next move, or `None` for a no-op.
    fn choose_move(&mut self, agent: &Agent, map: &GridMap) -> Option<Direction>;
}

/// The available strategies, for selecting one by name or menu index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Boustrophedon rows, see [`SweepStrategy`].
    Sweep,

    /// Uniformly random legal moves, see [`RandomStrategy`].
    Random,

    /// Greedy descent towards the nearest dirt, see [`WaterfallStrategy`].
    #[default]
    Waterfall,

    /// Depth-first coverage, see [`ExplorationStrategy`].
    Exploration,
}

impl StrategyKind {
    /// All strategies in menu order.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sweep,
        StrategyKind::Random,
        StrategyKind::Waterfall,
        StrategyKind::Exploration,
    ];

    /// Lowercase name, also accepted by `from_str`.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Sweep => "sweep",
            StrategyKind::Random => "random",
            StrategyKind::Waterfall => "waterfall",
            StrategyKind::Exploration => "exploration",
        }
    }

    /// 1-based position in [`StrategyKind::ALL`].
    pub fn menu_index(self) -> usize {
        match self {
            StrategyKind::Sweep => 1,
            StrategyKind::Random => 2,
            StrategyKind::Waterfall => 3,
            StrategyKind::Exploration => 4,
        }
    }

    /// Build a fresh strategy. Only [`StrategyKind::Random`] uses `rng`.
    pub fn build(self, rng: Rc<RefCell<Rng>>) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Sweep => Box::new(SweepStrategy::new()),
            StrategyKind::Random => Box::new(RandomStrategy::new(rng)),
            StrategyKind::Waterfall => Box::new(WaterfallStrategy::new()),
            StrategyKind::Exploration => Box::new(ExplorationStrategy::new()),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// accepts a name (any case) or a 1-based menu index.
impl std::str::FromStr for StrategyKind {
    type Err = VacuumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted || kind.menu_index().to_string() == wanted)
            .ok_or_else(|| VacuumError::UnknownStrategy(s.to_string()))
    }
}

/// The available move that most reduces the step distance to `target`, with the distance from
/// its destination. Ties go to the first move in [`Direction::ALL`] order. `None` if no
/// neighbour can reach `target`.
pub(crate) fn step_toward(
    agent: &Agent,
    map: &GridMap,
    target: Position,
) -> Option<(Direction, u32)> {
    let to_target = DistanceField::from_source(map, target);
    let mut best: Option<(Direction, u32)> = None;
    for (direction, to) in agent.available_moves(map) {
        if let Some(d) = to_target.distance(to) {
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((direction, d));
            }
        }
    }
    best
}
