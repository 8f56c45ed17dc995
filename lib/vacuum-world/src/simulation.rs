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

//! The tick loop.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::config::SimulationConfig;
use crate::direction::Direction;
use crate::error::VacuumError;
use crate::grid_map::GridMap;
use crate::strategy::Strategy;
use crate::Rng;

/// Consecutive no-op ticks tolerated before a run counts as stalled.
pub const DEFAULT_MAX_CONSECUTIVE_NO_OPS: u32 = 40;

/// Why a simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No dirt left on the grid.
    AllDirtCleaned,

    /// The agent is boxed in by obstacles and the grid edge.
    NoLegalMoves,

    /// The strategy declined to move for too many ticks in a row.
    Stalled,

    /// The configured tick cap was hit.
    TickLimitReached,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::AllDirtCleaned => write!(f, "All dirt cleaned!"),
            Outcome::NoLegalMoves => write!(f, "No legal moves available."),
            Outcome::Stalled => write!(f, "Strategy did not move for too long."),
            Outcome::TickLimitReached => write!(f, "Tick limit reached."),
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,

    /// The strategy's choice. `None` is a no-op.
    pub direction: Option<Direction>,

    /// Whether the agent actually moved.
    pub moved: bool,

    /// Whether the agent cleaned the cell it moved onto.
    pub cleaned: bool,

    /// Set once the simulation has finished.
    pub outcome: Option<Outcome>,
}

/// Counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks executed.
    pub ticks: u64,

    /// Ticks where the agent moved.
    pub moves: u64,

    /// Ticks where the agent did not move.
    pub no_ops: u64,

    /// Cells cleaned, including the start cell.
    pub cells_cleaned: u64,
}

impl std::fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ticks: {}, moves: {}, no-ops: {}, cleaned: {}",
            self.ticks, self.moves, self.no_ops, self.cells_cleaned
        )
    }
}

/// Runs one agent on one grid under a swappable strategy.
///
/// Each tick asks the strategy for a move, performs it and cleans the new cell, then checks, in
/// this order, for [`Outcome::NoLegalMoves`], [`Outcome::Stalled`],
/// [`Outcome::AllDirtCleaned`] and [`Outcome::TickLimitReached`]. After an outcome is reached
/// further ticks change nothing.
pub struct Simulation {
    map: GridMap,
    agent: Agent,
    strategy: Box<dyn Strategy>,
    max_consecutive_no_ops: u32,
    max_ticks: Option<u64>,
    consecutive_no_ops: u32,
    stats: SimulationStats,
    outcome: Option<Outcome>,
}

impl Simulation {
    /// Start a simulation. The agent cleans the cell it is placed on straight away.
    pub fn new(mut map: GridMap, agent: Agent, strategy: Box<dyn Strategy>) -> Self {
        let mut stats = SimulationStats::default();
        if agent.clean_current_spot(&mut map) {
            stats.cells_cleaned += 1;
        }
        Self {
            map,
            agent,
            strategy,
            max_consecutive_no_ops: DEFAULT_MAX_CONSECUTIVE_NO_OPS,
            max_ticks: None,
            consecutive_no_ops: 0,
            stats,
            outcome: None,
        }
    }

    /// Build the world and strategy described by `config`, drawing all randomness from `rng`.
    pub fn from_config(
        config: &SimulationConfig,
        rng: Rc<RefCell<Rng>>,
    ) -> Result<Self, VacuumError> {
        let (map, agent) = config.world.build(&mut rng.borrow_mut())?;
        let strategy = config.strategy.build(rng);
        log::info!(
            "starting {}x{} world with {} dirt, strategy {}",
            map.width(),
            map.height(),
            map.count_remaining_dirt(),
            strategy.name()
        );
        Ok(Self::new(map, agent, strategy)
            .with_max_consecutive_no_ops(config.max_consecutive_no_ops)
            .with_max_ticks(config.max_ticks))
    }

    /// Override the stall threshold. A threshold of 0 is treated as 1.
    pub fn with_max_consecutive_no_ops(mut self, max_consecutive_no_ops: u32) -> Self {
        self.max_consecutive_no_ops = max_consecutive_no_ops.max(1);
        self
    }

    /// Cap the number of ticks.
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// The grid.
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// The agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Name of the active strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// No-op ticks since the last move.
    pub fn consecutive_no_ops(&self) -> u32 {
        self.consecutive_no_ops
    }

    /// Counters so far.
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Set once the simulation has finished.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Replace the active strategy. The grid, the agent and the no-op counter carry over.
    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        log::info!(
            "switching strategy {} -> {}",
            self.strategy.name(),
            strategy.name()
        );
        self.strategy = strategy;
    }

    /// Run one tick.
    pub fn tick(&mut self) -> TickReport {
        if let Some(outcome) = self.outcome {
            return TickReport {
                tick: self.stats.ticks,
                direction: None,
                moved: false,
                cleaned: false,
                outcome: Some(outcome),
            };
        }

        self.stats.ticks += 1;
        let direction = self.strategy.choose_move(&self.agent, &self.map);
        let moved = direction.map_or(false, |d| self.agent.step(d, &self.map));
        let cleaned = moved && self.agent.clean_current_spot(&mut self.map);

        if moved {
            self.stats.moves += 1;
            self.consecutive_no_ops = 0;
        } else {
            self.stats.no_ops += 1;
            self.consecutive_no_ops += 1;
        }
        if cleaned {
            self.stats.cells_cleaned += 1;
        }
        log::debug!(
            "tick {}: {} chose {:?}, agent at {}",
            self.stats.ticks,
            self.strategy.name(),
            direction.map(Direction::name),
            self.agent.position()
        );

        self.outcome = self.check_outcome(moved);
        if let Some(outcome) = self.outcome {
            log::info!("finished after {} ticks: {:?}", self.stats.ticks, outcome);
        }
        TickReport {
            tick: self.stats.ticks,
            direction,
            moved,
            cleaned,
            outcome: self.outcome,
        }
    }

    // a tick that moved the agent can never stall the run.
    fn check_outcome(&self, moved: bool) -> Option<Outcome> {
        if self.agent.available_moves(&self.map).is_empty() {
            Some(Outcome::NoLegalMoves)
        } else if !moved && self.consecutive_no_ops >= self.max_consecutive_no_ops {
            Some(Outcome::Stalled)
        } else if self.map.count_remaining_dirt() == 0 {
            Some(Outcome::AllDirtCleaned)
        } else if self.max_ticks.map_or(false, |max| self.stats.ticks >= max) {
            Some(Outcome::TickLimitReached)
        } else {
            None
        }
    }

    /// Tick until an outcome is reached.
    pub fn run(&mut self) -> Outcome {
        loop {
            if let Some(outcome) = self.tick().outcome {
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::grid_map::Position;
    use crate::strategy::{
        ExplorationStrategy, RandomStrategy, StrategyKind, SweepStrategy, WaterfallStrategy,
    };

    struct IdleStrategy;

    impl Strategy for IdleStrategy {
        fn name(&self) -> &'static str {
            "idle"
        }

        fn choose_move(&mut self, _agent: &Agent, _map: &GridMap) -> Option<Direction> {
            None
        }
    }

    struct FixedStrategy(Direction);

    impl Strategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn choose_move(&mut self, _agent: &Agent, _map: &GridMap) -> Option<Direction> {
            Some(self.0)
        }
    }

    fn boxed_in_world() -> (GridMap, Agent) {
        let mut map = GridMap::new(5, 5);
        for x in 1..4 {
            for y in 1..4 {
                if (x, y) != (2, 2) {
                    map.add_obstacle(Position::new(x, y));
                }
            }
        }
        map.add_dirt(Position::new(0, 0));
        let agent = Agent::new(&map, Position::new(2, 2)).unwrap();
        (map, agent)
    }

    #[test]
    fn test_waterfall_three_cell_corridor() {
        let mut map = GridMap::new(3, 1);
        map.add_dirt(Position::new(1, 0));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let mut simulation = Simulation::new(map, agent, Box::new(WaterfallStrategy::new()));

        let report = simulation.tick();
        assert_eq!(report.direction, Some(Direction::East));
        assert!(report.moved);
        assert!(report.cleaned);
        assert_eq!(simulation.agent().position(), Position::new(1, 0));
        assert_eq!(simulation.map().count_remaining_dirt(), 0);
        assert_eq!(report.outcome, Some(Outcome::AllDirtCleaned));
    }

    #[test]
    fn test_boxed_in_agent_has_no_legal_moves_for_any_strategy() {
        let rng = Rc::new(RefCell::new(Rng::seed_from_u64(5)));
        for kind in StrategyKind::ALL {
            let (map, agent) = boxed_in_world();
            let mut simulation = Simulation::new(map, agent, kind.build(Rc::clone(&rng)));
            let report = simulation.tick();
            assert_eq!(report.outcome, Some(Outcome::NoLegalMoves), "{}", kind);
            assert_eq!(report.tick, 1);
        }
    }

    #[test]
    fn test_stalls_after_threshold() {
        let mut map = GridMap::new(3, 3);
        map.add_dirt(Position::new(2, 2));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let mut simulation = Simulation::new(map, agent, Box::new(IdleStrategy));

        for tick in 1..DEFAULT_MAX_CONSECUTIVE_NO_OPS as u64 {
            let report = simulation.tick();
            assert_eq!(report.outcome, None, "tick {}", tick);
        }
        assert_eq!(simulation.run(), Outcome::Stalled);
        assert_eq!(simulation.stats().ticks, 40);
        assert_eq!(simulation.stats().no_ops, 40);
    }

    #[test]
    fn test_zero_threshold_never_stalls_a_moving_tick() {
        let mut map = GridMap::new(4, 1);
        map.add_dirt(Position::new(3, 0));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let mut simulation = Simulation::new(map, agent, Box::new(SweepStrategy::new()))
            .with_max_consecutive_no_ops(0);

        for _ in 0..2 {
            let report = simulation.tick();
            assert!(report.moved);
            assert_eq!(report.outcome, None);
        }
        let report = simulation.tick();
        assert!(report.moved);
        assert_eq!(report.outcome, Some(Outcome::AllDirtCleaned));
    }

    #[test]
    fn test_zero_threshold_stalls_on_first_no_op() {
        let mut map = GridMap::new(3, 3);
        map.add_dirt(Position::new(2, 2));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let mut simulation =
            Simulation::new(map, agent, Box::new(IdleStrategy)).with_max_consecutive_no_ops(0);

        let report = simulation.tick();
        assert_eq!(report.outcome, Some(Outcome::Stalled));
        assert_eq!(simulation.stats().ticks, 1);
    }

    #[test]
    fn test_rejected_moves_count_as_no_ops() {
        let mut map = GridMap::new(3, 3);
        map.add_dirt(Position::new(2, 2));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let mut simulation = Simulation::new(map, agent, Box::new(FixedStrategy(Direction::North)))
            .with_max_consecutive_no_ops(3);

        let report = simulation.tick();
        assert_eq!(report.direction, Some(Direction::North));
        assert!(!report.moved);
        assert_eq!(simulation.consecutive_no_ops(), 1);
        assert_eq!(simulation.run(), Outcome::Stalled);
        assert_eq!(simulation.agent().position(), Position::new(0, 0));
    }

    #[test]
    fn test_swap_keeps_no_op_counter_and_world() {
        let mut map = GridMap::new(4, 1);
        map.add_dirt(Position::new(3, 0));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let mut simulation = Simulation::new(map, agent, Box::new(IdleStrategy));

        simulation.tick();
        simulation.tick();
        assert_eq!(simulation.consecutive_no_ops(), 2);

        simulation.set_strategy(Box::new(SweepStrategy::new()));
        assert_eq!(simulation.strategy_name(), "sweep");
        assert_eq!(simulation.consecutive_no_ops(), 2);
        assert_eq!(simulation.agent().position(), Position::new(0, 0));

        assert_eq!(simulation.run(), Outcome::AllDirtCleaned);
        assert_eq!(simulation.stats().moves, 3);
        assert_eq!(simulation.stats().no_ops, 2);
    }

    #[test]
    fn test_tick_limit() {
        // dirt the agent can never reach, and a strategy that never stops moving.
        let mut map = GridMap::new(4, 1);
        map.add_obstacle(Position::new(2, 0));
        map.add_dirt(Position::new(3, 0));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let rng = Rc::new(RefCell::new(Rng::seed_from_u64(1)));
        let mut simulation = Simulation::new(map, agent, Box::new(RandomStrategy::new(rng)))
            .with_max_ticks(Some(100));
        assert_eq!(simulation.run(), Outcome::TickLimitReached);
        assert_eq!(simulation.stats().ticks, 100);
    }

    #[test]
    fn test_finished_simulation_is_frozen() {
        let (map, agent) = boxed_in_world();
        let mut simulation = Simulation::new(map, agent, Box::new(WaterfallStrategy::new()));
        assert_eq!(simulation.run(), Outcome::NoLegalMoves);
        let before = simulation.stats();
        let report = simulation.tick();
        assert_eq!(report.outcome, Some(Outcome::NoLegalMoves));
        assert_eq!(simulation.stats(), before);
    }

    #[test]
    fn test_start_cell_is_cleaned_on_placement() {
        let mut map = GridMap::new(2, 1);
        map.add_dirt(Position::new(0, 0));
        let agent = Agent::new(&map, Position::new(0, 0)).unwrap();
        let simulation = Simulation::new(map, agent, Box::new(IdleStrategy));
        assert_eq!(simulation.map().count_remaining_dirt(), 0);
        assert_eq!(simulation.stats().cells_cleaned, 1);
    }

    #[test]
    fn test_exploration_cleans_open_3x3_from_center() {
        let mut map = GridMap::new(3, 3);
        for x in 0..3 {
            for y in 0..3 {
                map.add_dirt(Position::new(x, y));
            }
        }
        let agent = Agent::new(&map, Position::new(1, 1)).unwrap();
        let mut simulation = Simulation::new(map, agent, Box::new(ExplorationStrategy::new()));
        assert_eq!(simulation.run(), Outcome::AllDirtCleaned);
        assert_eq!(simulation.stats().moves, 8);
        assert_eq!(simulation.stats().cells_cleaned, 9);
    }

    #[test]
    fn test_waterfall_cleans_all_reachable_dirt_from_config() {
        for seed in 0..20 {
            let config = SimulationConfig {
                seed: Some(seed),
                ..SimulationConfig::default()
            };
            let rng = Rc::new(RefCell::new(config.rng()));
            let mut simulation = Simulation::from_config(&config, rng).unwrap();
            let outcome = simulation.run();
            let remaining = simulation.map().count_remaining_dirt();
            // whatever is left must be unreachable.
            let reachable_dirt = crate::distance_field::DistanceField::from_source(
                simulation.map(),
                simulation.agent().position(),
            )
            .nearest(|p| simulation.map().is_dirt(p));
            assert_eq!(reachable_dirt, None, "seed {}: {:?}", seed, outcome);
            if remaining == 0 {
                assert_eq!(outcome, Outcome::AllDirtCleaned);
            }
        }
    }
}
