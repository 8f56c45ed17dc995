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

//! Simulation configuration, loadable from TOML.
//!
//! Every field is optional in the file. Missing fields take the values from `Default`:
//!
//! ```toml
//! strategy = "waterfall"
//! max_consecutive_no_ops = 40
//! seed = 42
//! tick_delay_ms = 120
//!
//! [world]
//! width = 10
//! height = 10
//! random_obstacles = 15
//! random_dirt = 20
//! start = { x = 0, y = 0 }
//! obstacles = [{ x = 3, y = 3 }]
//! dirt = [{ x = 9, y = 9 }]
//! ```

use std::path::Path;
use std::time::Duration;

use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::VacuumError;
use crate::grid_map::{GridMap, Position};
use crate::simulation::DEFAULT_MAX_CONSECUTIVE_NO_OPS;
use crate::strategy::StrategyKind;
use crate::Rng;

/// How to build the grid and where the agent starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width.
    pub width: usize,

    /// Grid height.
    pub height: usize,

    /// Obstacles placed at random, never on the start cell.
    pub random_obstacles: usize,

    /// Dirt placed at random on cells that are still empty.
    pub random_dirt: usize,

    /// Obstacles at fixed positions, placed first.
    pub obstacles: Vec<Position>,

    /// Dirt at fixed positions, placed after the fixed obstacles and never on top of one.
    pub dirt: Vec<Position>,

    /// Where the agent starts.
    pub start: Position,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            random_obstacles: 15,
            random_dirt: 20,
            obstacles: Vec::new(),
            dirt: Vec::new(),
            start: Position::new(0, 0),
        }
    }
}

impl WorldConfig {
    /// Build the grid and place the agent.
    pub fn build(&self, rng: &mut Rng) -> Result<(GridMap, Agent), VacuumError> {
        if self.width == 0 || self.height == 0 {
            return Err(VacuumError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let mut map = GridMap::new(self.width, self.height);
        for &pos in &self.obstacles {
            map.add_obstacle(pos);
        }
        for &pos in &self.dirt {
            if !map.is_obstacle(pos) {
                map.add_dirt(pos);
            }
        }
        map.place_random_obstacles_avoiding(self.random_obstacles, &[self.start], rng);
        map.place_random_dirt(self.random_dirt, rng);

        let agent = Agent::new(&map, self.start)?;
        Ok((map, agent))
    }
}

/// Everything needed to set up and run a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// The world to clean.
    pub world: WorldConfig,

    /// Strategy active at the start.
    pub strategy: StrategyKind,

    /// Consecutive no-op ticks after which the run counts as stalled. 0 is treated as 1.
    pub max_consecutive_no_ops: u32,

    /// Hard cap on the number of ticks. Unlimited if unset.
    pub max_ticks: Option<u64>,

    /// Seed for world generation and the random strategy. Drawn from OS entropy if unset.
    pub seed: Option<u64>,

    /// Pause between ticks for interactive drivers.
    pub tick_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            strategy: StrategyKind::default(),
            max_consecutive_no_ops: DEFAULT_MAX_CONSECUTIVE_NO_OPS,
            max_ticks: None,
            seed: None,
            tick_delay_ms: 120,
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, VacuumError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VacuumError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// A random source seeded from `seed`, or from OS entropy.
    pub fn rng(&self) -> Rng {
        match self.seed {
            Some(seed) => Rng::seed_from_u64(seed),
            None => Rng::from_entropy(),
        }
    }

    /// [`SimulationConfig::tick_delay_ms`] as a `Duration`.
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::grid_map::Cell;
    use crate::simulation::{Outcome, Simulation};

    #[test]
    fn test_empty_toml_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.max_consecutive_no_ops, 40);
        assert_eq!(config.strategy, StrategyKind::Waterfall);
    }

    #[test]
    fn test_partial_toml() {
        let config = SimulationConfig::from_toml_str(
            r#"
            strategy = "exploration"
            seed = 7

            [world]
            width = 4
            height = 3
            start = { x = 1, y = 2 }
            obstacles = [{ x = 0, y = 0 }]
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, StrategyKind::Exploration);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.world.width, 4);
        assert_eq!(config.world.random_dirt, 20);
        assert_eq!(config.world.start, Position::new(1, 2));
        assert_eq!(config.world.obstacles, vec![Position::new(0, 0)]);
        assert_eq!(config.tick_delay(), Duration::from_millis(120));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(
            SimulationConfig::from_toml_str("strategy = \"teleport\""),
            Err(VacuumError::ConfigParse(_))
        ));
        assert!(matches!(
            SimulationConfig::load("/definitely/not/here.toml"),
            Err(VacuumError::ConfigRead(_))
        ));
    }

    #[test]
    fn test_build_places_fixed_then_random() {
        let world = WorldConfig {
            width: 4,
            height: 4,
            random_obstacles: 3,
            random_dirt: 5,
            obstacles: vec![Position::new(3, 3)],
            dirt: vec![Position::new(3, 3), Position::new(2, 2)],
            start: Position::new(0, 0),
        };
        let mut rng = Rng::seed_from_u64(3);
        let (map, agent) = world.build(&mut rng).unwrap();
        assert_eq!(agent.position(), Position::new(0, 0));
        assert!(map.is_obstacle(Position::new(3, 3)), "dirt never covers an obstacle");
        assert!(map.is_dirt(Position::new(2, 2)));
        assert_eq!(map.count(Cell::Obstacle), 4);
        assert_eq!(map.count_remaining_dirt(), 6);
    }

    #[test]
    fn test_build_never_blocks_start() {
        let world = WorldConfig {
            width: 3,
            height: 3,
            random_obstacles: 100,
            random_dirt: 0,
            start: Position::new(1, 1),
            ..WorldConfig::default()
        };
        let mut rng = Rng::seed_from_u64(11);
        let (map, agent) = world.build(&mut rng).unwrap();
        assert_eq!(map.count(Cell::Obstacle), 8);
        assert_eq!(agent.position(), Position::new(1, 1));
    }

    #[test]
    fn test_build_rejects_bad_world() {
        let mut rng = Rng::seed_from_u64(0);
        let empty = WorldConfig {
            width: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            empty.build(&mut rng),
            Err(VacuumError::InvalidDimensions { .. })
        ));

        let blocked = WorldConfig {
            obstacles: vec![Position::new(0, 0)],
            ..WorldConfig::default()
        };
        assert!(matches!(
            blocked.build(&mut rng),
            Err(VacuumError::InvalidStart { x: 0, y: 0 })
        ));
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = SimulationConfig {
            seed: Some(99),
            ..SimulationConfig::default()
        };
        let (a, _) = config.world.build(&mut config.rng()).unwrap();
        let (b, _) = config.world.build(&mut config.rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_no_op_threshold_does_not_stop_a_moving_agent() {
        let config = SimulationConfig::from_toml_str(
            r#"
            strategy = "sweep"
            max_consecutive_no_ops = 0
            seed = 3

            [world]
            width = 4
            height = 1
            random_obstacles = 0
            random_dirt = 0
            dirt = [{ x = 3, y = 0 }]
            "#,
        )
        .unwrap();
        let rng = Rc::new(RefCell::new(config.rng()));
        let mut simulation = Simulation::from_config(&config, rng).unwrap();

        let report = simulation.tick();
        assert!(report.moved);
        assert_eq!(report.outcome, None);
        assert_eq!(simulation.run(), Outcome::AllDirtCleaned);
    }
}
