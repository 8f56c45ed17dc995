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

#![warn(missing_docs)]

//! Grid vacuum world.
//!
//! An agent cleans a bounded 2D grid of obstacles and dirt. Each tick a pluggable [`Strategy`]
//! picks one of the agent's eight compass moves, the agent performs it and cleans the cell it
//! lands on. The [`Simulation`] drives ticks until all dirt is gone, the agent is walled in, or
//! the strategy stops making progress.
//!
//! Rendering, keyboard input and pacing are left to the caller. The engine only exposes
//! read-only state ([`GridMap`], [`Agent`]) for that purpose.
//!
//! See:
//! -  Chapter 2: Intelligent Agents, page 40 (PEAS) and Exercise 2.11 (vacuum world simulator).

pub mod agent;
pub mod config;
pub mod direction;
pub mod distance_field;
pub mod error;
pub mod grid_map;
pub mod simulation;
pub mod strategy;

pub use agent::Agent;
pub use config::{SimulationConfig, WorldConfig};
pub use direction::Direction;
pub use distance_field::DistanceField;
pub use error::VacuumError;
pub use grid_map::{Cell, GridMap, Position};
pub use simulation::{Outcome, Simulation, SimulationStats, TickReport};
pub use strategy::{Strategy, StrategyKind};

/// Random source threaded through world seeding and the random strategy. Seedable so that whole
/// runs can be reproduced.
pub type Rng = rand_pcg::Pcg64;
