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

//! Vacuum world errors.
//!
//! Rejected moves are not errors, they are reported as `false` by [`crate::Agent::step`]. The
//! variants here cover construction and configuration problems.

/// Vacuum world error.
#[derive(Debug, thiserror::Error)]
pub enum VacuumError {
    /// The agent would start outside the grid or on an obstacle.
    #[error("invalid agent start: ({x}, {y}) is out of bounds or an obstacle")]
    InvalidStart {
        /// Column of the rejected start cell.
        x: i32,
        /// Row of the rejected start cell.
        y: i32,
    },

    /// The grid must have at least one cell.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Direction name is not one of the eight compass directions.
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    /// Strategy name or index is not recognised.
    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),

    /// Configuration file could not be read.
    #[error("failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Configuration file is not valid TOML for a simulation config.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
