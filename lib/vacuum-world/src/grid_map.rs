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

//! The grid the agent cleans.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::Rng;

/// A grid coordinate. Signed so that neighbours of edge cells can be expressed and then rejected
/// by [`GridMap::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column, growing east.
    pub x: i32,

    /// Row, growing south.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by `(dx, dy)`. May be out of bounds.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing here.
    Empty,

    /// Dirt waiting to be cleaned.
    Dirt,

    /// Impassable.
    Obstacle,

    /// Was dirt, has been cleaned.
    Cleaned,
}

impl Cell {
    /// Single character used when printing the grid.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Dirt => 'D',
            Cell::Obstacle => '#',
            Cell::Cleaned => 'C',
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Fixed size grid of cells stored row-major in a flat buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

// one row per line, cells separated by spaces.
impl std::fmt::Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity(self.width * 2 * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            for (col, cell) in row.iter().enumerate() {
                s.push(cell.symbol());
                if col < self.width - 1 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        write!(f, "{}", s)
    }
}

impl GridMap {
    /// Create a grid where every cell is [`Cell::Empty`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Width of the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Whether `pos` lies inside `[0, width) x [0, height)`.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// The cell at `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// False outside the grid.
    pub fn is_dirt(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Dirt)
    }

    /// False outside the grid.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Obstacle)
    }

    /// Whether the agent may stand on `pos`.
    pub fn is_passable(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(cell) if cell != Cell::Obstacle)
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Put an obstacle at `pos`, overwriting whatever was there. No-op outside the grid.
    pub fn add_obstacle(&mut self, pos: Position) {
        self.set(pos, Cell::Obstacle);
    }

    /// Put dirt at `pos`, overwriting whatever was there. No-op outside the grid.
    pub fn add_dirt(&mut self, pos: Position) {
        self.set(pos, Cell::Dirt);
    }

    /// Turn dirt at `pos` into [`Cell::Cleaned`]. Returns whether anything changed.
    pub fn clean(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(i) if self.cells[i] == Cell::Dirt => {
                self.cells[i] = Cell::Cleaned;
                true
            }
            _ => false,
        }
    }

    /// Number of cells in the given state.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Number of cells still dirty.
    pub fn count_remaining_dirt(&self) -> usize {
        self.count(Cell::Dirt)
    }

    /// Positions of all dirty cells, row-major.
    pub fn dirt_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == Cell::Dirt)
            .map(|(i, _)| self.position_of(i))
            .collect()
    }

    /// Place up to `count` obstacles on distinct empty cells chosen uniformly at random. Returns
    /// how many were placed.
    pub fn place_random_obstacles(&mut self, count: usize, rng: &mut Rng) -> usize {
        self.place_random(Cell::Obstacle, count, &[], rng)
    }

    /// Like [`GridMap::place_random_obstacles`], but never on any of the `reserved` cells.
    pub fn place_random_obstacles_avoiding(
        &mut self,
        count: usize,
        reserved: &[Position],
        rng: &mut Rng,
    ) -> usize {
        self.place_random(Cell::Obstacle, count, reserved, rng)
    }

    /// Place up to `count` dirt piles on distinct empty cells chosen uniformly at random. Returns
    /// how many were placed.
    pub fn place_random_dirt(&mut self, count: usize, rng: &mut Rng) -> usize {
        self.place_random(Cell::Dirt, count, &[], rng)
    }

    fn place_random(
        &mut self,
        cell: Cell,
        count: usize,
        reserved: &[Position],
        rng: &mut Rng,
    ) -> usize {
        let mut candidates: Vec<usize> = (0..self.cells.len())
            .filter(|&i| self.cells[i] == Cell::Empty)
            .filter(|&i| !reserved.contains(&self.position_of(i)))
            .collect();
        if count > candidates.len() {
            log::warn!(
                "requested {} random {:?} cells but only {} are empty; placing {}",
                count,
                cell,
                candidates.len(),
                candidates.len()
            );
        }
        let count = count.min(candidates.len());
        let (chosen, _) = candidates.partial_shuffle(rng, count);
        for &i in chosen.iter() {
            self.cells[i] = cell;
        }
        count
    }
}
