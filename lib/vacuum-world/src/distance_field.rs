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

//! Breadth-first distance fields over the grid.
//!
//! Steps are 8-connected and all cost one, so a diagonal step is as cheap as a straight one.
//! Obstacles are never entered.

use std::collections::VecDeque;

use crate::direction::Direction;
use crate::grid_map::{GridMap, Position};

/// Shortest step counts from a set of source cells. Computed fresh for each query and thrown
/// away afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    height: usize,
    distances: Vec<Option<u32>>,
    visit_order: Vec<Position>,
}

impl DistanceField {
    /// Multi-source BFS. Every source gets distance 0. Sources outside the grid or on an
    /// obstacle are ignored.
    pub fn compute_from<I>(map: &GridMap, sources: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let width = map.width();
        let height = map.height();
        let mut distances = vec![None; width * height];
        let mut visit_order = Vec::new();
        let mut queue = VecDeque::new();

        for source in sources {
            if !map.is_passable(source) {
                continue;
            }
            let slot = &mut distances[source.y as usize * width + source.x as usize];
            if slot.is_none() {
                *slot = Some(0);
                queue.push_back(source);
            }
        }

        // a cell is assigned when first discovered, and BFS discovers cells in order of
        // distance, so an assigned distance is final.
        while let Some(current) = queue.pop_front() {
            visit_order.push(current);
            let current_distance = distances[current.y as usize * width + current.x as usize]
                .unwrap_or_default();
            for direction in Direction::ALL {
                let next = direction.apply(current);
                if !map.is_passable(next) {
                    continue;
                }
                let slot = &mut distances[next.y as usize * width + next.x as usize];
                if slot.is_none() {
                    *slot = Some(current_distance + 1);
                    queue.push_back(next);
                }
            }
        }

        log::trace!(
            "distance field reached {} of {} cells",
            visit_order.len(),
            width * height
        );
        Self {
            width,
            height,
            distances,
            visit_order,
        }
    }

    /// BFS from a single cell.
    pub fn from_source(map: &GridMap, source: Position) -> Self {
        Self::compute_from(map, std::iter::once(source))
    }

    /// Distance of `pos` from the nearest source. `None` if unreached or outside the grid.
    pub fn distance(&self, pos: Position) -> Option<u32> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height
        {
            return None;
        }
        self.distances[pos.y as usize * self.width + pos.x as usize]
    }

    /// Whether `pos` is reachable from a source.
    pub fn is_reached(&self, pos: Position) -> bool {
        self.distance(pos).is_some()
    }

    /// Reached cells in the order BFS dequeued them, i.e. by non-decreasing distance.
    pub fn visit_order(&self) -> &[Position] {
        &self.visit_order
    }

    /// The first cell in BFS order matching `predicate`, with its distance. This is a nearest
    /// match, ties going to whichever BFS reached first.
    pub fn nearest<F>(&self, mut predicate: F) -> Option<(Position, u32)>
    where
        F: FnMut(Position) -> bool,
    {
        self.visit_order
            .iter()
            .copied()
            .find(|&pos| predicate(pos))
            .and_then(|pos| self.distance(pos).map(|d| (pos, d)))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    // Bellman-Ford style relaxation until nothing changes. Slow, but obviously correct.
    fn brute_force(map: &GridMap, source: Position) -> Vec<Option<u32>> {
        let (w, h) = (map.width() as i32, map.height() as i32);
        let mut dist = vec![None; (w * h) as usize];
        if !map.is_passable(source) {
            return dist;
        }
        dist[(source.y * w + source.x) as usize] = Some(0u32);
        let mut changed = true;
        while changed {
            changed = false;
            for y in 0..h {
                for x in 0..w {
                    let pos = Position::new(x, y);
                    if !map.is_passable(pos) {
                        continue;
                    }
                    for d in Direction::ALL {
                        let n = d.apply(pos);
                        if !map.is_passable(n) {
                            continue;
                        }
                        if let Some(dn) = dist[(n.y * w + n.x) as usize] {
                            let slot = &mut dist[(y * w + x) as usize];
                            if slot.map_or(true, |cur| dn + 1 < cur) {
                                *slot = Some(dn + 1);
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        dist
    }

    #[test]
    fn test_open_grid_uses_chebyshev_distance() {
        let map = GridMap::new(5, 4);
        let field = DistanceField::from_source(&map, Position::new(0, 0));
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(
                    field.distance(Position::new(x, y)),
                    Some(x.max(y) as u32),
                    "x: {}, y: {}",
                    x,
                    y
                );
            }
        }
        assert_eq!(field.visit_order().len(), 20);
        assert_eq!(field.visit_order()[0], Position::new(0, 0));
    }

    #[test]
    fn test_wall_forces_detour_and_blocks_region() {
        // . # .
        // . # .
        // . . .
        let mut map = GridMap::new(3, 3);
        map.add_obstacle(Position::new(1, 0));
        map.add_obstacle(Position::new(1, 1));
        let field = DistanceField::from_source(&map, Position::new(0, 0));
        assert_eq!(field.distance(Position::new(2, 0)), Some(4));
        assert_eq!(field.distance(Position::new(2, 2)), Some(3));
        assert_eq!(field.distance(Position::new(1, 2)), Some(2));
        assert_eq!(field.distance(Position::new(1, 0)), None);

        map.add_obstacle(Position::new(1, 2));
        let field = DistanceField::from_source(&map, Position::new(0, 0));
        assert!(!field.is_reached(Position::new(2, 0)));
        assert!(!field.is_reached(Position::new(2, 2)));
        assert_eq!(field.visit_order().len(), 3);
    }

    #[test]
    fn test_multiple_sources() {
        let map = GridMap::new(7, 1);
        let field =
            DistanceField::compute_from(&map, [Position::new(0, 0), Position::new(6, 0)]);
        let got: Vec<_> = (0..7)
            .map(|x| field.distance(Position::new(x, 0)).unwrap())
            .collect();
        assert_eq!(got, vec![0, 1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn test_invalid_sources_are_ignored() {
        let mut map = GridMap::new(2, 2);
        map.add_obstacle(Position::new(1, 1));
        let field =
            DistanceField::compute_from(&map, [Position::new(1, 1), Position::new(-1, 0)]);
        assert!(field.visit_order().is_empty());
        assert_eq!(field.distance(Position::new(0, 0)), None);
    }

    #[test]
    fn test_nearest_prefers_bfs_order_on_ties() {
        let mut map = GridMap::new(3, 3);
        map.add_dirt(Position::new(0, 1));
        map.add_dirt(Position::new(2, 1));
        let field = DistanceField::from_source(&map, Position::new(1, 1));
        // east is expanded before west.
        assert_eq!(
            field.nearest(|p| map.is_dirt(p)),
            Some((Position::new(2, 1), 1))
        );
        assert_eq!(field.nearest(|p| p.y == 5), None);
    }

    proptest! {
        #[test]
        fn test_matches_brute_force(
            obstacles in prop::collection::vec((0..6i32, 0..5i32), 0..14),
            sx in 0..6i32,
            sy in 0..5i32,
        ) {
            let mut map = GridMap::new(6, 5);
            for (x, y) in obstacles {
                map.add_obstacle(Position::new(x, y));
            }
            let source = Position::new(sx, sy);
            let field = DistanceField::from_source(&map, source);
            let expected = brute_force(&map, source);
            for y in 0..5 {
                for x in 0..6 {
                    prop_assert_eq!(
                        field.distance(Position::new(x, y)),
                        expected[(y * 6 + x) as usize],
                        "x: {}, y: {}", x, y
                    );
                }
            }
            let distances: Vec<u32> = field
                .visit_order()
                .iter()
                .map(|&p| field.distance(p).unwrap())
                .collect();
            prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
