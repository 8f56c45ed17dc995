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

use vacuum_world::{Position, Simulation};

// clear screen, cursor to top-left.
const CLEAR: &str = "\x1B[2J\x1B[H";

/// Draws the grid with the agent on top as `R`.
pub fn render(simulation: &Simulation) -> String {
    let map = simulation.map();
    let agent = simulation.agent().position();
    let mut s = String::with_capacity((map.width() * 2 + 1) * (map.height() + 6));

    s.push_str(CLEAR);
    s.push_str("Vacuum Cleaner Robot Simulation\n");
    s.push_str("------------------------------------\n");
    s.push_str("Legends: #=Obstacle  D=Dirt  .=Empty  R=Robot  C=Cleaned\n");
    for row in 0..map.height() as i32 {
        for col in 0..map.width() as i32 {
            let pos = Position::new(col, row);
            if pos == agent {
                s.push('R');
            } else if let Some(cell) = map.cell(pos) {
                s.push(cell.symbol());
            }
            if col < map.width() as i32 - 1 {
                s.push(' ');
            }
        }
        s.push('\n');
    }
    s.push_str(&format!(
        "\nstrategy: {}  dirt left: {}  {}\n",
        simulation.strategy_name(),
        map.count_remaining_dirt(),
        simulation.stats()
    ));
    s
}
