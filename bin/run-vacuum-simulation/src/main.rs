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

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::TryRecvError;

use vacuum_world::{Simulation, SimulationConfig, StrategyKind, VacuumError};

mod input;
mod render;

use input::Command;

// Chapter 2 Intelligent Agents, Exercise 11: a vacuum-cleaner world simulator.
//
// Usage: run-vacuum-simulation [config.toml]
//
// While running, type a line and press enter:
//   1..4 or a strategy name  switch strategy
//   q                        quit
fn main() -> Result<(), VacuumError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let rng = Rc::new(RefCell::new(config.rng()));
    let mut simulation = Simulation::from_config(&config, Rc::clone(&rng))?;

    println!("Strategies:");
    for kind in StrategyKind::ALL {
        println!("  {}) {}", kind.menu_index(), kind);
    }
    println!("Type a number to switch strategy, 'q' to quit. Running {}...", config.strategy);
    std::thread::sleep(config.tick_delay() * 6);

    let commands = input::spawn_stdin_reader();
    let mut stdin_open = true;
    loop {
        while stdin_open {
            match commands.try_recv() {
                Ok(Command::Quit) => {
                    println!("Quitting by user request...");
                    println!("{}", simulation.stats());
                    return Ok(());
                }
                Ok(Command::Switch(kind)) => {
                    simulation.set_strategy(kind.build(Rc::clone(&rng)));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => stdin_open = false,
            }
        }

        std::thread::sleep(config.tick_delay());
        let report = simulation.tick();
        print!("{}", render::render(&simulation));

        if let Some(outcome) = report.outcome {
            println!("{}", outcome);
            println!("{}", simulation.stats());
            return Ok(());
        }
    }
}
