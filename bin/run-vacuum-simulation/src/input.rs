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

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};

use vacuum_world::StrategyKind;

/// A command typed by the user while the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Switch(StrategyKind),
}

/// `q` quits, a strategy name or menu index switches. Anything else is ignored.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Some(Command::Quit);
    }
    line.parse::<StrategyKind>().ok().map(Command::Switch)
}

/// Reads stdin on a helper thread so the tick loop never blocks on the keyboard. The channel
/// closes when stdin does.
pub fn spawn_stdin_reader() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => log::warn!("ignoring input {:?}", line),
            }
        }
    });
    rx
}
