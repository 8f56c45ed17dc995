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

//! Evaluate every strategy over many random worlds.

use std::cell::RefCell;
use std::rc::Rc;

use rayon::prelude::*;
use serde::Serialize;
use vacuum_world::{
    Outcome, Simulation, SimulationConfig, SimulationStats, StrategyKind, VacuumError,
};

const DEFAULT_RUNS: u64 = 100;

// Random never no-ops, so without a cap it can wander forever next to unreachable dirt.
const DEFAULT_MAX_TICKS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
enum EvaluateError {
    #[error(transparent)]
    Vacuum(#[from] VacuumError),

    #[error("failed to write report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid run count: {0:?}")]
    RunCount(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct RunResult {
    outcome: Outcome,
    stats: SimulationStats,
    initial_dirt: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct StrategyReport {
    strategy: StrategyKind,
    runs: usize,
    all_dirt_cleaned: usize,
    no_legal_moves: usize,
    stalled: usize,
    tick_limit_reached: usize,
    mean_ticks: f64,
    mean_moves: f64,
    mean_cleaned_fraction: f64,
}

fn run_once(
    config: &SimulationConfig,
    kind: StrategyKind,
    seed: u64,
) -> Result<RunResult, VacuumError> {
    let config = SimulationConfig {
        strategy: kind,
        seed: Some(seed),
        max_ticks: config.max_ticks.or(Some(DEFAULT_MAX_TICKS)),
        ..config.clone()
    };
    let rng = Rc::new(RefCell::new(config.rng()));
    let mut simulation = Simulation::from_config(&config, rng)?;
    let initial_dirt =
        simulation.map().count_remaining_dirt() + simulation.stats().cells_cleaned as usize;
    let outcome = simulation.run();
    Ok(RunResult {
        outcome,
        stats: simulation.stats(),
        initial_dirt,
    })
}

fn mean<F>(results: &[RunResult], f: F) -> f64
where
    F: Fn(&RunResult) -> f64,
{
    if results.is_empty() {
        0.0
    } else {
        results.iter().map(f).sum::<f64>() / results.len() as f64
    }
}

fn summarize(strategy: StrategyKind, results: &[RunResult]) -> StrategyReport {
    let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
    StrategyReport {
        strategy,
        runs: results.len(),
        all_dirt_cleaned: count(Outcome::AllDirtCleaned),
        no_legal_moves: count(Outcome::NoLegalMoves),
        stalled: count(Outcome::Stalled),
        tick_limit_reached: count(Outcome::TickLimitReached),
        mean_ticks: mean(results, |r| r.stats.ticks as f64),
        mean_moves: mean(results, |r| r.stats.moves as f64),
        mean_cleaned_fraction: mean(results, |r| {
            if r.initial_dirt == 0 {
                1.0
            } else {
                r.stats.cells_cleaned as f64 / r.initial_dirt as f64
            }
        }),
    }
}

fn evaluate(config: &SimulationConfig, runs: u64) -> Result<Vec<StrategyReport>, VacuumError> {
    let base_seed = config.seed.unwrap_or(0);
    StrategyKind::ALL
        .iter()
        .map(|&kind| -> Result<StrategyReport, VacuumError> {
            // the same seeds for every strategy, so they all face the same worlds.
            let results = (0..runs)
                .into_par_iter()
                .map(|i| run_once(config, kind, base_seed.wrapping_add(i)))
                .collect::<Result<Vec<_>, _>>()?;
            log::info!("evaluated {} over {} runs", kind, runs);
            Ok(summarize(kind, &results))
        })
        .collect()
}

// Chapter 2 Intelligent Agents, Exercise 12: run each agent over many initial configurations,
// record the performance of each and the overall average.
//
// Usage: evaluate-strategies [config.toml] [runs]
fn main() -> Result<(), EvaluateError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let runs = match args.next() {
        Some(arg) => arg.parse::<u64>().map_err(|_| EvaluateError::RunCount(arg))?,
        None => DEFAULT_RUNS,
    };

    let reports = evaluate(&config, runs)?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
