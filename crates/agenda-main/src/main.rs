// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use agenda_core::time::{TimeDelta, TimePoint};
use agenda_model::{
    config::SolveConfig,
    id::TaskId,
    schedule::Problem,
    task::{Category, Priority, Task},
};
use agenda_solver::{engine::SolverEngine, scoring::ScoreKeeper};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::{fs::File, io::BufWriter, time::Instant};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct InstanceInfo {
    idx: usize,
    seed: u64,
    task_count: usize,
    pinned_count: usize,
    deadline_count: usize,
    working_day: bool,
}

#[derive(Debug, Clone, Serialize)]
struct RunResult {
    instance: InstanceInfo,
    initial_hard: i64,
    initial_soft: i64,
    final_hard: i64,
    final_soft: i64,
    feasible: bool,
    stalled: bool,
    iterations: u64,
    elapsed_ms: u128,
    violations: Vec<ConstraintLine>,
}

#[derive(Debug, Clone, Serialize)]
struct ConstraintLine {
    name: &'static str,
    violations: u64,
    hard: i64,
    soft: i64,
}

#[derive(Debug, Clone, Serialize)]
struct BenchmarkReport {
    description: String,
    instances: Vec<RunResult>,
}

fn interpolate_u(val0: usize, val1: usize, step: usize, steps: usize) -> usize {
    if steps <= 1 {
        return val1;
    }
    let num = (val1 as isize - val0 as isize) * step as isize;
    (val0 as isize + num / (steps as isize - 1)).max(0) as usize
}

/// Rolls a random but plausible day of todos: mixed priorities and
/// categories, a few deadlines, a couple of pinned appointments.
fn generate_day(task_count: usize, config: &SolveConfig<i64, i64>, seed: u64) -> Vec<Task<i64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let day_start = config.day_start.value();
    let day_end = config.day_end.value();

    (0..task_count)
        .map(|i| {
            // 15-120 minutes in 15-minute steps.
            let duration = 15 * rng.random_range(1..=8);
            let latest = day_end - duration;
            let start = rng.random_range(day_start..=latest);
            let deadline = if rng.random_bool(0.3) {
                Some(TimePoint::new(rng.random_range((start + duration)..=day_end)))
            } else {
                None
            };
            let priority = match rng.random_range(0..3) {
                0 => Priority::Low,
                1 => Priority::Medium,
                _ => Priority::High,
            };
            let category = if rng.random_bool(0.6) {
                Category::Work
            } else {
                Category::Personal
            };
            let pinned = rng.random_bool(0.1);
            Task::new(
                TaskId::new(i as u64),
                TimePoint::new(start),
                TimeDelta::new(duration),
                TimeDelta::minutes(10),
                deadline,
                priority,
                category,
                pinned,
            )
            .expect("generated task is valid")
        })
        .collect()
}

fn main() {
    enable_tracing();

    let n_instances = 10usize;
    let min_tasks = 4usize;
    let max_tasks = 40usize;

    let engine = SolverEngine::default();
    let mut results: Vec<RunResult> = Vec::with_capacity(n_instances);

    for i in 0..n_instances {
        let task_count = interpolate_u(min_tasks, max_tasks, i, n_instances);
        let seed: u64 = 42 + (i as u64);

        let config = SolveConfig::default().with_working_day(i % 2 == 0);
        let tasks = generate_day(task_count, &config, seed);
        let pinned_count = tasks.iter().filter(|t| t.is_pinned()).count();
        let deadline_count = tasks.iter().filter(|t| t.deadline().is_some()).count();

        let problem: Problem<i64, i64> =
            Problem::new(tasks, config).expect("generated problem is valid");
        let initial = ScoreKeeper::new(config, problem.schedule()).score();

        let t0 = Instant::now();
        let outcome = engine.solve(&problem);
        let elapsed = t0.elapsed();

        let violations = outcome
            .reports()
            .iter()
            .map(|r| ConstraintLine {
                name: r.name(),
                violations: r.violations(),
                hard: r.score().hard(),
                soft: r.score().soft(),
            })
            .collect();

        results.push(RunResult {
            instance: InstanceInfo {
                idx: i,
                seed,
                task_count,
                pinned_count,
                deadline_count,
                working_day: config.working_day,
            },
            initial_hard: initial.hard(),
            initial_soft: initial.soft(),
            final_hard: outcome.score().hard(),
            final_soft: outcome.score().soft(),
            feasible: outcome.is_feasible(),
            stalled: outcome.is_stalled(),
            iterations: outcome.iterations(),
            elapsed_ms: elapsed.as_millis(),
            violations,
        });
    }

    let report = BenchmarkReport {
        description: "Agenda scheduling benchmark: 10 random days from small to big; \
                      initial score vs annealed final score."
            .into(),
        instances: results,
    };

    let file = File::create("bench_results.json").expect("create bench_results.json");
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).expect("write json report");

    println!();
    println!("=================================================================");
    println!("======================== Benchmark Done =========================");
    println!("=================================================================");
    println!();
    println!("Wrote: bench_results.json");
}
