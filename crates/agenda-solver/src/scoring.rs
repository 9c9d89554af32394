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

//! # Score Keeper
//!
//! Aggregates the constraint catalog into one `(hard, soft)` score and
//! keeps it current across single-task moves without rescoring the whole
//! schedule. Pairwise constraints make a full pass O(n^2); a move touches
//! only the moved task's singleton contributions and its pairs against
//! every other task, so the incremental path is O(n) per move:
//!
//! `total' = total - touching(moved, old start) + touching(moved, new start)`

use crate::constraints::ConstraintKind;
use agenda_core::{SolverVariable, score::Score};
use agenda_model::{config::SolveConfig, outcome::ConstraintReport, schedule::Schedule};

#[derive(Debug, Clone)]
pub struct ScoreKeeper<T = i64, C = i64>
where
    T: SolverVariable,
    C: SolverVariable,
{
    config: SolveConfig<T, C>,
    active: &'static [ConstraintKind],
    total: Score<C>,
}

impl<T: SolverVariable, C: SolverVariable> ScoreKeeper<T, C> {
    /// Builds a keeper with the active constraint set fixed from the
    /// configuration's weekday flag, then runs a full evaluation.
    pub fn new(config: SolveConfig<T, C>, schedule: &Schedule<T>) -> Self {
        let mut keeper = Self {
            config,
            active: ConstraintKind::active_set(config.working_day),
            total: Score::zero(),
        };
        keeper.total = keeper.evaluate_full(schedule);
        keeper
    }

    #[inline]
    pub fn score(&self) -> Score<C> {
        self.total
    }

    #[inline]
    pub fn config(&self) -> &SolveConfig<T, C> {
        &self.config
    }

    #[inline]
    pub fn active_constraints(&self) -> &'static [ConstraintKind] {
        self.active
    }

    /// Scores the whole schedule from scratch: every singleton plus every
    /// unique pair in canonical (ascending index) orientation.
    pub fn evaluate_full(&self, schedule: &Schedule<T>) -> Score<C> {
        let tasks = schedule.tasks();
        let mut score = Score::zero();
        for kind in self.active {
            if kind.is_pairwise() {
                for i in 0..tasks.len() {
                    for j in (i + 1)..tasks.len() {
                        if kind.fires_pair(&tasks[i], &tasks[j], &self.config) {
                            score += kind.penalty(&self.config);
                        }
                    }
                }
            } else {
                for task in tasks {
                    if kind.fires_single(task, &self.config) {
                        score += kind.penalty(&self.config);
                    }
                }
            }
        }
        score
    }

    /// The contributions involving one task in the schedule's current
    /// state: its singleton penalties plus its pairs against every other
    /// task. This is exactly the part of the total a move on `index` can
    /// change.
    pub fn touching(&self, schedule: &Schedule<T>, index: usize) -> Score<C> {
        let tasks = schedule.tasks();
        let task = &tasks[index];
        let mut score = Score::zero();
        for kind in self.active {
            if kind.is_pairwise() {
                for (j, other) in tasks.iter().enumerate() {
                    if j == index {
                        continue;
                    }
                    // Canonical orientation: lower index first.
                    let fired = if index < j {
                        kind.fires_pair(task, other, &self.config)
                    } else {
                        kind.fires_pair(other, task, &self.config)
                    };
                    if fired {
                        score += kind.penalty(&self.config);
                    }
                }
            } else if kind.fires_single(task, &self.config) {
                score += kind.penalty(&self.config);
            }
        }
        score
    }

    /// Folds an incremental delta into the running total. The caller is
    /// responsible for having computed `retracted` before the mutation and
    /// `inserted` after it, both via [`touching`](Self::touching).
    #[inline]
    pub fn apply_shift(&mut self, retracted: Score<C>, inserted: Score<C>) {
        self.total = self.total - retracted + inserted;
    }

    /// Resynchronizes the total from scratch. Used after wholesale
    /// schedule replacement (e.g. restoring a best-known snapshot).
    pub fn resync(&mut self, schedule: &Schedule<T>) {
        self.total = self.evaluate_full(schedule);
    }

    /// Per-constraint violation counts and contributions for diagnostics.
    pub fn breakdown(&self, schedule: &Schedule<T>) -> Vec<ConstraintReport<C>> {
        let tasks = schedule.tasks();
        self.active
            .iter()
            .map(|kind| {
                let mut violations = 0u64;
                if kind.is_pairwise() {
                    for i in 0..tasks.len() {
                        for j in (i + 1)..tasks.len() {
                            if kind.fires_pair(&tasks[i], &tasks[j], &self.config) {
                                violations += 1;
                            }
                        }
                    }
                } else {
                    for task in tasks {
                        if kind.fires_single(task, &self.config) {
                            violations += 1;
                        }
                    }
                }
                let mut score = Score::zero();
                for _ in 0..violations {
                    score += kind.penalty(&self.config);
                }
                ConstraintReport::new(kind.name(), violations, score)
            })
            .collect()
    }
}
