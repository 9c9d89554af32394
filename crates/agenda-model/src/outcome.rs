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

//! # Solve Outcome
//!
//! What a solve hands back: the best schedule found, its score, whether it
//! is feasible, and per-constraint diagnostics the caller can use to
//! explain an imperfect result. An infeasible outcome is a result state,
//! not an error; the caller decides whether to retry with a larger budget
//! or surface the conflict.

use crate::schedule::Schedule;
use agenda_core::{SolverVariable, score::Score};

/// Violation count and score contribution of one constraint, keyed by its
/// diagnostic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintReport<C: SolverVariable> {
    name: &'static str,
    violations: u64,
    score: Score<C>,
}

impl<C: SolverVariable> ConstraintReport<C> {
    #[inline]
    pub fn new(name: &'static str, violations: u64, score: Score<C>) -> Self {
        Self {
            name,
            violations,
            score,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn violations(&self) -> u64 {
        self.violations
    }

    #[inline]
    pub fn score(&self) -> Score<C> {
        self.score
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome<T = i64, C = i64>
where
    T: SolverVariable,
    C: SolverVariable,
{
    schedule: Schedule<T>,
    score: Score<C>,
    iterations: u64,
    stalled: bool,
    reports: Vec<ConstraintReport<C>>,
}

impl<T: SolverVariable, C: SolverVariable> SolveOutcome<T, C> {
    pub fn new(
        schedule: Schedule<T>,
        score: Score<C>,
        iterations: u64,
        stalled: bool,
        reports: Vec<ConstraintReport<C>>,
    ) -> Self {
        Self {
            schedule,
            score,
            iterations,
            stalled,
            reports,
        }
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule<T> {
        &self.schedule
    }

    #[inline]
    pub fn score(&self) -> Score<C> {
        self.score
    }

    /// `true` when no hard constraint is violated.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.score.is_feasible()
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// `true` when the entire budget passed without a single improving
    /// move, which usually points at a degenerate or over-constrained
    /// input rather than a search failure.
    #[inline]
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    #[inline]
    pub fn reports(&self) -> &[ConstraintReport<C>] {
        &self.reports
    }

    #[inline]
    pub fn report(&self, name: &str) -> Option<&ConstraintReport<C>> {
        self.reports.iter().find(|r| r.name() == name)
    }

    #[inline]
    pub fn into_schedule(self) -> Schedule<T> {
        self.schedule
    }
}
