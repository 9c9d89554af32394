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

//! # Solve Configuration
//!
//! Immutable per-solve context read by the constraint evaluators, plus the
//! caller-facing budget. Everything here is captured once when a solve
//! starts; in particular `current_time` is an anchor, not a live clock, so
//! every evaluation of a candidate schedule sees the same instant and the
//! search stays deterministic.

use agenda_core::{SolverVariable, time::TimePoint};

/// Per-constraint integer weights. The baseline rule set is all-ones; each
/// violation contributes `-weight` to its severity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintWeights<C: SolverVariable> {
    pub overlap: C,
    pub day_hours: C,
    pub after_current_time: C,
    pub deadline: C,
    pub breaks: C,
    pub priority: C,
    pub work_hours: C,
    pub personal_hours: C,
}

impl<C: SolverVariable> Default for ConstraintWeights<C> {
    fn default() -> Self {
        Self {
            overlap: C::one(),
            day_hours: C::one(),
            after_current_time: C::one(),
            deadline: C::one(),
            breaks: C::one(),
            priority: C::one(),
            work_hours: C::one(),
            personal_hours: C::one(),
        }
    }
}

/// Stopping conditions for one solve run. Checked between iterations only,
/// so a cancelled run still hands back a structurally valid schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveBudget {
    /// Wall-clock ceiling for the run, in milliseconds.
    pub max_time_ms: u64,
    /// Hard cap on iterations regardless of elapsed time.
    pub max_iterations: u64,
    /// Stop after this many consecutive iterations without a new best.
    pub stall_limit: u64,
}

impl Default for SolveBudget {
    fn default() -> Self {
        Self {
            max_time_ms: 1_000,
            max_iterations: 200_000,
            stall_limit: 20_000,
        }
    }
}

/// The scoring context: day/work windows, the current-time anchor, the
/// weekday flag and the constraint weights.
///
/// `working_day` gates the work-hours and personal-hours constraints; it is
/// a configuration-time decision made once per solve, never re-evaluated
/// per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveConfig<T = i64, C = i64>
where
    T: SolverVariable,
    C: SolverVariable,
{
    pub day_start: TimePoint<T>,
    pub day_end: TimePoint<T>,
    pub work_start: TimePoint<T>,
    pub work_end: TimePoint<T>,
    pub current_time: TimePoint<T>,
    pub working_day: bool,
    pub weights: ConstraintWeights<C>,
    pub budget: SolveBudget,
}

impl Default for SolveConfig<i64, i64> {
    /// The baseline day: active hours 09:00-22:00, work hours 11:00-19:00,
    /// anchored at day start on a working day.
    fn default() -> Self {
        Self {
            day_start: TimePoint::hm(9, 0),
            day_end: TimePoint::hm(22, 0),
            work_start: TimePoint::hm(11, 0),
            work_end: TimePoint::hm(19, 0),
            current_time: TimePoint::hm(9, 0),
            working_day: true,
            weights: ConstraintWeights::default(),
            budget: SolveBudget::default(),
        }
    }
}

impl<T: SolverVariable, C: SolverVariable> SolveConfig<T, C> {
    #[inline]
    pub fn with_current_time(mut self, current_time: TimePoint<T>) -> Self {
        self.current_time = current_time;
        self
    }

    #[inline]
    pub fn with_working_day(mut self, working_day: bool) -> Self {
        self.working_day = working_day;
        self
    }

    #[inline]
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_windows() {
        let cfg = SolveConfig::default();
        assert_eq!(cfg.day_start, TimePoint::hm(9, 0));
        assert_eq!(cfg.day_end, TimePoint::hm(22, 0));
        assert_eq!(cfg.work_start, TimePoint::hm(11, 0));
        assert_eq!(cfg.work_end, TimePoint::hm(19, 0));
        assert!(cfg.working_day);
    }

    #[test]
    fn test_default_weights_are_unit() {
        let w: ConstraintWeights<i64> = ConstraintWeights::default();
        assert_eq!(w.overlap, 1);
        assert_eq!(w.personal_hours, 1);
    }

    #[test]
    fn test_builder_style_overrides() {
        let cfg = SolveConfig::default()
            .with_current_time(TimePoint::hm(13, 30))
            .with_working_day(false);
        assert_eq!(cfg.current_time, TimePoint::hm(13, 30));
        assert!(!cfg.working_day);
    }
}
