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

//! # Move Generation
//!
//! A move shifts one non-pinned task's start time. Proposals mix two
//! components: *snaps* to positions likely to reduce violations (just
//! after another task's buffered end, the latest deadline-feasible start,
//! window anchors) and a pure uniform-random start that lets the search
//! escape local minima. The mix ratio is configured; pinned tasks are
//! never proposed.

use agenda_core::{
    SolverVariable,
    time::{TimeDelta, TimePoint},
};
use agenda_model::{config::SolveConfig, id::TaskId, schedule::Schedule};
use num_traits::NumCast;
use rand::Rng;

/// A reversible single-task shift: apply with [`Move::apply`], roll back
/// with [`Move::undo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move<T: SolverVariable> {
    index: usize,
    task: TaskId,
    from: TimePoint<T>,
    to: TimePoint<T>,
}

impl<T: SolverVariable> Move<T> {
    #[inline]
    pub fn new(index: usize, task: TaskId, from: TimePoint<T>, to: TimePoint<T>) -> Self {
        Self {
            index,
            task,
            from,
            to,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn task(&self) -> TaskId {
        self.task
    }

    #[inline]
    pub fn from(&self) -> TimePoint<T> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> TimePoint<T> {
        self.to
    }

    /// Applies the shift. Returns `false` if the schedule refused the
    /// mutation (pinned task), which a correct generator never produces.
    #[inline]
    pub fn apply(&self, schedule: &mut Schedule<T>) -> bool {
        schedule.set_start(self.index, self.to)
    }

    /// Restores the pre-move start time.
    #[inline]
    pub fn undo(&self, schedule: &mut Schedule<T>) -> bool {
        schedule.set_start(self.index, self.from)
    }
}

#[derive(Debug, Clone)]
pub struct MoveGenerator {
    movable: Vec<usize>,
    snap_probability: f64,
}

impl MoveGenerator {
    /// Captures the movable index set once; the set of tasks never changes
    /// during a solve, only their start times do.
    pub fn new<T: SolverVariable>(schedule: &Schedule<T>, snap_probability: f64) -> Self {
        Self {
            movable: schedule.movable_indices(),
            snap_probability: snap_probability.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn has_moves(&self) -> bool {
        !self.movable.is_empty()
    }

    /// Proposes one shift for a uniformly chosen non-pinned task, or
    /// `None` when there is nothing to move or the proposal would be a
    /// no-op.
    pub fn propose<T, C, R>(
        &self,
        schedule: &Schedule<T>,
        config: &SolveConfig<T, C>,
        rng: &mut R,
    ) -> Option<Move<T>>
    where
        T: SolverVariable,
        C: SolverVariable,
        R: Rng + ?Sized,
    {
        if self.movable.is_empty() {
            return None;
        }
        let index = self.movable[rng.random_range(0..self.movable.len())];
        let task = schedule.task(index);

        let to = if rng.random_bool(self.snap_probability) {
            self.snap_target(schedule, config, index, rng)
        } else {
            random_start(task.duration(), config, rng)
        };

        if to == task.start() {
            return None;
        }
        Some(Move::new(index, task.id(), task.start(), to))
    }

    /// A start position snapped to a violation-reducing anchor.
    fn snap_target<T, C, R>(
        &self,
        schedule: &Schedule<T>,
        config: &SolveConfig<T, C>,
        index: usize,
        rng: &mut R,
    ) -> TimePoint<T>
    where
        T: SolverVariable,
        C: SolverVariable,
        R: Rng + ?Sized,
    {
        let task = schedule.task(index);
        let mut targets: Vec<TimePoint<T>> = Vec::with_capacity(schedule.len() + 3);

        // Just after another task's buffered end.
        for (j, other) in schedule.tasks().iter().enumerate() {
            if j != index {
                targets.push(other.end_with_buffer());
            }
        }
        // Latest start that still meets the deadline.
        if let Some(deadline) = task.deadline()
            && let Some(latest) = deadline.checked_sub(task.duration())
        {
            targets.push(latest);
        }
        // Window anchors.
        targets.push(earliest_start(config));
        targets.push(config.work_start);

        targets[rng.random_range(0..targets.len())]
    }
}

#[inline]
fn earliest_start<T: SolverVariable, C: SolverVariable>(config: &SolveConfig<T, C>) -> TimePoint<T> {
    config.day_start.max(config.current_time)
}

/// A uniform-random start within `[max(day_start, current_time),
/// day_end - duration]`. Falls back to the earliest start when the task
/// does not fit the remaining day at all.
fn random_start<T, C, R>(
    duration: TimeDelta<T>,
    config: &SolveConfig<T, C>,
    rng: &mut R,
) -> TimePoint<T>
where
    T: SolverVariable,
    C: SolverVariable,
    R: Rng + ?Sized,
{
    let earliest = earliest_start(config);
    let latest = config.day_end.checked_sub(duration).unwrap_or(earliest);
    if latest <= earliest {
        return earliest;
    }
    let lo = earliest
        .value()
        .to_i64()
        .expect("time value fits in i64");
    let hi = latest.value().to_i64().expect("time value fits in i64");
    let pick = rng.random_range(lo..=hi);
    let value: T = NumCast::from(pick).expect("time value fits in the solver scalar");
    TimePoint::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_model::task::{Category, Priority, Task};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn task(id: u64, start: TimePoint<i64>, pinned: bool) -> Task<i64> {
        Task::new(
            TaskId::new(id),
            start,
            TimeDelta::new(60),
            TimeDelta::minutes(15),
            None,
            Priority::Medium,
            Category::Work,
            pinned,
        )
        .unwrap()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_no_moves_for_all_pinned_schedule() {
        let schedule = Schedule::from_tasks(vec![
            task(1, TimePoint::hm(9, 0), true),
            task(2, TimePoint::hm(11, 0), true),
        ])
        .unwrap();
        let generator = MoveGenerator::new(&schedule, 0.5);
        assert!(!generator.has_moves());
        let cfg = SolveConfig::default();
        assert!(generator.propose(&schedule, &cfg, &mut rng()).is_none());
    }

    #[test]
    fn test_proposals_only_touch_movable_tasks() {
        let schedule = Schedule::from_tasks(vec![
            task(1, TimePoint::hm(9, 0), true),
            task(2, TimePoint::hm(11, 0), false),
        ])
        .unwrap();
        let generator = MoveGenerator::new(&schedule, 0.5);
        let cfg = SolveConfig::default();
        let mut r = rng();
        for _ in 0..64 {
            if let Some(mv) = generator.propose(&schedule, &cfg, &mut r) {
                assert_eq!(mv.index(), 1);
                assert_eq!(mv.task(), TaskId::new(2));
                assert_ne!(mv.to(), mv.from());
            }
        }
    }

    #[test]
    fn test_random_starts_stay_in_window() {
        let schedule = Schedule::from_tasks(vec![task(1, TimePoint::hm(12, 0), false)]).unwrap();
        // Pure random component only.
        let generator = MoveGenerator::new(&schedule, 0.0);
        let cfg = SolveConfig::default();
        let mut r = rng();
        for _ in 0..256 {
            if let Some(mv) = generator.propose(&schedule, &cfg, &mut r) {
                assert!(mv.to() >= TimePoint::hm(9, 0));
                // Latest start keeps the 60-minute task inside 22:00.
                assert!(mv.to() <= TimePoint::hm(21, 0));
            }
        }
    }

    #[test]
    fn test_apply_and_undo_roundtrip() {
        let mut schedule =
            Schedule::from_tasks(vec![task(1, TimePoint::hm(9, 0), false)]).unwrap();
        let mv = Move::new(0, TaskId::new(1), TimePoint::hm(9, 0), TimePoint::hm(14, 0));
        assert!(mv.apply(&mut schedule));
        assert_eq!(schedule.task(0).start(), TimePoint::hm(14, 0));
        assert!(mv.undo(&mut schedule));
        assert_eq!(schedule.task(0).start(), TimePoint::hm(9, 0));
    }

    #[test]
    fn test_deterministic_given_seed() {
        let schedule = Schedule::from_tasks(vec![
            task(1, TimePoint::hm(9, 0), false),
            task(2, TimePoint::hm(11, 0), false),
        ])
        .unwrap();
        let generator = MoveGenerator::new(&schedule, 0.5);
        let cfg = SolveConfig::default();
        let a: Vec<_> = {
            let mut r = rng();
            (0..32)
                .map(|_| generator.propose(&schedule, &cfg, &mut r))
                .collect()
        };
        let b: Vec<_> = {
            let mut r = rng();
            (0..32)
                .map(|_| generator.propose(&schedule, &cfg, &mut r))
                .collect()
        };
        assert_eq!(a, b);
    }
}
