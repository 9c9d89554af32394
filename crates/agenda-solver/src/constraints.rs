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

//! # Constraint Catalog
//!
//! The fixed rule set a candidate schedule is scored against. Each
//! constraint is a pure predicate over one task or one unordered task pair
//! plus the solve configuration; the aggregate score is simply the sum of
//! every firing constraint's weighted penalty.
//!
//! Pairwise constraints see each unordered pair exactly once, in canonical
//! orientation: `first` is the task with the lower schedule index. The
//! breaks constraint's condition is deliberately asymmetric in that
//! orientation (it re-checks `first.start < second.end_with_buffer`, which
//! the buffered-interval overlap already implies) - behavioral parity with
//! the source rule set is kept over symmetry.
//!
//! Pinned tasks escape every constraint except overlap: a pinned slot is
//! externally validated and not second-guessed, but overlap is a physical
//! impossibility that must still be surfaced. Two overlapping *pinned*
//! tasks therefore keep a schedule infeasible even though no move can
//! repair them; callers see that as an unresolved infeasibility in the
//! diagnostics rather than a silent pass.

use agenda_core::{SolverVariable, score::Score};
use agenda_model::{
    config::{ConstraintWeights, SolveConfig},
    task::{Category, Task},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Hard,
    Soft,
}

/// One rule of the catalog. The enum doubles as the diagnostic key: every
/// violation reported to the caller is tagged with `name()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    OverlappingTime,
    WithinDayHours,
    AfterCurrentTime,
    BeforeDeadline,
    BreaksBetweenTasks,
    HighPriorityFirst,
    WorkItemsInWorkHours,
    PersonalItemsOutsideWorkHours,
}

impl ConstraintKind {
    /// Diagnostic names, kept identical to the source rule set.
    pub const fn name(self) -> &'static str {
        match self {
            ConstraintKind::OverlappingTime => "overlapping time",
            ConstraintKind::WithinDayHours => "generate schedules within day active hours",
            ConstraintKind::AfterCurrentTime => "create new schedules after current time",
            ConstraintKind::BeforeDeadline => "schedule task before deadline",
            ConstraintKind::BreaksBetweenTasks => "prefer breaks between tasks",
            ConstraintKind::HighPriorityFirst => "prefer high priority tasks first",
            ConstraintKind::WorkItemsInWorkHours => "prefer work items in work hours",
            ConstraintKind::PersonalItemsOutsideWorkHours => {
                "prefer personal items in non-working hours"
            }
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            ConstraintKind::OverlappingTime
            | ConstraintKind::WithinDayHours
            | ConstraintKind::AfterCurrentTime
            | ConstraintKind::BeforeDeadline => Severity::Hard,
            ConstraintKind::BreaksBetweenTasks
            | ConstraintKind::HighPriorityFirst
            | ConstraintKind::WorkItemsInWorkHours
            | ConstraintKind::PersonalItemsOutsideWorkHours => Severity::Soft,
        }
    }

    pub const fn is_pairwise(self) -> bool {
        matches!(
            self,
            ConstraintKind::OverlappingTime
                | ConstraintKind::BreaksBetweenTasks
                | ConstraintKind::HighPriorityFirst
        )
    }

    /// The constraint set active for one solve. The work/personal-hours
    /// rules only exist on working days; the decision is made here, once,
    /// never per candidate.
    pub fn active_set(working_day: bool) -> &'static [ConstraintKind] {
        const EVERY_DAY: &[ConstraintKind] = &[
            ConstraintKind::OverlappingTime,
            ConstraintKind::WithinDayHours,
            ConstraintKind::AfterCurrentTime,
            ConstraintKind::BeforeDeadline,
            ConstraintKind::BreaksBetweenTasks,
            ConstraintKind::HighPriorityFirst,
        ];
        const WORKING_DAY: &[ConstraintKind] = &[
            ConstraintKind::OverlappingTime,
            ConstraintKind::WithinDayHours,
            ConstraintKind::AfterCurrentTime,
            ConstraintKind::BeforeDeadline,
            ConstraintKind::BreaksBetweenTasks,
            ConstraintKind::HighPriorityFirst,
            ConstraintKind::WorkItemsInWorkHours,
            ConstraintKind::PersonalItemsOutsideWorkHours,
        ];
        if working_day { WORKING_DAY } else { EVERY_DAY }
    }

    #[inline]
    pub fn weight<C: SolverVariable>(self, weights: &ConstraintWeights<C>) -> C {
        match self {
            ConstraintKind::OverlappingTime => weights.overlap,
            ConstraintKind::WithinDayHours => weights.day_hours,
            ConstraintKind::AfterCurrentTime => weights.after_current_time,
            ConstraintKind::BeforeDeadline => weights.deadline,
            ConstraintKind::BreaksBetweenTasks => weights.breaks,
            ConstraintKind::HighPriorityFirst => weights.priority,
            ConstraintKind::WorkItemsInWorkHours => weights.work_hours,
            ConstraintKind::PersonalItemsOutsideWorkHours => weights.personal_hours,
        }
    }

    /// The score contribution of one violation of this constraint:
    /// `-weight` on the severity's channel.
    #[inline]
    pub fn penalty<T: SolverVariable, C: SolverVariable>(
        self,
        config: &SolveConfig<T, C>,
    ) -> Score<C> {
        let w = C::zero() - self.weight(&config.weights);
        match self.severity() {
            Severity::Hard => Score::of_hard(w),
            Severity::Soft => Score::of_soft(w),
        }
    }

    /// Whether this singleton constraint fires for `task`. Pairwise kinds
    /// always return `false` here.
    pub fn fires_single<T: SolverVariable, C: SolverVariable>(
        self,
        task: &Task<T>,
        config: &SolveConfig<T, C>,
    ) -> bool {
        match self {
            ConstraintKind::WithinDayHours => {
                !task.is_pinned()
                    && (task.start() < config.day_start || task.end() > config.day_end)
            }
            ConstraintKind::AfterCurrentTime => {
                !task.is_pinned() && task.start() < config.current_time
            }
            ConstraintKind::BeforeDeadline => {
                !task.is_pinned() && task.deadline().is_some_and(|d| d < task.end())
            }
            ConstraintKind::WorkItemsInWorkHours => {
                !task.is_pinned()
                    && task.category() == Category::Work
                    && (task.start() < config.work_start || task.end() > config.work_end)
            }
            ConstraintKind::PersonalItemsOutsideWorkHours => {
                !task.is_pinned()
                    && task.category() == Category::Personal
                    && task.start() > config.work_start
                    && task.end() < config.work_end
            }
            _ => false,
        }
    }

    /// Whether this pairwise constraint fires for the canonical pair
    /// `(first, second)` where `first` has the lower schedule index.
    /// Singleton kinds always return `false` here.
    pub fn fires_pair<T: SolverVariable, C: SolverVariable>(
        self,
        first: &Task<T>,
        second: &Task<T>,
        _config: &SolveConfig<T, C>,
    ) -> bool {
        match self {
            ConstraintKind::OverlappingTime => first.interval().intersects(&second.interval()),
            ConstraintKind::BreaksBetweenTasks => {
                // The second conjunct is implied by the first; kept as-is
                // for parity with the source rule.
                first.buffered_interval().intersects(&second.buffered_interval())
                    && first.start() < second.end_with_buffer()
            }
            ConstraintKind::HighPriorityFirst => {
                if first.priority() == second.priority() {
                    return false;
                }
                let (urgent, relaxed) = if first.priority() > second.priority() {
                    (first, second)
                } else {
                    (second, first)
                };
                urgent.start() > relaxed.start()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::time::{TimeDelta, TimePoint};
    use agenda_model::{id::TaskId, task::Priority};

    fn task(id: u64, start: TimePoint<i64>, minutes: i64) -> Task<i64> {
        Task::new(
            TaskId::new(id),
            start,
            TimeDelta::new(minutes),
            TimeDelta::minutes(15),
            None,
            Priority::Medium,
            Category::Work,
            false,
        )
        .unwrap()
    }

    fn with_pinned(t: Task<i64>, pinned: bool) -> Task<i64> {
        Task::new(
            t.id(),
            t.start(),
            t.duration(),
            t.buffer(),
            t.deadline(),
            t.priority(),
            t.category(),
            pinned,
        )
        .unwrap()
    }

    fn with_priority(t: Task<i64>, priority: Priority) -> Task<i64> {
        Task::new(
            t.id(),
            t.start(),
            t.duration(),
            t.buffer(),
            t.deadline(),
            priority,
            t.category(),
            t.is_pinned(),
        )
        .unwrap()
    }

    fn with_category(t: Task<i64>, category: Category) -> Task<i64> {
        Task::new(
            t.id(),
            t.start(),
            t.duration(),
            t.buffer(),
            t.deadline(),
            t.priority(),
            category,
            t.is_pinned(),
        )
        .unwrap()
    }

    fn with_deadline(t: Task<i64>, deadline: TimePoint<i64>) -> Task<i64> {
        Task::new(
            t.id(),
            t.start(),
            t.duration(),
            t.buffer(),
            Some(deadline),
            t.priority(),
            t.category(),
            t.is_pinned(),
        )
        .unwrap()
    }

    #[test]
    fn test_active_set_gates_work_rules_by_weekday() {
        let weekday = ConstraintKind::active_set(true);
        let weekend = ConstraintKind::active_set(false);
        assert_eq!(weekday.len(), 8);
        assert_eq!(weekend.len(), 6);
        assert!(!weekend.contains(&ConstraintKind::WorkItemsInWorkHours));
        assert!(!weekend.contains(&ConstraintKind::PersonalItemsOutsideWorkHours));
    }

    #[test]
    fn test_overlap_fires_on_intersection_only() {
        let cfg = SolveConfig::default();
        let a = task(1, TimePoint::hm(9, 0), 60);
        let b = task(2, TimePoint::hm(9, 30), 60);
        let c = task(3, TimePoint::hm(10, 0), 60);
        assert!(ConstraintKind::OverlappingTime.fires_pair(&a, &b, &cfg));
        // Back-to-back is not overlap.
        assert!(!ConstraintKind::OverlappingTime.fires_pair(&a, &c, &cfg));
    }

    #[test]
    fn test_overlap_has_no_pinned_exemption() {
        let cfg = SolveConfig::default();
        let a = with_pinned(task(1, TimePoint::hm(9, 0), 60), true);
        let b = with_pinned(task(2, TimePoint::hm(9, 30), 60), true);
        assert!(ConstraintKind::OverlappingTime.fires_pair(&a, &b, &cfg));
    }

    #[test]
    fn test_day_hours_fires_outside_window_and_exempts_pinned() {
        let cfg = SolveConfig::default();
        let early = task(1, TimePoint::hm(8, 0), 60);
        assert!(ConstraintKind::WithinDayHours.fires_single(&early, &cfg));
        let late = task(2, TimePoint::hm(21, 30), 60);
        assert!(ConstraintKind::WithinDayHours.fires_single(&late, &cfg));
        let inside = task(3, TimePoint::hm(12, 0), 60);
        assert!(!ConstraintKind::WithinDayHours.fires_single(&inside, &cfg));
        // Pinned at 08:00-09:00, before day start: not penalized.
        let pinned_early = with_pinned(early, true);
        assert!(!ConstraintKind::WithinDayHours.fires_single(&pinned_early, &cfg));
    }

    #[test]
    fn test_after_current_time() {
        let cfg = SolveConfig::default().with_current_time(TimePoint::hm(12, 0));
        let before = task(1, TimePoint::hm(11, 0), 30);
        let after = task(2, TimePoint::hm(12, 0), 30);
        assert!(ConstraintKind::AfterCurrentTime.fires_single(&before, &cfg));
        assert!(!ConstraintKind::AfterCurrentTime.fires_single(&after, &cfg));
        assert!(!ConstraintKind::AfterCurrentTime.fires_single(&with_pinned(before, true), &cfg));
    }

    #[test]
    fn test_deadline_fires_when_end_slips_past() {
        let cfg = SolveConfig::default();
        let t = with_deadline(task(1, TimePoint::hm(10, 0), 60), TimePoint::hm(10, 30));
        assert!(ConstraintKind::BeforeDeadline.fires_single(&t, &cfg));
        let ok = with_deadline(task(2, TimePoint::hm(10, 0), 60), TimePoint::hm(11, 0));
        assert!(!ConstraintKind::BeforeDeadline.fires_single(&ok, &cfg));
        let none = task(3, TimePoint::hm(10, 0), 60);
        assert!(!ConstraintKind::BeforeDeadline.fires_single(&none, &cfg));
    }

    #[test]
    fn test_breaks_fires_on_buffered_overlap() {
        let cfg = SolveConfig::default();
        // a: 09:00-10:00, buffered to 10:15. b at 10:05 violates the break.
        let a = task(1, TimePoint::hm(9, 0), 60);
        let b = task(2, TimePoint::hm(10, 5), 60);
        assert!(ConstraintKind::BreaksBetweenTasks.fires_pair(&a, &b, &cfg));
        // b at 10:15 leaves the full break.
        let c = task(3, TimePoint::hm(10, 15), 60);
        assert!(!ConstraintKind::BreaksBetweenTasks.fires_pair(&a, &c, &cfg));
    }

    #[test]
    fn test_high_priority_first_fires_once_per_misordered_pair() {
        let cfg = SolveConfig::default();
        let low_early = with_priority(task(1, TimePoint::hm(10, 0), 60), Priority::Low);
        let high_late = with_priority(task(2, TimePoint::hm(14, 0), 60), Priority::High);
        // Fires regardless of which member is "first" in the pair.
        assert!(ConstraintKind::HighPriorityFirst.fires_pair(&low_early, &high_late, &cfg));
        assert!(ConstraintKind::HighPriorityFirst.fires_pair(&high_late, &low_early, &cfg));
        // Correct order: high before low.
        let high_early = with_priority(task(3, TimePoint::hm(9, 0), 60), Priority::High);
        assert!(!ConstraintKind::HighPriorityFirst.fires_pair(&high_early, &low_early, &cfg));
        // Equal priorities never fire.
        let low_late = with_priority(task(4, TimePoint::hm(15, 0), 60), Priority::Low);
        assert!(!ConstraintKind::HighPriorityFirst.fires_pair(&low_early, &low_late, &cfg));
    }

    #[test]
    fn test_work_hours_constraint() {
        let cfg = SolveConfig::default();
        let evening = task(1, TimePoint::hm(20, 0), 60);
        assert!(ConstraintKind::WorkItemsInWorkHours.fires_single(&evening, &cfg));
        let midday = task(2, TimePoint::hm(12, 0), 60);
        assert!(!ConstraintKind::WorkItemsInWorkHours.fires_single(&midday, &cfg));
        let personal = with_category(evening.clone(), Category::Personal);
        assert!(!ConstraintKind::WorkItemsInWorkHours.fires_single(&personal, &cfg));
    }

    #[test]
    fn test_personal_outside_work_hours_constraint() {
        let cfg = SolveConfig::default();
        // Entirely inside work hours: penalized.
        let inside = with_category(task(1, TimePoint::hm(12, 0), 60), Category::Personal);
        assert!(ConstraintKind::PersonalItemsOutsideWorkHours.fires_single(&inside, &cfg));
        // Starting exactly at work start is not strictly inside.
        let at_start = with_category(task(2, TimePoint::hm(11, 0), 60), Category::Personal);
        assert!(!ConstraintKind::PersonalItemsOutsideWorkHours.fires_single(&at_start, &cfg));
        let evening = with_category(task(3, TimePoint::hm(20, 0), 60), Category::Personal);
        assert!(!ConstraintKind::PersonalItemsOutsideWorkHours.fires_single(&evening, &cfg));
    }

    #[test]
    fn test_penalty_uses_weight_and_severity_channel() {
        let mut cfg: SolveConfig<i64, i64> = SolveConfig::default();
        cfg.weights.overlap = 3;
        cfg.weights.breaks = 2;
        assert_eq!(
            ConstraintKind::OverlappingTime.penalty(&cfg),
            Score::of_hard(-3)
        );
        assert_eq!(
            ConstraintKind::BreaksBetweenTasks.penalty(&cfg),
            Score::of_soft(-2)
        );
    }
}
