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

//! # Task Model
//!
//! The schedulable unit. A task owns its duration, buffer, optional
//! deadline, priority, category and pinned flag; only its start time is
//! ever mutated by the solver, and only when the task is not pinned.

use crate::{
    err::{NonPositiveDurationError, ValidationError},
    id::TaskId,
};
use agenda_core::{
    SolverVariable,
    time::{TimeDelta, TimeInterval, TimePoint},
};
use std::fmt::Display;

/// Urgency of a task; `High` is the most urgent and orders greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Personal,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Work => write!(f, "Work"),
            Category::Personal => write!(f, "Personal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task<T = i64>
where
    T: SolverVariable,
{
    id: TaskId,
    start: TimePoint<T>,
    duration: TimeDelta<T>,
    buffer: TimeDelta<T>,
    deadline: Option<TimePoint<T>>,
    priority: Priority,
    category: Category,
    pinned: bool,
}

impl<T: SolverVariable> Task<T> {
    /// Creates a task, rejecting non-positive durations and negative
    /// buffers up front.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TaskId,
        start: TimePoint<T>,
        duration: TimeDelta<T>,
        buffer: TimeDelta<T>,
        deadline: Option<TimePoint<T>>,
        priority: Priority,
        category: Category,
        pinned: bool,
    ) -> Result<Self, ValidationError<T>> {
        if !duration.is_positive() {
            return Err(ValidationError::NonPositiveDuration(
                NonPositiveDurationError::new(id, duration),
            ));
        }
        if buffer.is_negative() {
            return Err(ValidationError::NegativeBuffer { id, buffer });
        }
        Ok(Self {
            id,
            start,
            duration,
            buffer,
            deadline,
            priority,
            category,
            pinned,
        })
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn start(&self) -> TimePoint<T> {
        self.start
    }

    #[inline]
    pub fn duration(&self) -> TimeDelta<T> {
        self.duration
    }

    #[inline]
    pub fn buffer(&self) -> TimeDelta<T> {
        self.buffer
    }

    #[inline]
    pub fn deadline(&self) -> Option<TimePoint<T>> {
        self.deadline
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Derived end time `start + duration`.
    #[inline]
    pub fn end(&self) -> TimePoint<T> {
        self.start + self.duration
    }

    /// Derived end time including the trailing break buffer.
    #[inline]
    pub fn end_with_buffer(&self) -> TimePoint<T> {
        self.end() + self.buffer
    }

    /// The occupied interval `[start, end)`.
    #[inline]
    pub fn interval(&self) -> TimeInterval<T> {
        TimeInterval::new(self.start, self.end())
    }

    /// The interval `[start, end_with_buffer)` used for break spacing.
    #[inline]
    pub fn buffered_interval(&self) -> TimeInterval<T> {
        TimeInterval::new(self.start, self.end_with_buffer())
    }

    // Start mutation is gated through `Schedule`, which refuses to move
    // pinned tasks.
    pub(crate) fn set_start(&mut self, start: TimePoint<T>) {
        self.start = start;
    }
}
