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

//! Input validation errors. Malformed tasks are rejected before a solve
//! starts; everything recoverable after that point is a result state, not
//! an error.

use crate::id::TaskId;
use agenda_core::{
    SolverVariable,
    time::{TimeDelta, TimePoint},
};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonPositiveDurationError<T: SolverVariable> {
    id: TaskId,
    duration: TimeDelta<T>,
}

impl<T: SolverVariable> NonPositiveDurationError<T> {
    #[inline]
    pub fn new(id: TaskId, duration: TimeDelta<T>) -> Self {
        Self { id, duration }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn duration(&self) -> TimeDelta<T> {
        self.duration
    }
}

impl<T: SolverVariable + Display> Display for NonPositiveDurationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} has non-positive duration {}",
            self.id, self.duration
        )
    }
}

impl<T: SolverVariable + Display> std::error::Error for NonPositiveDurationError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeadlineBeforeDayStartError<T: SolverVariable> {
    id: TaskId,
    deadline: TimePoint<T>,
    day_start: TimePoint<T>,
}

impl<T: SolverVariable> DeadlineBeforeDayStartError<T> {
    #[inline]
    pub fn new(id: TaskId, deadline: TimePoint<T>, day_start: TimePoint<T>) -> Self {
        Self {
            id,
            deadline,
            day_start,
        }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn deadline(&self) -> TimePoint<T> {
        self.deadline
    }

    #[inline]
    pub fn day_start(&self) -> TimePoint<T> {
        self.day_start
    }
}

impl<T: SolverVariable + Display> Display for DeadlineBeforeDayStartError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task {} has deadline {} before day start {}",
            self.id, self.deadline, self.day_start
        )
    }
}

impl<T: SolverVariable + Display> std::error::Error for DeadlineBeforeDayStartError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError<T: SolverVariable> {
    NonPositiveDuration(NonPositiveDurationError<T>),
    NegativeBuffer { id: TaskId, buffer: TimeDelta<T> },
    DeadlineBeforeDayStart(DeadlineBeforeDayStartError<T>),
    DuplicateTaskId(TaskId),
}

impl<T: SolverVariable + Display> Display for ValidationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NonPositiveDuration(e) => write!(f, "{e}"),
            ValidationError::NegativeBuffer { id, buffer } => {
                write!(f, "Task {id} has negative buffer {buffer}")
            }
            ValidationError::DeadlineBeforeDayStart(e) => write!(f, "{e}"),
            ValidationError::DuplicateTaskId(id) => write!(f, "Duplicate task ID: {id}"),
        }
    }
}

impl<T: SolverVariable + Display> std::error::Error for ValidationError<T> {}
