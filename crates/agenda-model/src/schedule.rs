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

//! # Schedule and Problem
//!
//! `Schedule` is the mutable state the search walks on: an ordered,
//! id-indexed collection of tasks whose non-pinned start times may change.
//! `Problem` bundles a validated schedule with its solve configuration and
//! is the unit handed to the solver.

use crate::{
    config::SolveConfig,
    err::{DeadlineBeforeDayStartError, ValidationError},
    id::TaskId,
    task::Task,
};
use agenda_core::{SolverVariable, time::TimePoint};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<T = i64>
where
    T: SolverVariable,
{
    tasks: Vec<Task<T>>,
    index: HashMap<TaskId, usize>,
}

impl<T: SolverVariable> Schedule<T> {
    /// Builds a schedule from caller-supplied tasks, rejecting duplicate
    /// ids. Insertion order is preserved and defines the canonical pair
    /// orientation used by the pairwise constraints.
    pub fn from_tasks(tasks: Vec<Task<T>>) -> Result<Self, ValidationError<T>> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id(), i).is_some() {
                return Err(ValidationError::DuplicateTaskId(task.id()));
            }
        }
        Ok(Self { tasks, index })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[inline]
    pub fn tasks(&self) -> &[Task<T>] {
        &self.tasks
    }

    #[inline]
    pub fn task(&self, index: usize) -> &Task<T> {
        &self.tasks[index]
    }

    #[inline]
    pub fn index_of(&self, id: TaskId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    #[inline]
    pub fn by_id(&self, id: TaskId) -> Option<&Task<T>> {
        self.index_of(id).map(|i| &self.tasks[i])
    }

    /// Moves a task's start time. Returns `false` without mutating when the
    /// task is pinned; pinned slots are immune to rescheduling.
    pub fn set_start(&mut self, index: usize, start: TimePoint<T>) -> bool {
        let task = &mut self.tasks[index];
        if task.is_pinned() {
            return false;
        }
        task.set_start(start);
        true
    }

    /// Indices of the tasks the solver is allowed to move.
    pub fn movable_indices(&self) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_pinned())
            .map(|(i, _)| i)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Problem<T = i64, C = i64>
where
    T: SolverVariable,
    C: SolverVariable,
{
    schedule: Schedule<T>,
    config: SolveConfig<T, C>,
}

impl<T: SolverVariable, C: SolverVariable> Problem<T, C> {
    /// Validates tasks against the configuration and builds the solve
    /// request. Duplicate ids and deadlines before the day start are
    /// caller errors and rejected here, before any search work happens.
    pub fn new(tasks: Vec<Task<T>>, config: SolveConfig<T, C>) -> Result<Self, ValidationError<T>> {
        for task in &tasks {
            if let Some(deadline) = task.deadline()
                && deadline < config.day_start
            {
                return Err(ValidationError::DeadlineBeforeDayStart(
                    DeadlineBeforeDayStartError::new(task.id(), deadline, config.day_start),
                ));
            }
        }
        let schedule = Schedule::from_tasks(tasks)?;
        Ok(Self { schedule, config })
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule<T> {
        &self.schedule
    }

    #[inline]
    pub fn config(&self) -> &SolveConfig<T, C> {
        &self.config
    }

    #[inline]
    pub fn into_parts(self) -> (Schedule<T>, SolveConfig<T, C>) {
        (self.schedule, self.config)
    }
}
