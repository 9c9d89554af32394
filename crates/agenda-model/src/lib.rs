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

//! # Scheduling Model
//!
//! The problem model for single-day todo scheduling: tasks with durations,
//! deadlines, priorities and a pinned flag; the mutable schedule the solver
//! works on; the immutable per-solve configuration; and the outcome types
//! handed back to the caller.

pub mod config;
pub mod err;
pub mod id;
pub mod outcome;
pub mod schedule;
pub mod task;

pub mod prelude {
    pub use crate::config::{SolveBudget, SolveConfig};
    pub use crate::err::ValidationError;
    pub use crate::id::TaskId;
    pub use crate::outcome::{ConstraintReport, SolveOutcome};
    pub use crate::schedule::{Problem, Schedule};
    pub use crate::task::{Category, Priority, Task};
}
