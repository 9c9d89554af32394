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

//! # Hard/Soft Score
//!
//! A two-level penalty score for ranking candidate schedules. The `hard`
//! channel counts infeasibilities, the `soft` channel counts preference
//! violations; comparison is lexicographic with `hard` dominating, so no
//! amount of soft gain can trade against a hard regression. Both channels
//! accumulate negative units from zero.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use num_traits::{CheckedAdd, CheckedSub, Zero};

/// Lexicographically ordered `(hard, soft)` penalty pair.
///
/// The derived `Ord` compares `hard` first, then `soft`, which is exactly
/// the required ranking: a schedule with a less-negative hard score is
/// strictly better regardless of its soft score.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Score<C> {
    hard: C,
    soft: C,
}

impl<C: Copy> Score<C> {
    #[inline]
    pub const fn new(hard: C, soft: C) -> Self {
        Score { hard, soft }
    }

    #[inline]
    pub const fn hard(self) -> C {
        self.hard
    }

    #[inline]
    pub const fn soft(self) -> C {
        self.soft
    }
}

impl<C: Copy + Zero> Score<C> {
    #[inline]
    pub fn zero() -> Self {
        Score::new(C::zero(), C::zero())
    }

    #[inline]
    pub fn of_hard(hard: C) -> Self {
        Score::new(hard, C::zero())
    }

    #[inline]
    pub fn of_soft(soft: C) -> Self {
        Score::new(C::zero(), soft)
    }

    /// A schedule is feasible exactly when it carries no hard penalty.
    #[inline]
    pub fn is_feasible(self) -> bool {
        self.hard.is_zero()
    }
}

impl<C: Copy + CheckedAdd> Score<C> {
    #[inline]
    pub fn checked_add(self, rhs: Score<C>) -> Option<Self> {
        let hard = self.hard.checked_add(&rhs.hard)?;
        let soft = self.soft.checked_add(&rhs.soft)?;
        Some(Score::new(hard, soft))
    }
}

impl<C: Copy + Display> Display for Score<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

impl<C: Copy + CheckedAdd> Add for Score<C> {
    type Output = Score<C>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("overflow in Score + Score")
    }
}

impl<C: Copy + CheckedAdd> AddAssign for Score<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<C: Copy + CheckedSub> Sub for Score<C> {
    type Output = Score<C>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        let hard = self
            .hard
            .checked_sub(&rhs.hard)
            .expect("underflow in Score - Score");
        let soft = self
            .soft
            .checked_sub(&rhs.soft)
            .expect("underflow in Score - Score");
        Score::new(hard, soft)
    }
}

impl<C: Copy + CheckedSub> SubAssign for Score<C> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<C: Copy + Zero + CheckedSub> Neg for Score<C> {
    type Output = Score<C>;

    fn neg(self) -> Self::Output {
        Score::zero() - self
    }
}

impl<C: Copy + Zero + CheckedAdd> Sum for Score<C> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Score::zero(), |acc, x| acc + x)
    }
}

impl<C: Copy + Zero + CheckedAdd> Zero for Score<C> {
    #[inline]
    fn zero() -> Self {
        Score::zero()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.hard.is_zero() && self.soft.is_zero()
    }
}

impl<C: Copy + Zero> Default for Score<C> {
    #[inline]
    fn default() -> Self {
        Score::zero()
    }
}
