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

/// Change of a [`Cost`] caused by one move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CostDelta {
    pub patterns: i64,
    pub weight: i64,
}

impl CostDelta {
    #[inline]
    pub const fn new(patterns: i64, weight: i64) -> Self {
        Self { patterns, weight }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.patterns == 0 && self.weight == 0
    }

    /// Lexicographically negative: fewer patterns, or equal count and a
    /// lighter encoding.
    #[inline]
    pub const fn is_improving(&self) -> bool {
        self.patterns < 0 || (self.patterns == 0 && self.weight < 0)
    }
}

impl std::fmt::Display for CostDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CostDelta(patterns: {:+}, weight: {:+})",
            self.patterns, self.weight
        )
    }
}

impl std::ops::Add for CostDelta {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            patterns: self.patterns + rhs.patterns,
            weight: self.weight + rhs.weight,
        }
    }
}

impl std::ops::AddAssign for CostDelta {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.patterns += rhs.patterns;
        self.weight += rhs.weight;
    }
}

/// Objective value of a pattern set.
///
/// Ordered lexicographically: the pattern count dominates, the encoding
/// weight only breaks ties.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cost {
    pub patterns: usize,
    pub weight: u64,
}

impl Cost {
    #[inline]
    pub const fn new(patterns: usize, weight: u64) -> Self {
        Self { patterns, weight }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Applies `delta`, saturating at zero.
    #[inline]
    pub fn apply(self, delta: CostDelta) -> Cost {
        Cost {
            patterns: self.patterns.saturating_add_signed(delta.patterns as isize),
            weight: self.weight.saturating_add_signed(delta.weight),
        }
    }

    /// `other - self` as a signed delta.
    #[inline]
    pub fn delta_to(self, other: Cost) -> CostDelta {
        CostDelta {
            patterns: other.patterns as i64 - self.patterns as i64,
            weight: other.weight as i64 - self.weight as i64,
        }
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cost(patterns: {}, weight: {})",
            self.patterns, self.weight
        )
    }
}
