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

use crate::state::cost::Cost;

/// Tracks the best cost of the last `window` iterations.
///
/// The buffer keeps `window + 1` entries so that a full buffer spans exactly
/// `window` iterations; the search is stagnant when all of them are equal.
#[derive(Clone, Debug)]
pub struct StagnationDetector {
    data: Vec<Cost>,
    head: usize,
    len: usize,
    cap: usize,
}

impl StagnationDetector {
    pub fn new(window: usize) -> Self {
        let cap = window.max(1) + 1;
        Self {
            data: vec![Cost::zero(); cap],
            head: 0,
            len: 0,
            cap,
        }
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.cap - 1
    }

    #[inline]
    pub fn record(&mut self, best: Cost) {
        self.data[self.head] = best;
        self.head = (self.head + 1) % self.cap;
        self.len = (self.len + 1).min(self.cap);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_stagnant(&self) -> bool {
        if self.len < self.cap {
            return false;
        }
        let first = self.data[self.head];
        self.data.iter().all(|c| *c == first)
    }

    /// Clears the history and starts over from `baseline`.
    pub fn reset(&mut self, baseline: Cost) {
        self.head = 0;
        self.len = 0;
        self.record(baseline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_full_window() {
        let mut d = StagnationDetector::new(3);
        d.reset(Cost::new(5, 5));
        d.record(Cost::new(5, 5));
        d.record(Cost::new(5, 5));
        assert!(!d.is_stagnant());
        d.record(Cost::new(5, 5));
        assert!(d.is_stagnant());
    }

    #[test]
    fn test_improvement_inside_window_is_not_stagnant() {
        let mut d = StagnationDetector::new(3);
        d.reset(Cost::new(6, 0));
        d.record(Cost::new(5, 0));
        d.record(Cost::new(5, 0));
        d.record(Cost::new(5, 0));
        assert!(!d.is_stagnant());
        d.record(Cost::new(5, 0));
        assert!(d.is_stagnant());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut d = StagnationDetector::new(1);
        d.reset(Cost::new(1, 1));
        d.record(Cost::new(1, 1));
        assert!(d.is_stagnant());
        d.reset(Cost::new(1, 1));
        assert!(!d.is_stagnant());
        assert_eq!(d.len(), 1);
        assert_eq!(d.window(), 1);
    }
}
