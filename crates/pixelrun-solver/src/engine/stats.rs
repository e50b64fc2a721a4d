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
use pixelrun_model::solution::{PatternCounts, Solution};
use std::time::Duration;

/// Why the main loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Temperature at its floor and no improvement for a full window since
    /// the last cluster pass.
    Frozen,
    IterationBudget,
    LowerBoundReached,
    Stopped,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Frozen => write!(f, "frozen"),
            TerminationReason::IterationBudget => write!(f, "iteration budget"),
            TerminationReason::LowerBoundReached => write!(f, "lower bound reached"),
            TerminationReason::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveStats {
    pub initial_cost: Cost,
    pub final_cost: Cost,
    pub lower_bound: usize,
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
    /// Iterations in which the generator produced no valid move.
    pub exhausted: u64,
    pub cluster_passes: u64,
    pub improved_clusters: u64,
    pub elapsed: Duration,
    pub termination: TerminationReason,
    pub counts: PatternCounts,
}

impl SolveStats {
    /// Fraction of evaluated moves that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        let evaluated = self.accepted + self.rejected;
        if evaluated == 0 {
            0.0
        } else {
            self.accepted as f64 / evaluated as f64
        }
    }
}

impl std::fmt::Display for SolveStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolveStats({} -> {} patterns, bound {}, {} iterations, {} accepted, {} rejected, {} exhausted, {} cluster passes, {:.3}s, {})",
            self.initial_cost.patterns,
            self.final_cost.patterns,
            self.lower_bound,
            self.iterations,
            self.accepted,
            self.rejected,
            self.exhausted,
            self.cluster_passes,
            self.elapsed.as_secs_f64(),
            self.termination
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub solution: Solution,
    pub stats: SolveStats,
}

impl SolveResult {
    #[inline]
    pub fn into_parts(self) -> (Solution, SolveStats) {
        (self.solution, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(accepted: u64, rejected: u64) -> SolveStats {
        SolveStats {
            initial_cost: Cost::new(5, 10),
            final_cost: Cost::new(1, 1),
            lower_bound: 1,
            iterations: 12,
            accepted,
            rejected,
            exhausted: 12 - accepted - rejected,
            cluster_passes: 0,
            improved_clusters: 0,
            elapsed: Duration::from_millis(1500),
            termination: TerminationReason::LowerBoundReached,
            counts: PatternCounts::default(),
        }
    }

    #[test]
    fn test_acceptance_rate() {
        assert_eq!(stats(0, 0).acceptance_rate(), 0.0);
        assert_eq!(stats(3, 1).acceptance_rate(), 0.75);
    }

    #[test]
    fn test_display_summarises_run() {
        assert_eq!(
            stats(4, 0).to_string(),
            "SolveStats(5 -> 1 patterns, bound 1, 12 iterations, 4 accepted, 0 rejected, 8 exhausted, 0 cluster passes, 1.500s, lower bound reached)"
        );
    }
}
