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

use crate::{
    err::ConfigError,
    state::{
        cost::{Cost, CostDelta},
        moves::Move,
        pattern_set::PatternSet,
    },
};
use pixelrun_model::pattern::Pattern;

/// Encoding weights of the secondary objective.
///
/// A single-cell pattern costs `pixel_weight`, any longer run costs
/// `run_weight`. `tie_break` scales the weight delta when it is folded into
/// the scalar energy used by the acceptance test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    pub pixel_weight: u32,
    pub run_weight: u32,
    pub tie_break: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            pixel_weight: 2,
            run_weight: 1,
            tie_break: 0.1,
        }
    }
}

impl CostWeights {
    #[inline]
    pub fn weight_of(&self, p: &Pattern) -> u64 {
        if p.is_single() {
            self.pixel_weight as u64
        } else {
            self.run_weight as u64
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_weight == 0 || self.pixel_weight < self.run_weight {
            return Err(ConfigError::CostWeights {
                pixel_weight: self.pixel_weight,
                run_weight: self.run_weight,
            });
        }
        if !(self.tie_break.is_finite() && (0.0..1.0).contains(&self.tie_break)) {
            return Err(ConfigError::TieBreak(self.tie_break));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostFunction {
    weights: CostWeights,
}

impl CostFunction {
    #[inline]
    pub fn new(weights: CostWeights) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Cost of the whole set. O(1): the set keeps its totals up to date.
    #[inline]
    pub fn evaluate(&self, set: &PatternSet) -> Cost {
        set.cost(&self.weights)
    }

    /// Cost change of committing `mv`, read off the move alone.
    pub fn delta(&self, mv: &Move, set: &PatternSet) -> CostDelta {
        let mut weight = 0i64;
        for p in mv.added() {
            weight += self.weights.weight_of(p) as i64;
        }
        let mut removed = 0i64;
        for p in mv.removed().iter().filter_map(|&id| set.get(id)) {
            removed += 1;
            weight -= self.weights.weight_of(p) as i64;
        }
        CostDelta::new(mv.added().len() as i64 - removed, weight)
    }

    /// Scalar energy for the Metropolis test. The weight part never
    /// outweighs a single pattern.
    #[inline]
    pub fn energy(&self, delta: &CostDelta) -> f64 {
        delta.patterns as f64 + self.weights.tie_break * delta.weight as f64
    }
}
