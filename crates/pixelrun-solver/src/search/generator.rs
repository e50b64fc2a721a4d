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
    config::MoveWeights,
    err::{ConfigError, MoveExhaustion},
    search::{operator::MoveOperator, operator_library::operator_for},
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::grid::Grid;
use rand::distr::{Distribution, weighted::WeightedIndex};
use rand_chacha::ChaCha8Rng;

/// Per-operator proposal counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperatorStats {
    /// Times the operator was selected.
    pub selected: u64,
    /// Selections that produced no candidate at all.
    pub empty: u64,
    /// Candidates rejected by validation.
    pub invalid: u64,
    /// Candidates handed to the caller.
    pub valid: u64,
}

/// Steps of the temperature ratio at which biased weights are rebuilt.
const BIAS_STEPS: f64 = 64.0;

/// Weight multiplier of `kind` at temperature ratio `t = T / T0`.
///
/// Merging families gain weight while hot (`1 + 2t`); breaking families
/// gain weight as the search cools (`0.5 + 2(1 - t)`).
pub fn temperature_bias(kind: MoveKind, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match kind {
        MoveKind::Merge | MoveKind::Extend => 1.0 + 2.0 * t,
        MoveKind::Shatter | MoveKind::Split => 0.5 + 2.0 * (1.0 - t),
        _ => 1.0,
    }
}

/// Picks a move family by weight, asks its operator for a candidate and
/// validates it, retrying up to `max_attempts` times.
pub struct MoveGenerator {
    operators: Vec<Box<dyn MoveOperator>>,
    base: Vec<f64>,
    weights: Vec<f64>,
    selector: WeightedIndex<f64>,
    max_attempts: usize,
    stats: Vec<OperatorStats>,
    biased: bool,
    bias_step: Option<u32>,
}

impl std::fmt::Debug for MoveGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveGenerator")
            .field(
                "operators",
                &self.operators.iter().map(|o| o.name()).collect::<Vec<_>>(),
            )
            .field("weights", &self.weights)
            .field("max_attempts", &self.max_attempts)
            .field("biased", &self.biased)
            .finish()
    }
}

impl MoveGenerator {
    /// Built-in operators for every family with a positive weight.
    pub fn new(weights: &MoveWeights, max_attempts: usize) -> Result<Self, ConfigError> {
        weights.validate()?;
        let entries = MoveKind::SEARCH
            .into_iter()
            .filter(|&k| weights.weight(k) > 0.0)
            .filter_map(|k| operator_for(k).map(|op| (op, weights.weight(k))))
            .collect();
        Self::from_operators(entries, max_attempts)
    }

    pub fn from_operators(
        entries: Vec<(Box<dyn MoveOperator>, f64)>,
        max_attempts: usize,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroMoveAttempts);
        }
        for (op, w) in &entries {
            if !(w.is_finite() && *w >= 0.0) {
                return Err(ConfigError::MoveWeight {
                    kind: op.kind(),
                    value: *w,
                });
            }
        }
        let selector = WeightedIndex::new(entries.iter().map(|(_, w)| *w))
            .map_err(|_| ConfigError::NoMoveWeights)?;
        let (operators, base): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let stats = vec![OperatorStats::default(); operators.len()];
        Ok(Self {
            operators,
            weights: base.clone(),
            base,
            selector,
            max_attempts,
            stats,
            biased: false,
            bias_step: None,
        })
    }

    /// Lets [`MoveGenerator::retune`] scale the weights by temperature.
    pub fn with_temperature_bias(mut self, enabled: bool) -> Self {
        self.biased = enabled;
        self
    }

    #[inline]
    pub fn is_biased(&self) -> bool {
        self.biased
    }

    /// Effective selection weights in operator order.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Rescales the configured weights with [`temperature_bias`] for the
    /// temperature ratio `ratio`. A no-op for unbiased generators and while
    /// the ratio stays in the same step.
    pub fn retune(&mut self, ratio: f64) {
        if !self.biased {
            return;
        }
        let step = (ratio.clamp(0.0, 1.0) * BIAS_STEPS).round() as u32;
        if self.bias_step == Some(step) {
            return;
        }
        let t = step as f64 / BIAS_STEPS;
        let weights: Vec<f64> = self
            .operators
            .iter()
            .zip(&self.base)
            .map(|(op, w)| w * temperature_bias(op.kind(), t))
            .collect();
        match WeightedIndex::new(weights.iter().copied()) {
            Ok(selector) => {
                self.selector = selector;
                self.weights = weights;
                self.bias_step = Some(step);
            }
            Err(e) => tracing::warn!(error = %e, "keeping previous move weights"),
        }
    }

    #[inline]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn operator_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operators.iter().map(|o| o.name())
    }

    /// Counters in operator order, paired with the operator name.
    pub fn stats(&self) -> impl Iterator<Item = (&'static str, &OperatorStats)> + '_ {
        self.operators
            .iter()
            .map(|o| o.name())
            .zip(self.stats.iter())
    }

    /// A validated move, or [`MoveExhaustion`] once the attempt budget is
    /// spent.
    pub fn try_propose(
        &mut self,
        set: &PatternSet,
        grid: &Grid,
        rng: &mut ChaCha8Rng,
    ) -> Result<Move, MoveExhaustion> {
        for _ in 0..self.max_attempts {
            let idx = self.selector.sample(rng);
            let stats = &mut self.stats[idx];
            stats.selected += 1;
            let Some(mv) = self.operators[idx].propose(set, grid, rng) else {
                stats.empty += 1;
                continue;
            };
            match set.validate_move(&mv, grid) {
                Ok(()) => {
                    stats.valid += 1;
                    return Ok(mv);
                }
                Err(e) => {
                    stats.invalid += 1;
                    tracing::trace!(
                        operator = self.operators[idx].name(),
                        error = %e,
                        "discarded invalid candidate"
                    );
                }
            }
        }
        Err(MoveExhaustion::new(self.max_attempts))
    }

    /// Like [`MoveGenerator::try_propose`] but yields [`Move::noop`] on
    /// exhaustion.
    #[inline]
    pub fn propose(&mut self, set: &PatternSet, grid: &Grid, rng: &mut ChaCha8Rng) -> Move {
        self.try_propose(set, grid, rng)
            .unwrap_or_else(|_| Move::noop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::common::ColorIndex;
    use rand::SeedableRng;

    const A: ColorIndex = ColorIndex::new(0);
    const B: ColorIndex = ColorIndex::new(1);

    fn checkerboard() -> Grid {
        Grid::from_rows(
            &[
                vec![Some(A), Some(B), Some(A)],
                vec![Some(B), Some(A), Some(B)],
                vec![Some(A), Some(B), Some(A)],
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_exhaustion_yields_noop() {
        let g = checkerboard();
        let set = PatternSet::trivial(&g);
        let mut generator = MoveGenerator::new(&MoveWeights::only(MoveKind::Merge), 5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(
            generator.try_propose(&set, &g, &mut rng),
            Err(MoveExhaustion::new(5))
        );
        assert!(generator.propose(&set, &g, &mut rng).is_noop());

        let (name, stats) = generator.stats().next().unwrap();
        assert_eq!(name, "Merge");
        assert_eq!(stats.selected, 10);
        assert_eq!(stats.valid, 0);
    }

    #[test]
    fn test_proposals_are_valid() {
        let g = Grid::from_rows(&[vec![Some(A); 6], vec![Some(A); 6]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let mut generator = MoveGenerator::new(&MoveWeights::default(), 16).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let mv = generator.propose(&set, &g, &mut rng);
            assert_eq!(set.validate_move(&mv, &g), Ok(()));
        }
    }

    #[test]
    fn test_zero_weight_families_are_never_selected() {
        let g = Grid::from_rows(&[vec![Some(A); 4]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let mut generator =
            MoveGenerator::new(&MoveWeights::only(MoveKind::Reorient), 4).unwrap();
        assert_eq!(generator.operator_names().collect::<Vec<_>>(), vec!["Reorient"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(generator.propose(&set, &g, &mut rng).kind(), MoveKind::Reorient);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let g = Grid::from_rows(&[vec![Some(A); 5], vec![Some(B); 5]], 2).unwrap();
        let set = PatternSet::trivial(&g);
        let run = || {
            let mut generator = MoveGenerator::new(&MoveWeights::default(), 16).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            (0..100)
                .map(|_| generator.propose(&set, &g, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_bias_shifts_weight_from_merging_to_breaking() {
        let weights = MoveWeights::only(MoveKind::Merge).with(MoveKind::Shatter, 1.0);
        let mut generator = MoveGenerator::new(&weights, 4)
            .unwrap()
            .with_temperature_bias(true);
        let names: Vec<_> = generator.operator_names().collect();
        let merge = names.iter().position(|n| *n == "Merge").unwrap();
        let shatter = names.iter().position(|n| *n == "Shatter").unwrap();

        generator.retune(1.0);
        assert_eq!(generator.weights()[merge], 3.0);
        assert_eq!(generator.weights()[shatter], 0.5);

        generator.retune(0.0);
        assert_eq!(generator.weights()[merge], 1.0);
        assert_eq!(generator.weights()[shatter], 2.5);

        let g = Grid::from_rows(&[vec![Some(A); 4]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..400 {
            generator.propose(&set, &g, &mut rng);
        }
        let selected: Vec<u64> = generator.stats().map(|(_, s)| s.selected).collect();
        assert!(selected[shatter] > selected[merge]);
    }

    #[test]
    fn test_unbiased_generator_ignores_temperature() {
        let mut generator = MoveGenerator::new(&MoveWeights::default(), 4).unwrap();
        let before = generator.weights().to_vec();
        generator.retune(0.0);
        assert!(!generator.is_biased());
        assert_eq!(generator.weights(), &before[..]);
        assert_eq!(temperature_bias(MoveKind::Relocate, 0.3), 1.0);
    }

    #[test]
    fn test_rejects_bad_setup() {
        assert!(matches!(
            MoveGenerator::new(&MoveWeights::none(), 4),
            Err(ConfigError::NoMoveWeights)
        ));
        assert!(matches!(
            MoveGenerator::new(&MoveWeights::default(), 0),
            Err(ConfigError::ZeroMoveAttempts)
        ));
    }
}
