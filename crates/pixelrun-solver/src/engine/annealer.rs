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
    config::CalibrationConfig,
    engine::{
        acceptor::metropolis,
        temperature::{TemperatureSchedule, calibrate},
    },
    err::{InvariantViolation, ViolationCause},
    eval::cost::CostFunction,
    search::generator::MoveGenerator,
    state::{cost::CostDelta, moves::Move, pattern_set::PatternSet},
};
use fixedbitset::FixedBitSet;
use pixelrun_model::grid::Grid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// What to verify after every committed move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommitCheck {
    #[default]
    Off,
    /// The whole grid must stay covered exactly.
    Full,
    /// Exactly the given cells must stay covered; used by nested passes
    /// that hold only part of the grid.
    Region(FixedBitSet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The generator found no valid move; nothing was evaluated.
    Exhausted,
    Rejected(CostDelta),
    Accepted(CostDelta),
}

impl StepOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepCounters {
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub exhausted: u64,
}

/// One propose / evaluate / accept-or-reject / cool cycle.
///
/// Owns everything a single search stream needs, so the main loop and every
/// nested cluster pass run on independent instances.
#[derive(Debug)]
pub struct Annealer {
    generator: MoveGenerator,
    cost: CostFunction,
    schedule: TemperatureSchedule,
    rng: ChaCha8Rng,
    check: CommitCheck,
    counters: StepCounters,
}

impl Annealer {
    pub fn new(
        generator: MoveGenerator,
        cost: CostFunction,
        schedule: TemperatureSchedule,
        seed: u64,
        check: CommitCheck,
    ) -> Self {
        Self {
            generator,
            cost,
            schedule,
            rng: ChaCha8Rng::seed_from_u64(seed),
            check,
            counters: StepCounters::default(),
        }
    }

    #[inline]
    pub fn schedule(&self) -> &TemperatureSchedule {
        &self.schedule
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.schedule.current()
    }

    #[inline]
    pub fn cost_function(&self) -> &CostFunction {
        &self.cost
    }

    #[inline]
    pub fn counters(&self) -> &StepCounters {
        &self.counters
    }

    #[inline]
    pub fn generator(&self) -> &MoveGenerator {
        &self.generator
    }

    /// Draws `cfg.samples` candidates on `state` without committing them and
    /// restarts the schedule at the calibrated start and floor temperatures.
    /// Leaves the schedule alone and returns `None` when no sample changed
    /// the energy.
    pub fn calibrate(
        &mut self,
        state: &PatternSet,
        grid: &Grid,
        cfg: &CalibrationConfig,
    ) -> Option<(f64, f64)> {
        let mut energies = Vec::with_capacity(cfg.samples);
        for _ in 0..cfg.samples {
            let mv = self.generator.propose(state, grid, &mut self.rng);
            if !mv.is_noop() {
                energies.push(self.cost.energy(&self.cost.delta(&mv, state)));
            }
        }
        let (start, floor) = calibrate(&energies, cfg)?;
        self.schedule = TemperatureSchedule::new(start, self.schedule.cooling_rate(), floor);
        Some((start, floor))
    }

    pub fn step(
        &mut self,
        state: &mut PatternSet,
        grid: &Grid,
    ) -> Result<StepOutcome, InvariantViolation> {
        self.generator.retune(self.schedule.ratio());
        let mv = self.generator.propose(state, grid, &mut self.rng);
        let outcome = if mv.is_noop() {
            self.counters.exhausted += 1;
            StepOutcome::Exhausted
        } else {
            let delta = self.cost.delta(&mv, state);
            let energy = self.cost.energy(&delta);
            let (t, t_min) = (self.schedule.current(), self.schedule.min_temperature());
            // Only worsening moves above the floor consume a draw.
            let draw = if energy > 0.0 && t > t_min {
                self.rng.random::<f64>()
            } else {
                0.0
            };
            if metropolis(energy, t, t_min, draw) {
                tracing::trace!(%mv, %delta, "accepted");
                self.commit(mv, state, grid)?;
                self.counters.accepted += 1;
                StepOutcome::Accepted(delta)
            } else {
                self.counters.rejected += 1;
                StepOutcome::Rejected(delta)
            }
        };
        self.schedule.advance();
        self.counters.iterations += 1;
        Ok(outcome)
    }

    fn commit(
        &self,
        mv: Move,
        state: &mut PatternSet,
        grid: &Grid,
    ) -> Result<(), InvariantViolation> {
        let before = match self.check {
            CommitCheck::Off => None,
            _ => Some(state.to_vec()),
        };
        if let Err(e) = state.apply(mv.clone(), grid) {
            let snapshot = state.to_vec();
            return Err(InvariantViolation::new(
                mv,
                snapshot.clone(),
                snapshot,
                ViolationCause::Commit(e),
            ));
        }
        let Some(before) = before else {
            return Ok(());
        };
        let checked = match &self.check {
            CommitCheck::Off => Ok(()),
            CommitCheck::Full => state.check_coverage(grid),
            CommitCheck::Region(region) => state.check_region(grid, region),
        };
        checked.map_err(|e| {
            InvariantViolation::new(mv, before, state.to_vec(), ViolationCause::Coverage(e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{AnnealingConfig, MoveWeights},
        eval::cost::CostWeights,
        state::moves::MoveKind,
    };
    use pixelrun_model::common::ColorIndex;

    const A: Option<ColorIndex> = Some(ColorIndex::new(0));

    fn annealer(weights: MoveWeights, seed: u64, check: CommitCheck) -> Annealer {
        Annealer::new(
            MoveGenerator::new(&weights, 8).unwrap(),
            CostFunction::new(CostWeights::default()),
            TemperatureSchedule::from_config(&AnnealingConfig::default()),
            seed,
            check,
        )
    }

    #[test]
    fn test_merges_are_always_accepted() {
        let g = Grid::from_rows(&[vec![A; 4]], 1).unwrap();
        let mut set = PatternSet::trivial(&g);
        let mut a = annealer(MoveWeights::only(MoveKind::Merge), 3, CommitCheck::Full);

        let mut accepted = 0;
        for _ in 0..50 {
            if a.step(&mut set, &g).unwrap().is_accepted() {
                accepted += 1;
            }
        }
        assert_eq!(set.len(), 1);
        assert_eq!(accepted, 3);
        assert_eq!(a.counters().iterations, 50);
        assert_eq!(a.counters().rejected, 0);
        assert_eq!(a.counters().exhausted, 50 - accepted);
        assert_eq!(a.schedule().iteration(), 50);
        assert!(set.covers(&g));
    }

    #[test]
    fn test_every_step_cools() {
        let g = Grid::from_rows(&[vec![A, None, A]], 1).unwrap();
        let mut set = PatternSet::trivial(&g);
        let mut a = annealer(MoveWeights::only(MoveKind::Merge), 0, CommitCheck::Off);
        let t0 = a.temperature();
        assert_eq!(a.step(&mut set, &g).unwrap(), StepOutcome::Exhausted);
        assert!(a.temperature() < t0);
    }

    #[test]
    fn test_default_mix_keeps_coverage() {
        let g = Grid::from_rows(
            &[vec![A, A, A, None], vec![A, None, A, A], vec![A, A, None, A]],
            1,
        )
        .unwrap();
        let mut set = PatternSet::trivial(&g);
        let mut a = annealer(MoveWeights::default(), 17, CommitCheck::Full);
        for _ in 0..500 {
            a.step(&mut set, &g).unwrap();
        }
        let c = a.counters();
        assert_eq!(c.accepted + c.rejected + c.exhausted, 500);
        assert!(set.covers(&g));
    }

    #[test]
    fn test_calibration_restarts_the_schedule() {
        let g = Grid::from_rows(&[vec![A; 6], vec![A; 6]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let mut a = annealer(MoveWeights::default(), 9, CommitCheck::Off);
        let cfg = CalibrationConfig::default();

        let (start, floor) = a.calibrate(&set, &g, &cfg).unwrap();
        assert!(floor < start);
        assert_eq!(a.temperature(), start);
        assert_eq!(a.schedule().min_temperature(), floor);
        assert_eq!(a.schedule().iteration(), 0);
        assert_eq!(set, PatternSet::trivial(&g));

        let mut b = annealer(MoveWeights::default(), 9, CommitCheck::Off);
        assert_eq!(b.calibrate(&set, &g, &cfg), Some((start, floor)));
    }

    #[test]
    fn test_calibration_without_moves_keeps_schedule() {
        let g = Grid::from_rows(&[vec![A, None, A]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let mut a = annealer(MoveWeights::only(MoveKind::Merge), 0, CommitCheck::Off);
        let before = a.schedule().clone();
        assert_eq!(a.calibrate(&set, &g, &CalibrationConfig::default()), None);
        assert_eq!(a.schedule(), &before);
    }

    #[test]
    fn test_region_check_on_partial_set() {
        let g = Grid::from_rows(&[vec![A; 4], vec![A; 4]], 1).unwrap();
        let top: Vec<_> = PatternSet::trivial(&g)
            .patterns()
            .filter(|p| p.origin().y == 0)
            .copied()
            .collect();
        let mut region = FixedBitSet::with_capacity(g.len());
        region.insert_range(0..4);

        let mut set = PatternSet::from_patterns(&g, top).unwrap();
        let mut a = annealer(MoveWeights::default(), 5, CommitCheck::Region(region.clone()));
        for _ in 0..200 {
            a.step(&mut set, &g).unwrap();
        }
        assert_eq!(set.check_region(&g, &region), Ok(()));
    }
}
