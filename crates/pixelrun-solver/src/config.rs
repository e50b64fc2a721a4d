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
    engine::bound::LowerBoundKind, err::ConfigError, eval::cost::CostWeights,
    state::moves::MoveKind,
};

/// Derives the start and floor temperatures from the energies of sampled
/// candidate moves instead of taking them from [`AnnealingConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    /// Candidate moves drawn from the initial set.
    pub samples: usize,
    /// Acceptance probability of an average worsening move at the start.
    pub initial_acceptance: f64,
    /// Acceptance probability of the smallest worsening move at the floor.
    pub final_acceptance: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: 64,
            initial_acceptance: 0.4,
            final_acceptance: 0.01,
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::ZeroCalibrationSamples);
        }
        let (p0, p1) = (self.initial_acceptance, self.final_acceptance);
        if !(p1 > 0.0 && p1 < p0 && p0 < 1.0) {
            return Err(ConfigError::AcceptanceTargets {
                initial: p0,
                final_acceptance: p1,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingConfig {
    pub initial_temperature: f64,
    /// Geometric factor applied once per iteration.
    pub cooling_rate: f64,
    pub min_temperature: f64,
    /// When set, overrides both temperatures before the search starts.
    pub calibration: Option<CalibrationConfig>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 2.0,
            cooling_rate: 0.9995,
            min_temperature: 0.01,
            calibration: None,
        }
    }
}

impl AnnealingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t0 = self.initial_temperature;
        if !(t0.is_finite() && t0 > 0.0) {
            return Err(ConfigError::InitialTemperature(t0));
        }
        let a = self.cooling_rate;
        if !(a > 0.0 && a < 1.0) {
            return Err(ConfigError::CoolingRate(a));
        }
        let tmin = self.min_temperature;
        if !(tmin.is_finite() && tmin >= 0.0) {
            return Err(ConfigError::MinTemperature(tmin));
        }
        if let Some(c) = &self.calibration {
            c.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagnationConfig {
    /// Iterations without a new best before the search counts as stuck.
    /// Also the interval between stagnation checks.
    pub window: usize,
}

impl Default for StagnationConfig {
    fn default() -> Self {
        Self { window: 500 }
    }
}

/// Relative selection weights of the move families.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveWeights {
    pub extend: f64,
    pub shrink: f64,
    pub merge: f64,
    pub split: f64,
    pub reorient: f64,
    pub relocate: f64,
    pub shatter: f64,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            extend: 3.0,
            shrink: 1.0,
            merge: 3.0,
            split: 1.0,
            reorient: 0.5,
            relocate: 2.0,
            shatter: 0.1,
        }
    }
}

impl MoveWeights {
    /// All families disabled.
    pub fn none() -> Self {
        Self {
            extend: 0.0,
            shrink: 0.0,
            merge: 0.0,
            split: 0.0,
            reorient: 0.0,
            relocate: 0.0,
            shatter: 0.0,
        }
    }

    pub fn only(kind: MoveKind) -> Self {
        Self::none().with(kind, 1.0)
    }

    pub fn with(mut self, kind: MoveKind, weight: f64) -> Self {
        match kind {
            MoveKind::Extend => self.extend = weight,
            MoveKind::Shrink => self.shrink = weight,
            MoveKind::Merge => self.merge = weight,
            MoveKind::Split => self.split = weight,
            MoveKind::Reorient => self.reorient = weight,
            MoveKind::Relocate => self.relocate = weight,
            MoveKind::Shatter => self.shatter = weight,
            MoveKind::Reoptimize | MoveKind::Noop => {}
        }
        self
    }

    pub fn weight(&self, kind: MoveKind) -> f64 {
        match kind {
            MoveKind::Extend => self.extend,
            MoveKind::Shrink => self.shrink,
            MoveKind::Merge => self.merge,
            MoveKind::Split => self.split,
            MoveKind::Reorient => self.reorient,
            MoveKind::Relocate => self.relocate,
            MoveKind::Shatter => self.shatter,
            MoveKind::Reoptimize | MoveKind::Noop => 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut total = 0.0;
        for kind in MoveKind::SEARCH {
            let value = self.weight(kind);
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::MoveWeight { kind, value });
            }
            total += value;
        }
        if total <= 0.0 {
            return Err(ConfigError::NoMoveWeights);
        }
        Ok(())
    }
}

/// How the current best set is partitioned for a cluster pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterStrategy {
    /// Square tiles of `size x size` cells; a pattern belongs to the tile
    /// holding its origin.
    Tiles { size: u32 },
    /// Same-color adjacency components, grown breadth-first into chunks of
    /// at most `max_patterns` patterns.
    Components { max_patterns: usize },
}

impl Default for ClusterStrategy {
    fn default() -> Self {
        ClusterStrategy::Tiles { size: 8 }
    }
}

impl std::fmt::Display for ClusterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterStrategy::Tiles { size } => write!(f, "tiles({size})"),
            ClusterStrategy::Components { max_patterns } => {
                write!(f, "components({max_patterns})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub enabled: bool,
    pub strategy: ClusterStrategy,
    /// Annealing steps per cluster and pass.
    pub iterations: u64,
    /// Nested start temperature as a fraction of the global one.
    pub temperature_ratio: f64,
    pub parallel: bool,
    /// Move weights of the nested passes; `None` reuses the global ones.
    pub move_weights: Option<MoveWeights>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strategy: ClusterStrategy::default(),
            iterations: 2_000,
            temperature_ratio: 0.25,
            parallel: true,
            move_weights: None,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.strategy {
            ClusterStrategy::Tiles { size: 0 } => return Err(ConfigError::ZeroTileSize),
            ClusterStrategy::Components { max_patterns: 0 } => {
                return Err(ConfigError::ZeroClusterPatterns);
            }
            _ => {}
        }
        let r = self.temperature_ratio;
        if !(r > 0.0 && r <= 1.0) {
            return Err(ConfigError::TemperatureRatio(r));
        }
        if self.enabled && self.iterations == 0 {
            return Err(ConfigError::ZeroClusterIterations);
        }
        if let Some(w) = &self.move_weights {
            w.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub anneal: AnnealingConfig,
    pub stagnation: StagnationConfig,
    pub cost: CostWeights,
    pub moves: MoveWeights,
    /// Proposals the generator may discard before yielding a no-op.
    pub max_move_attempts: usize,
    pub cluster: ClusterConfig,
    pub lower_bound: LowerBoundKind,
    pub max_iterations: u64,
    pub seed: u64,
    /// Observer progress interval in iterations.
    pub progress_every: u64,
    /// Run the full coverage check after every commit.
    pub verify_commits: bool,
    /// Scale move weights with the temperature ratio; see
    /// [`crate::search::generator::temperature_bias`].
    pub adaptive_move_weights: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            anneal: AnnealingConfig::default(),
            stagnation: StagnationConfig::default(),
            cost: CostWeights::default(),
            moves: MoveWeights::default(),
            max_move_attempts: 16,
            cluster: ClusterConfig::default(),
            lower_bound: LowerBoundKind::default(),
            max_iterations: 200_000,
            seed: 0x9E37_79B9_7F4A_7C15,
            progress_every: 1_000,
            verify_commits: cfg!(debug_assertions),
            adaptive_move_weights: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.anneal.validate()?;
        if self.stagnation.window == 0 {
            return Err(ConfigError::ZeroStagnationWindow);
        }
        self.cost.validate()?;
        self.moves.validate()?;
        if self.max_move_attempts == 0 {
            return Err(ConfigError::ZeroMoveAttempts);
        }
        self.cluster.validate()?;
        if self.progress_every == 0 {
            return Err(ConfigError::ZeroProgressInterval);
        }
        Ok(())
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    #[inline]
    pub fn with_window(mut self, w: usize) -> Self {
        self.stagnation.window = w.max(1);
        self
    }

    #[inline]
    pub fn with_moves(mut self, moves: MoveWeights) -> Self {
        self.moves = moves;
        self
    }

    #[inline]
    pub fn with_cluster_strategy(mut self, strategy: ClusterStrategy) -> Self {
        self.cluster.strategy = strategy;
        self
    }

    #[inline]
    pub fn with_parallel_clusters(mut self, yes: bool) -> Self {
        self.cluster.parallel = yes;
        self
    }

    #[inline]
    pub fn with_progress_every(mut self, n: u64) -> Self {
        self.progress_every = n.max(1);
        self
    }

    #[inline]
    pub fn with_verify_commits(mut self, yes: bool) -> Self {
        self.verify_commits = yes;
        self
    }

    #[inline]
    pub fn with_lower_bound(mut self, kind: LowerBoundKind) -> Self {
        self.lower_bound = kind;
        self
    }

    #[inline]
    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.anneal.calibration = Some(calibration);
        self
    }

    #[inline]
    pub fn with_adaptive_move_weights(mut self, yes: bool) -> Self {
        self.adaptive_move_weights = yes;
        self
    }

    /// Move weights used by nested cluster passes.
    #[inline]
    pub fn cluster_moves(&self) -> &MoveWeights {
        self.cluster.move_weights.as_ref().unwrap_or(&self.moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SolverConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_annealing_values() {
        let mut c = SolverConfig::default();
        c.anneal.initial_temperature = 0.0;
        assert_eq!(c.validate(), Err(ConfigError::InitialTemperature(0.0)));

        let mut c = SolverConfig::default();
        c.anneal.cooling_rate = 1.0;
        assert_eq!(c.validate(), Err(ConfigError::CoolingRate(1.0)));

        let mut c = SolverConfig::default();
        c.anneal.min_temperature = -1.0;
        assert_eq!(c.validate(), Err(ConfigError::MinTemperature(-1.0)));
    }

    #[test]
    fn test_rejects_bad_calibration() {
        let c = SolverConfig::default().with_calibration(CalibrationConfig::default());
        assert_eq!(c.validate(), Ok(()));

        let c = SolverConfig::default().with_calibration(CalibrationConfig {
            samples: 0,
            ..CalibrationConfig::default()
        });
        assert_eq!(c.validate(), Err(ConfigError::ZeroCalibrationSamples));

        let c = SolverConfig::default().with_calibration(CalibrationConfig {
            initial_acceptance: 0.01,
            final_acceptance: 0.4,
            ..CalibrationConfig::default()
        });
        assert_eq!(
            c.validate(),
            Err(ConfigError::AcceptanceTargets {
                initial: 0.01,
                final_acceptance: 0.4
            })
        );
    }

    #[test]
    fn test_rejects_bad_move_weights() {
        let c = SolverConfig::default().with_moves(MoveWeights::none());
        assert_eq!(c.validate(), Err(ConfigError::NoMoveWeights));

        let c = SolverConfig::default()
            .with_moves(MoveWeights::default().with(MoveKind::Split, f64::NAN));
        assert!(matches!(
            c.validate(),
            Err(ConfigError::MoveWeight {
                kind: MoveKind::Split,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_cluster_settings() {
        let c = SolverConfig::default().with_cluster_strategy(ClusterStrategy::Tiles { size: 0 });
        assert_eq!(c.validate(), Err(ConfigError::ZeroTileSize));

        let mut c = SolverConfig::default();
        c.cluster.temperature_ratio = 1.5;
        assert_eq!(c.validate(), Err(ConfigError::TemperatureRatio(1.5)));

        let mut c = SolverConfig::default();
        c.cluster.iterations = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroClusterIterations));
        c.cluster.enabled = false;
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn test_with_window_clamps_to_one() {
        let mut c = SolverConfig::default().with_window(0);
        assert_eq!(c.stagnation.window, 1);
        c.max_move_attempts = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroMoveAttempts));
    }

    #[test]
    fn test_cluster_moves_fall_back_to_global() {
        let mut c = SolverConfig::default();
        assert_eq!(c.cluster_moves(), &c.moves);
        c.cluster.move_weights = Some(MoveWeights::only(MoveKind::Merge));
        assert_eq!(c.cluster_moves().merge, 1.0);
        assert_eq!(c.cluster_moves().extend, 0.0);
    }
}
