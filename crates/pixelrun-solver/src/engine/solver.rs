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
    config::SolverConfig,
    engine::{
        annealer::{Annealer, CommitCheck, StepOutcome},
        cluster::ClusterOptimizer,
        stagnation::StagnationDetector,
        stats::{SolveResult, SolveStats, TerminationReason},
        temperature::TemperatureSchedule,
    },
    err::{ConfigError, SolveError},
    eval::cost::CostFunction,
    monitor::{
        observer::{NullObserver, ProgressEvent, SearchObserver},
        stop::StopToken,
    },
    search::generator::MoveGenerator,
    state::pattern_set::PatternSet,
};
use pixelrun_model::{common::ColorIndex, grid::Grid};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Initializing,
    Annealing,
    StagnationCheck,
    ClusterReoptimize,
    Terminated(TerminationReason),
}

impl std::fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnginePhase::Initializing => write!(f, "initializing"),
            EnginePhase::Annealing => write!(f, "annealing"),
            EnginePhase::StagnationCheck => write!(f, "stagnation check"),
            EnginePhase::ClusterReoptimize => write!(f, "cluster reoptimize"),
            EnginePhase::Terminated(r) => write!(f, "terminated ({r})"),
        }
    }
}

/// Simulated annealing over pattern sets.
///
/// One engine drives one search at a time and owns all of its state: the
/// random stream, the temperature and the current and best sets. Runs with
/// the same grid, configuration and seed are identical.
pub struct AnnealingEngine {
    config: SolverConfig,
    observer: Box<dyn SearchObserver>,
    stop: StopToken,
    phase: EnginePhase,
}

impl std::fmt::Debug for AnnealingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnealingEngine")
            .field("config", &self.config)
            .field("observer", &self.observer.name())
            .field("stop", &self.stop)
            .field("phase", &self.phase)
            .finish()
    }
}

impl AnnealingEngine {
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            observer: Box::new(NullObserver),
            stop: StopToken::new(),
            phase: EnginePhase::Initializing,
        })
    }

    pub fn with_observer<O: SearchObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// A handle that stops the search between two iterations.
    #[inline]
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    #[inline]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Anneals from one pixel per foreground cell.
    pub fn solve(&mut self, grid: &Grid) -> Result<SolveResult, SolveError> {
        self.solve_from(grid, PatternSet::trivial(grid))
    }

    /// Builds the grid first; see [`Grid::new`].
    pub fn solve_cells(
        &mut self,
        width: u32,
        height: u32,
        cells: Vec<Option<ColorIndex>>,
        palette_len: usize,
    ) -> Result<SolveResult, SolveError> {
        let grid = Grid::new(width, height, cells, palette_len)?;
        self.solve(&grid)
    }

    /// Anneals from `initial`, which must cover `grid` exactly.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(width = grid.width(), height = grid.height()),
        err(Display)
    )]
    pub fn solve_from(
        &mut self,
        grid: &Grid,
        initial: PatternSet,
    ) -> Result<SolveResult, SolveError> {
        let started = Instant::now();
        self.set_phase(EnginePhase::Initializing);
        initial.check_coverage(grid).map_err(SolveError::InitialState)?;

        let mut cfg = self.config.clone();
        let cost = CostFunction::new(cfg.cost);
        let check = if cfg.verify_commits {
            CommitCheck::Full
        } else {
            CommitCheck::Off
        };
        let mut annealer = Annealer::new(
            MoveGenerator::new(&cfg.moves, cfg.max_move_attempts)?
                .with_temperature_bias(cfg.adaptive_move_weights),
            cost,
            TemperatureSchedule::from_config(&cfg.anneal),
            cfg.seed,
            check,
        );
        if let Some(calibration) = cfg.anneal.calibration.clone()
            && let Some((start, floor)) = annealer.calibrate(&initial, grid, &calibration)
        {
            info!(start, floor, samples = calibration.samples, "calibrated temperatures");
            cfg.anneal.initial_temperature = start;
            cfg.anneal.min_temperature = floor;
        }
        let mut clusters = ClusterOptimizer::new(cfg.clone());
        let mut detector = StagnationDetector::new(cfg.stagnation.window);
        let window = cfg.stagnation.window as u64;
        let lower_bound = cfg.lower_bound.compute(grid);

        let mut current = initial;
        let initial_cost = cost.evaluate(&current);
        let mut best = current.clone();
        let mut best_cost = initial_cost;
        detector.reset(best_cost);

        let mut iteration = 0u64;
        let mut improved_clusters = 0u64;
        let mut exhausted_streak = 0u64;

        info!(
            patterns = initial_cost.patterns,
            lower_bound,
            seed = cfg.seed,
            generator = ?annealer.generator(),
            "starting search"
        );
        self.observer.on_search_start(initial_cost, lower_bound);
        self.set_phase(EnginePhase::Annealing);

        let termination = loop {
            if best_cost.patterns <= lower_bound {
                break TerminationReason::LowerBoundReached;
            }
            if self.stop.is_set() {
                break TerminationReason::Stopped;
            }
            if iteration >= cfg.max_iterations {
                break TerminationReason::IterationBudget;
            }

            let outcome = annealer.step(&mut current, grid)?;
            iteration += 1;
            match outcome {
                StepOutcome::Accepted(_) => {
                    exhausted_streak = 0;
                    let c = cost.evaluate(&current);
                    if c < best_cost {
                        debug!(iteration, best = %c, "new best");
                        best_cost = c;
                        best = current.clone();
                        self.observer.on_new_best(iteration, best_cost);
                    }
                }
                StepOutcome::Rejected(_) => exhausted_streak = 0,
                StepOutcome::Exhausted => {
                    exhausted_streak += 1;
                    if exhausted_streak == window {
                        warn!(iteration, window, "no valid move for a full window");
                    }
                }
            }
            detector.record(best_cost);

            if iteration % cfg.progress_every == 0 {
                self.observer.on_progress(&ProgressEvent {
                    iteration,
                    temperature: annealer.temperature(),
                    current: cost.evaluate(&current),
                    best: best_cost,
                });
            }

            if iteration % window != 0 {
                continue;
            }
            self.set_phase(EnginePhase::StagnationCheck);
            if !detector.is_stagnant() {
                self.set_phase(EnginePhase::Annealing);
                continue;
            }
            debug!(iteration, best = %best_cost, "stagnation detected");
            if annealer.schedule().is_frozen() && (!cfg.cluster.enabled || clusters.passes() > 0)
            {
                break TerminationReason::Frozen;
            }
            if cfg.cluster.enabled {
                self.set_phase(EnginePhase::ClusterReoptimize);
                let report = clusters.run(&best, grid, iteration)?;
                self.observer.on_cluster_pass(&report.summary);
                improved_clusters += report.summary.improved as u64;
                current = report.set;
                if report.summary.after < best_cost {
                    best_cost = report.summary.after;
                    best = current.clone();
                    debug!(iteration, best = %best_cost, "new best from cluster pass");
                    self.observer.on_new_best(iteration, best_cost);
                }
            }
            detector.reset(best_cost);
            self.set_phase(EnginePhase::Annealing);
        };
        self.set_phase(EnginePhase::Terminated(termination));

        let solution = best.to_solution();
        let counters = *annealer.counters();
        let stats = SolveStats {
            initial_cost,
            final_cost: best_cost,
            lower_bound,
            iterations: iteration,
            accepted: counters.accepted,
            rejected: counters.rejected,
            exhausted: counters.exhausted,
            cluster_passes: clusters.passes(),
            improved_clusters,
            elapsed: started.elapsed(),
            termination,
            counts: solution.counts(),
        };
        for (name, s) in annealer.generator().stats() {
            debug!(
                operator = name,
                selected = s.selected,
                empty = s.empty,
                invalid = s.invalid,
                valid = s.valid,
                "operator statistics"
            );
        }
        info!(%stats, "search finished");
        self.observer.on_search_end(&stats);
        Ok(SolveResult { solution, stats })
    }

    fn set_phase(&mut self, phase: EnginePhase) {
        if self.phase != phase {
            tracing::trace!(from = %self.phase, to = %phase, "phase");
            self.phase = phase;
        }
    }
}
