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
    config::{ClusterStrategy, SolverConfig},
    engine::{
        annealer::{Annealer, CommitCheck},
        temperature::TemperatureSchedule,
    },
    err::{InvariantViolation, SolveError, ViolationCause},
    eval::cost::CostFunction,
    search::generator::MoveGenerator,
    state::{
        cost::Cost,
        moves::{Move, MoveKind},
        pattern_set::{PatternId, PatternSet},
    },
};
use fixedbitset::FixedBitSet;
use pixelrun_model::{common::Direction, grid::Grid, pattern::Pattern};
use rayon::prelude::*;
use std::collections::{BTreeMap, VecDeque};

/// A group of patterns re-optimized on its own. Clusters of one pass never
/// share a pattern, and so never share a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    id: usize,
    pattern_ids: Vec<PatternId>,
    patterns: Vec<Pattern>,
    cells: FixedBitSet,
}

impl Cluster {
    fn new(id: usize, set: &PatternSet, grid: &Grid, pattern_ids: Vec<PatternId>) -> Self {
        let patterns: Vec<Pattern> = pattern_ids
            .iter()
            .filter_map(|&pid| set.get(pid).copied())
            .collect();
        let mut cells = FixedBitSet::with_capacity(grid.len());
        for cell in patterns.iter().flat_map(Pattern::cells) {
            cells.insert(grid.index_of(cell));
        }
        Self {
            id,
            pattern_ids,
            patterns,
            cells,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn pattern_ids(&self) -> &[PatternId] {
        &self.pattern_ids
    }

    #[inline]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Linear indices of the covered cells.
    #[inline]
    pub fn cells(&self) -> &FixedBitSet {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Splits `set` into clusters. The order, and so every cluster id, depends
/// only on the set's contents.
pub fn partition(set: &PatternSet, grid: &Grid, strategy: ClusterStrategy) -> Vec<Cluster> {
    let groups = match strategy {
        ClusterStrategy::Tiles { size } => tile_groups(set, size.max(1)),
        ClusterStrategy::Components { max_patterns } => {
            component_groups(set, grid, max_patterns.max(1))
        }
    };
    groups
        .into_iter()
        .enumerate()
        .map(|(id, ids)| Cluster::new(id, set, grid, ids))
        .collect()
}

fn tile_groups(set: &PatternSet, size: u32) -> Vec<Vec<PatternId>> {
    let mut tiles: BTreeMap<(u32, u32), Vec<PatternId>> = BTreeMap::new();
    for (id, p) in set.iter() {
        let o = p.origin();
        tiles.entry((o.y / size, o.x / size)).or_default().push(id);
    }
    for ids in tiles.values_mut() {
        ids.sort_unstable();
    }
    tiles.into_values().collect()
}

/// Breadth-first growth over same-color neighbouring patterns, seeded in
/// ascending id order. A group stops growing at `max` patterns; whatever is
/// left of its component seeds later groups.
fn component_groups(set: &PatternSet, grid: &Grid, max: usize) -> Vec<Vec<PatternId>> {
    let mut ids = set.ids().to_vec();
    ids.sort_unstable();
    let capacity = ids.last().map_or(0, |id| id.get() + 1);
    let mut assigned = FixedBitSet::with_capacity(capacity);
    let mut queue = VecDeque::new();
    let mut groups = Vec::new();

    for &seed in &ids {
        if assigned.put(seed.get()) {
            continue;
        }
        let mut group = vec![seed];
        queue.clear();
        queue.push_back(seed);
        'grow: while let Some(id) = queue.pop_front() {
            let Some(p) = set.get(id) else { continue };
            for cell in p.cells() {
                for dir in Direction::ALL {
                    if group.len() >= max {
                        break 'grow;
                    }
                    let Some((nid, q)) = grid
                        .neighbor(cell, dir)
                        .and_then(|n| set.owner_pattern(n))
                    else {
                        continue;
                    };
                    if q.color() != p.color() || assigned.contains(nid.get()) {
                        continue;
                    }
                    assigned.insert(nid.get());
                    group.push(nid);
                    queue.push_back(nid);
                }
            }
        }
        groups.push(group);
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterPassSummary {
    /// Zero-based pass counter.
    pub pass: u64,
    /// Main-loop iteration the pass ran at.
    pub iteration: u64,
    pub clusters: usize,
    /// Clusters whose result was merged back.
    pub improved: usize,
    pub before: Cost,
    pub after: Cost,
}

impl std::fmt::Display for ClusterPassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ClusterPass(#{} at {}: {}/{} improved, {} -> {} patterns)",
            self.pass,
            self.iteration,
            self.improved,
            self.clusters,
            self.before.patterns,
            self.after.patterns
        )
    }
}

#[derive(Debug, Clone)]
pub struct ClusterPassReport {
    pub set: PatternSet,
    pub summary: ClusterPassSummary,
}

/// Re-optimizes every cluster of a set with an independent nested annealing
/// run and merges improved clusters back.
#[derive(Debug, Clone)]
pub struct ClusterOptimizer {
    config: SolverConfig,
    passes: u64,
}

impl ClusterOptimizer {
    pub fn new(config: SolverConfig) -> Self {
        Self { config, passes: 0 }
    }

    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(pass = self.passes, iteration = iteration),
        err(Display)
    )]
    pub fn run(
        &mut self,
        set: &PatternSet,
        grid: &Grid,
        iteration: u64,
    ) -> Result<ClusterPassReport, SolveError> {
        let pass = self.passes;
        self.passes += 1;

        let cost = CostFunction::new(self.config.cost);
        let clusters = partition(set, grid, self.config.cluster.strategy);
        let job = |c: &Cluster| self.optimize(c, grid, pass);
        let outcomes: Vec<Result<Option<Vec<Pattern>>, SolveError>> =
            if self.config.cluster.parallel {
                clusters.par_iter().map(job).collect()
            } else {
                clusters.iter().map(job).collect()
            };

        let mut merged = set.clone();
        let mut improved = 0usize;
        for (cluster, outcome) in clusters.iter().zip(outcomes) {
            let Some(patterns) = outcome? else { continue };
            let mv = Move::new(
                MoveKind::Reoptimize,
                cluster.pattern_ids.iter().copied(),
                patterns,
            );
            if let Err(e) = merged.apply(mv.clone(), grid) {
                return Err(InvariantViolation::new(
                    mv,
                    set.to_vec(),
                    merged.to_vec(),
                    ViolationCause::Commit(e),
                )
                .into());
            }
            improved += 1;
        }
        if self.config.verify_commits && improved > 0 {
            merged.check_coverage(grid).map_err(|e| {
                InvariantViolation::new(
                    Move::noop(),
                    set.to_vec(),
                    merged.to_vec(),
                    ViolationCause::Coverage(e),
                )
            })?;
        }

        let summary = ClusterPassSummary {
            pass,
            iteration,
            clusters: clusters.len(),
            improved,
            before: cost.evaluate(set),
            after: cost.evaluate(&merged),
        };
        tracing::debug!(%summary, "cluster pass finished");
        Ok(ClusterPassReport {
            set: merged,
            summary,
        })
    }

    /// The best patterns found for `cluster`, or `None` if nothing beat the
    /// input.
    fn optimize(
        &self,
        cluster: &Cluster,
        grid: &Grid,
        pass: u64,
    ) -> Result<Option<Vec<Pattern>>, SolveError> {
        if cluster.len() < 2 {
            return Ok(None);
        }
        let cfg = &self.config;
        let mut state = PatternSet::from_patterns(grid, cluster.patterns.iter().copied())
            .map_err(|e| {
                InvariantViolation::new(
                    Move::noop(),
                    cluster.patterns.clone(),
                    Vec::new(),
                    ViolationCause::Coverage(e),
                )
            })?;
        let check = if cfg.verify_commits {
            CommitCheck::Region(cluster.cells.clone())
        } else {
            CommitCheck::Off
        };
        let mut annealer = Annealer::new(
            MoveGenerator::new(cfg.cluster_moves(), cfg.max_move_attempts)?
                .with_temperature_bias(cfg.adaptive_move_weights),
            CostFunction::new(cfg.cost),
            TemperatureSchedule::scaled(&cfg.anneal, cfg.cluster.temperature_ratio),
            cluster_seed(cfg.seed, pass, cluster.id),
            check,
        );
        let cost = *annealer.cost_function();
        let start = cost.evaluate(&state);
        let mut best = start;
        let mut best_patterns = None;

        for _ in 0..cfg.cluster.iterations {
            if best.patterns <= 1 {
                break;
            }
            if !annealer.step(&mut state, grid)?.is_accepted() {
                continue;
            }
            let current = cost.evaluate(&state);
            if current < best {
                best = current;
                best_patterns = Some(state.to_vec());
            }
        }
        tracing::trace!(cluster = cluster.id, before = %start, after = %best, "cluster optimized");
        Ok(best_patterns)
    }
}

/// SplitMix64 finalizer; a bijection on `u64`.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn cluster_seed(base: u64, pass: u64, cluster: usize) -> u64 {
    let h = mix64(base ^ 0x9E37_79B1_85EB_CA87u64);
    mix64(mix64(h ^ pass) ^ cluster as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MoveWeights;
    use pixelrun_model::common::ColorIndex;

    const A: Option<ColorIndex> = Some(ColorIndex::new(0));
    const B: Option<ColorIndex> = Some(ColorIndex::new(1));

    fn merge_only() -> SolverConfig {
        let mut c = SolverConfig::default().with_verify_commits(true);
        c.cluster.move_weights = Some(MoveWeights::only(MoveKind::Merge));
        c
    }

    fn stripes(w: usize, h: usize) -> Grid {
        let rows: Vec<Vec<_>> = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| match (x / 3 + y) % 3 {
                        0 => A,
                        1 => B,
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(&rows, 2).unwrap()
    }

    #[test]
    fn test_tiles_group_by_origin() {
        let g = Grid::from_rows(&[vec![A; 4], vec![A; 4], vec![A; 4], vec![A; 4]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let clusters = partition(&set, &g, ClusterStrategy::Tiles { size: 2 });
        assert_eq!(clusters.len(), 4);
        for (i, c) in clusters.iter().enumerate() {
            assert_eq!(c.id(), i);
            assert_eq!(c.len(), 4);
            assert_eq!(c.cells().count_ones(..), 4);
        }
        let first: Vec<_> = clusters[0].patterns().iter().map(|p| p.origin()).collect();
        assert!(first.iter().all(|o| o.x < 2 && o.y < 2));
        let second: Vec<_> = clusters[1].patterns().iter().map(|p| p.origin()).collect();
        assert!(second.iter().all(|o| o.x >= 2 && o.y < 2));
    }

    #[test]
    fn test_components_split_by_color() {
        let g = Grid::from_rows(&[vec![A, A, B, B], vec![None, A, None, B]], 2).unwrap();
        let set = PatternSet::trivial(&g);
        let clusters = partition(
            &set,
            &g,
            ClusterStrategy::Components { max_patterns: 16 },
        );
        let sizes: Vec<_> = clusters.iter().map(Cluster::len).collect();
        assert_eq!(sizes, vec![3, 3]);
        for c in &clusters {
            let color = c.patterns()[0].color();
            assert!(c.patterns().iter().all(|p| p.color() == color));
        }
    }

    #[test]
    fn test_components_respect_chunk_size() {
        let g = Grid::from_rows(&[vec![A; 5]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let clusters = partition(&set, &g, ClusterStrategy::Components { max_patterns: 2 });
        let sizes: Vec<_> = clusters.iter().map(Cluster::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        let total: usize = clusters.iter().map(|c| c.cells().count_ones(..)).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_pass_merges_improved_clusters() {
        let g = Grid::from_rows(&[vec![A; 4]], 1).unwrap();
        let set = PatternSet::trivial(&g);
        let mut opt = ClusterOptimizer::new(merge_only());
        let report = opt.run(&set, &g, 10).unwrap();

        assert_eq!(opt.passes(), 1);
        assert_eq!(report.summary.pass, 0);
        assert_eq!(report.summary.iteration, 10);
        assert_eq!(report.summary.clusters, 1);
        assert_eq!(report.summary.improved, 1);
        assert_eq!(report.summary.before.patterns, 4);
        assert_eq!(report.summary.after.patterns, 1);
        assert_eq!(report.set.len(), 1);
        assert!(report.set.covers(&g));
    }

    #[test]
    fn test_pass_leaves_checkerboard_alone() {
        let g = Grid::from_rows(&[vec![A, B, A], vec![B, A, B], vec![A, B, A]], 2).unwrap();
        let set = PatternSet::trivial(&g);
        let report = ClusterOptimizer::new(merge_only()).run(&set, &g, 0).unwrap();
        assert_eq!(report.summary.improved, 0);
        assert_eq!(report.set, set);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let g = stripes(20, 12);
        let set = PatternSet::trivial(&g);
        let mut cfg = SolverConfig::default().with_verify_commits(true);
        cfg.cluster.iterations = 300;

        let par = ClusterOptimizer::new(cfg.clone().with_parallel_clusters(true))
            .run(&set, &g, 0)
            .unwrap();
        let seq = ClusterOptimizer::new(cfg.with_parallel_clusters(false))
            .run(&set, &g, 0)
            .unwrap();

        assert_eq!(par.set.to_solution(), seq.set.to_solution());
        assert_eq!(par.summary, seq.summary);
        assert!(par.summary.after <= par.summary.before);
        assert!(par.set.covers(&g));
    }

    #[test]
    fn test_seeds_differ_per_pass_and_cluster() {
        let s = 7;
        assert_ne!(cluster_seed(s, 0, 1), cluster_seed(s, 1, 0));
        assert_ne!(cluster_seed(s, 0, 0), cluster_seed(s, 0, 1));
        assert_eq!(cluster_seed(s, 3, 4), cluster_seed(s, 3, 4));
        assert_ne!(cluster_seed(s, 1 << 24, 0), cluster_seed(s, 0, 1));
        assert_ne!(cluster_seed(s, 1, 0), cluster_seed(s, 0, 1 << 40));
    }

    #[test]
    fn test_seeds_are_distinct_over_a_pass_grid() {
        let mut seen = std::collections::HashSet::new();
        for pass in (0..64u64).chain((0..40).map(|k| 1u64 << k)) {
            for cluster in (0..64usize).chain((0..40).map(|k| 1usize << k)) {
                seen.insert((pass, cluster, cluster_seed(11, pass, cluster)));
            }
        }
        let seeds: std::collections::HashSet<_> = seen.iter().map(|t| t.2).collect();
        assert_eq!(seeds.len(), seen.len());
    }
}
