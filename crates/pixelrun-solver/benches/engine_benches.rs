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

use criterion::{Criterion, criterion_group, criterion_main};
use pixelrun_model::{common::ColorIndex, grid::Grid};
use pixelrun_solver::{
    config::SolverConfig,
    engine::{bound::component_segment_bound, cluster::ClusterOptimizer, solver::AnnealingEngine},
    state::pattern_set::PatternSet,
};
use std::hint::black_box;

/// Banded sprite-like grid: horizontal color bands broken by a diagonal of
/// background cells and a vertical stripe.
fn synthetic_grid(w: u32, h: u32) -> Grid {
    let mut cells = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let cell = if (x + y) % 11 == 0 {
                None
            } else if x % 9 == 4 {
                Some(ColorIndex::new(3))
            } else {
                Some(ColorIndex::new(((y / 3) % 3) as u16))
            };
            cells.push(cell);
        }
    }
    Grid::new(w, h, cells, 4).expect("grid ok")
}

fn bench_engine(c: &mut Criterion) {
    let grid = synthetic_grid(48, 48);
    let cfg = SolverConfig::default()
        .with_seed(11)
        .with_max_iterations(20_000)
        .with_verify_commits(false);

    c.bench_function("AnnealingEngine solve (48x48, 20k iterations)", |b| {
        b.iter(|| {
            let mut engine = AnnealingEngine::new(cfg.clone()).expect("config ok");
            black_box(engine.solve(&grid).expect("solve ok"));
        });
    });
}

fn bench_cluster_pass(c: &mut Criterion) {
    let grid = synthetic_grid(64, 64);
    let set = PatternSet::trivial(&grid);
    let mut cfg = SolverConfig::default().with_seed(5).with_verify_commits(false);
    cfg.cluster.iterations = 500;

    let mut group = c.benchmark_group("ClusterOptimizer pass (64x64)");
    for parallel in [false, true] {
        let cfg = cfg.clone().with_parallel_clusters(parallel);
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut opt = ClusterOptimizer::new(cfg.clone());
                black_box(opt.run(&set, &grid, 0).expect("pass ok"));
            });
        });
    }
    group.finish();
}

fn bench_lower_bound(c: &mut Criterion) {
    let grid = synthetic_grid(256, 256);
    c.bench_function("component_segment_bound (256x256)", |b| {
        b.iter(|| black_box(component_segment_bound(black_box(&grid))));
    });
}

criterion_group!(benches, bench_engine, bench_cluster_pass, bench_lower_bound);
criterion_main!(benches);
