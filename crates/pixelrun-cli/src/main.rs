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

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use pixelrun_model::prelude::{GridLoader, PatternEncoder};
use pixelrun_solver::prelude::{
    AnnealingEngine, CalibrationConfig, ClusterStrategy, SolveStats, SolverConfig,
    TracingObserver,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Square tiles of `--cluster-size` cells
    Tiles,
    /// Same-color components of at most `--cluster-size` patterns
    Components,
}

#[derive(Parser, Debug)]
#[command(
    name = "pixelrun",
    version,
    about = "Compress an indexed pixel grid into pixels and straight runs"
)]
struct Cli {
    /// Grid file: `width height palette_len`, palette tokens, then cells
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Pattern output path (stdout if omitted)
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Write a JSON run record to this path
    #[arg(long = "record", value_hint = ValueHint::FilePath)]
    record: Option<PathBuf>,

    /// Background token in the grid file
    #[arg(long = "background", default_value_t = '.')]
    background: char,

    /// Omit the palette block from the output
    #[arg(long = "no-palette", action = ArgAction::SetTrue)]
    no_palette: bool,

    #[arg(long = "seed")]
    seed: Option<u64>,
    /// Iteration budget of the main loop
    #[arg(long = "max-iterations")]
    max_iterations: Option<u64>,
    /// Start temperature
    #[arg(long = "t0")]
    t0: Option<f64>,
    /// Geometric cooling factor per iteration
    #[arg(long = "alpha")]
    alpha: Option<f64>,
    /// Temperature floor
    #[arg(long = "t-min")]
    t_min: Option<f64>,
    /// Stagnation window in iterations
    #[arg(long = "window")]
    window: Option<usize>,
    /// Derive start and floor temperatures from sampled moves
    #[arg(long = "calibrate", action = ArgAction::SetTrue)]
    calibrate: bool,
    /// Moves sampled for `--calibrate`
    #[arg(long = "calibration-samples")]
    calibration_samples: Option<usize>,
    /// Favor merging while hot and breaking runs while cold
    #[arg(long = "adaptive-moves", action = ArgAction::SetTrue)]
    adaptive_moves: bool,

    #[arg(long = "cluster", value_enum, default_value_t = Strategy::Tiles)]
    cluster: Strategy,
    /// Tile edge or component chunk size
    #[arg(long = "cluster-size")]
    cluster_size: Option<u32>,
    /// Steps per cluster and pass
    #[arg(long = "cluster-iterations")]
    cluster_iterations: Option<u64>,
    #[arg(long = "no-clusters", action = ArgAction::SetTrue)]
    no_clusters: bool,
    /// Run cluster passes on the calling thread
    #[arg(long = "sequential", action = ArgAction::SetTrue)]
    sequential: bool,
    /// Worker threads for cluster passes
    #[arg(long = "threads")]
    threads: Option<usize>,

    /// Check full coverage after every committed move
    #[arg(long = "verify", action = ArgAction::SetTrue)]
    verify: bool,
    /// Progress log interval in iterations
    #[arg(long = "progress-every")]
    progress_every: Option<u64>,
}

fn build_config(cli: &Cli) -> SolverConfig {
    let mut cfg = SolverConfig::default();
    if let Some(v) = cli.seed {
        cfg.seed = v;
    }
    if let Some(v) = cli.max_iterations {
        cfg.max_iterations = v;
    }
    if let Some(v) = cli.t0 {
        cfg.anneal.initial_temperature = v;
    }
    if let Some(v) = cli.alpha {
        cfg.anneal.cooling_rate = v;
    }
    if let Some(v) = cli.t_min {
        cfg.anneal.min_temperature = v;
    }
    if let Some(v) = cli.window {
        cfg.stagnation.window = v;
    }
    if cli.calibrate {
        let mut calibration = CalibrationConfig::default();
        if let Some(n) = cli.calibration_samples {
            calibration.samples = n;
        }
        cfg.anneal.calibration = Some(calibration);
    }
    if cli.adaptive_moves {
        cfg.adaptive_move_weights = true;
    }
    cfg.cluster.strategy = match (cli.cluster, cli.cluster_size) {
        (Strategy::Tiles, size) => ClusterStrategy::Tiles {
            size: size.unwrap_or(8),
        },
        (Strategy::Components, size) => ClusterStrategy::Components {
            max_patterns: size.map_or(64, |s| s as usize),
        },
    };
    if let Some(v) = cli.cluster_iterations {
        cfg.cluster.iterations = v;
    }
    if cli.no_clusters {
        cfg.cluster.enabled = false;
    }
    if cli.sequential {
        cfg.cluster.parallel = false;
    }
    if cli.verify {
        cfg.verify_commits = true;
    }
    if let Some(v) = cli.progress_every {
        cfg.progress_every = v;
    }
    cfg
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct RunRecord {
    input: String,
    width: u32,
    height: u32,
    seed: u64,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    initial_patterns: usize,
    final_patterns: usize,
    final_weight: u64,
    lower_bound: usize,
    iterations: u64,
    accepted: u64,
    rejected: u64,
    exhausted: u64,
    cluster_passes: u64,
    improved_clusters: u64,
    pixels: usize,
    horizontal_runs: usize,
    vertical_runs: usize,
    termination: String,
}

impl RunRecord {
    fn new(
        cli: &Cli,
        cfg: &SolverConfig,
        (width, height): (u32, u32),
        stats: &SolveStats,
        start_ts: DateTime<Utc>,
        runtime_ms: u128,
    ) -> Self {
        Self {
            input: cli.input.display().to_string(),
            width,
            height,
            seed: cfg.seed,
            start_ts,
            end_ts: Utc::now(),
            runtime_ms,
            initial_patterns: stats.initial_cost.patterns,
            final_patterns: stats.final_cost.patterns,
            final_weight: stats.final_cost.weight,
            lower_bound: stats.lower_bound,
            iterations: stats.iterations,
            accepted: stats.accepted,
            rejected: stats.rejected,
            exhausted: stats.exhausted,
            cluster_passes: stats.cluster_passes,
            improved_clusters: stats.improved_clusters,
            pixels: stats.counts.pixels,
            horizontal_runs: stats.counts.horizontal,
            vertical_runs: stats.counts.vertical,
            termination: stats.termination.to_string(),
        }
    }
}

fn main() -> Result<()> {
    enable_tracing();
    let cli = Cli::parse();
    let cfg = build_config(&cli);

    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n.max(1))
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let loaded = GridLoader::new()
        .background(cli.background)
        .from_path(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    let (grid, palette) = loaded.into_parts();
    tracing::info!(
        "Loaded {}: {}x{} cells, {} colors, {} foreground",
        cli.input.display(),
        grid.width(),
        grid.height(),
        palette.len(),
        grid.foreground_count()
    );

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let mut engine = AnnealingEngine::new(cfg.clone())
        .context("invalid solver configuration")?
        .with_observer(TracingObserver);
    let result = engine.solve(&grid).context("search failed")?;
    let runtime = t0.elapsed();

    result
        .solution
        .validate(&grid)
        .context("solution does not reproduce the input")?;

    let encoder = PatternEncoder::new().include_palette(!cli.no_palette);
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            encoder.encode(&palette, &result.solution, BufWriter::new(file))?;
            tracing::info!("Wrote {} patterns to {}", result.solution.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            encoder.encode(&palette, &result.solution, stdout.lock())?;
        }
    }

    if let Some(path) = &cli.record {
        let record = RunRecord::new(
            &cli,
            &cfg,
            (grid.width(), grid.height()),
            &result.stats,
            start_ts,
            runtime.as_millis(),
        );
        let json = serde_json::to_string_pretty(&record)?;
        let mut f = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        f.write_all(json.as_bytes())?;
        tracing::info!("Wrote run record to {}", path.display());
    }
    Ok(())
}
