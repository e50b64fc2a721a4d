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

use crate::state::{
    moves::{Move, MoveKind},
    pattern_set::PatternId,
};
use pixelrun_model::{
    common::{Cell, ColorIndex},
    grid::err::GridError,
    pattern::Pattern,
    solution::err::CoverageError,
};

/// A configuration value outside its admissible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InitialTemperature(f64),
    CoolingRate(f64),
    MinTemperature(f64),
    ZeroStagnationWindow,
    MoveWeight { kind: MoveKind, value: f64 },
    NoMoveWeights,
    ZeroMoveAttempts,
    TemperatureRatio(f64),
    ZeroTileSize,
    ZeroClusterPatterns,
    ZeroClusterIterations,
    CostWeights { pixel_weight: u32, run_weight: u32 },
    TieBreak(f64),
    ZeroProgressInterval,
    ZeroCalibrationSamples,
    AcceptanceTargets { initial: f64, final_acceptance: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            InitialTemperature(t) => {
                write!(f, "initial temperature must be finite and positive, got {t}")
            }
            CoolingRate(a) => write!(f, "cooling rate must lie in (0, 1), got {a}"),
            MinTemperature(t) => {
                write!(f, "minimum temperature must be finite and non-negative, got {t}")
            }
            ZeroStagnationWindow => write!(f, "stagnation window must be at least 1"),
            MoveWeight { kind, value } => {
                write!(f, "weight of move '{kind}' must be finite and non-negative, got {value}")
            }
            NoMoveWeights => write!(f, "at least one move family needs a positive weight"),
            ZeroMoveAttempts => write!(f, "max move attempts must be at least 1"),
            TemperatureRatio(r) => {
                write!(f, "cluster temperature ratio must lie in (0, 1], got {r}")
            }
            ZeroTileSize => write!(f, "cluster tile size must be at least 1"),
            ZeroClusterPatterns => write!(f, "cluster pattern limit must be at least 1"),
            ZeroClusterIterations => write!(f, "cluster iterations must be at least 1"),
            CostWeights {
                pixel_weight,
                run_weight,
            } => write!(
                f,
                "pixel weight ({pixel_weight}) must be positive and not below the run weight ({run_weight})"
            ),
            TieBreak(t) => write!(f, "tie-break factor must lie in [0, 1), got {t}"),
            ZeroProgressInterval => write!(f, "progress interval must be at least 1"),
            ZeroCalibrationSamples => write!(f, "calibration needs at least one sample"),
            AcceptanceTargets {
                initial,
                final_acceptance,
            } => write!(
                f,
                "acceptance targets must satisfy 0 < final < initial < 1, got {initial} and {final_acceptance}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The generator found no valid move within its attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveExhaustion {
    attempts: usize,
}

impl MoveExhaustion {
    pub fn new(attempts: usize) -> Self {
        Self { attempts }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl std::fmt::Display for MoveExhaustion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No valid move found after {} attempts", self.attempts)
    }
}

impl std::error::Error for MoveExhaustion {}

/// Why a proposed move may not be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveValidationError {
    UnknownPattern(PatternId),
    DuplicateRemoval(PatternId),
    /// An added run with `len == 0`.
    EmptyRun(Pattern),
    OutOfBounds(Pattern),
    ColorMismatch {
        cell: Cell,
        expected: Option<ColorIndex>,
        found: ColorIndex,
    },
    /// An added pattern reaches a cell that no removed pattern frees.
    NotFreed(Cell),
    Overlap(Cell),
    CellCountMismatch {
        removed: usize,
        added: usize,
    },
}

impl std::fmt::Display for MoveValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use MoveValidationError::*;
        match self {
            UnknownPattern(id) => write!(f, "{id} is not part of the pattern set"),
            DuplicateRemoval(id) => write!(f, "{id} is removed more than once"),
            EmptyRun(p) => write!(f, "{p} covers no cells"),
            OutOfBounds(p) => write!(f, "{p} leaves the grid"),
            ColorMismatch {
                cell,
                expected: Some(e),
                found,
            } => write!(f, "cell {cell} has color {e} but would be covered with {found}"),
            ColorMismatch {
                cell,
                expected: None,
                found,
            } => write!(f, "background cell {cell} would be covered with {found}"),
            NotFreed(cell) => write!(f, "cell {cell} is not released by the move"),
            Overlap(cell) => write!(f, "cell {cell} would be covered twice"),
            CellCountMismatch { removed, added } => write!(
                f,
                "move removes {removed} cells but adds {added}"
            ),
        }
    }
}

impl std::error::Error for MoveValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCause {
    Commit(MoveValidationError),
    Coverage(CoverageError),
}

impl std::fmt::Display for ViolationCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationCause::Commit(e) => write!(f, "commit rejected: {e}"),
            ViolationCause::Coverage(e) => write!(f, "coverage broken: {e}"),
        }
    }
}

/// A committed move left the pattern set in a state that no longer covers
/// the grid exactly. Carries everything needed to reproduce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    mv: Move,
    before: Vec<Pattern>,
    after: Vec<Pattern>,
    cause: ViolationCause,
}

impl InvariantViolation {
    pub fn new(mv: Move, before: Vec<Pattern>, after: Vec<Pattern>, cause: ViolationCause) -> Self {
        Self {
            mv,
            before,
            after,
            cause,
        }
    }

    pub fn offending_move(&self) -> &Move {
        &self.mv
    }

    pub fn before(&self) -> &[Pattern] {
        &self.before
    }

    pub fn after(&self) -> &[Pattern] {
        &self.after
    }

    pub fn cause(&self) -> ViolationCause {
        self.cause
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invariant violation after {} ({} patterns before, {} after): {}",
            self.mv,
            self.before.len(),
            self.after.len(),
            self.cause
        )
    }
}

impl std::error::Error for InvariantViolation {}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    Config(ConfigError),
    Grid(GridError),
    /// The starting pattern set does not cover the grid exactly.
    InitialState(CoverageError),
    InvariantViolation(Box<InvariantViolation>),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Config(e) => write!(f, "configuration error: {e}"),
            SolveError::Grid(e) => write!(f, "invalid grid: {e}"),
            SolveError::InitialState(e) => write!(f, "invalid initial pattern set: {e}"),
            SolveError::InvariantViolation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<ConfigError> for SolveError {
    fn from(err: ConfigError) -> Self {
        SolveError::Config(err)
    }
}

impl From<GridError> for SolveError {
    fn from(err: GridError) -> Self {
        SolveError::Grid(err)
    }
}

impl From<InvariantViolation> for SolveError {
    fn from(err: InvariantViolation) -> Self {
        SolveError::InvariantViolation(Box::new(err))
    }
}
