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

pub mod config;
pub mod engine;
pub mod err;
pub mod eval;
pub mod monitor;
pub mod search;
pub mod state;

pub mod prelude {
    pub use crate::config::{
        AnnealingConfig, CalibrationConfig, ClusterConfig, ClusterStrategy, MoveWeights,
        SolverConfig, StagnationConfig,
    };
    pub use crate::engine::bound::LowerBoundKind;
    pub use crate::engine::cluster::ClusterPassSummary;
    pub use crate::engine::solver::{AnnealingEngine, EnginePhase};
    pub use crate::engine::stats::{SolveResult, SolveStats, TerminationReason};
    pub use crate::err::{ConfigError, InvariantViolation, SolveError};
    pub use crate::eval::cost::CostWeights;
    pub use crate::monitor::observer::{
        CompositeSearchObserver, NullObserver, ProgressEvent, SearchObserver, TracingObserver,
    };
    pub use crate::monitor::stop::StopToken;
    pub use crate::state::cost::Cost;
    pub use crate::state::pattern_set::PatternSet;
}
