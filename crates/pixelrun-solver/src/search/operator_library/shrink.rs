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
    search::{
        neighborhood::{End, detach, pick_run},
        operator::MoveOperator,
    },
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::{grid::Grid, pattern::Pattern};
use rand_chacha::ChaCha8Rng;

/// Detaches one end cell of a run into its own pixel.
#[derive(Debug, Clone)]
pub struct ShrinkOperator {
    pub attempts_per_call: usize,
}

impl Default for ShrinkOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 8,
        }
    }
}

impl MoveOperator for ShrinkOperator {
    fn name(&self) -> &'static str {
        "Shrink"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Shrink
    }

    fn propose(&self, set: &PatternSet, _grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
        let (id, run) = pick_run(set, rng, self.attempts_per_call.max(1))?;
        let (rest, cell) = detach(&run, End::random(rng))?;
        Some(Move::new(
            MoveKind::Shrink,
            [id],
            [rest, Pattern::pixel(cell, run.color())],
        ))
    }
}
