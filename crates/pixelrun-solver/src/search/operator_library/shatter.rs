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
        neighborhood::{blocks_a_join, pick_run},
        operator::MoveOperator,
    },
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::{grid::Grid, pattern::Pattern};
use rand_chacha::ChaCha8Rng;

/// Breaks a run into single pixels so that same-colored patterns on both
/// sides of it can join through the freed cells.
#[derive(Debug, Clone)]
pub struct ShatterOperator {
    pub attempts_per_call: usize,
}

impl Default for ShatterOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 8,
        }
    }
}

impl MoveOperator for ShatterOperator {
    fn name(&self) -> &'static str {
        "Shatter"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Shatter
    }

    fn propose(&self, set: &PatternSet, _grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
        for _ in 0..self.attempts_per_call.max(1) {
            let Some((id, run)) = pick_run(set, rng, 1) else {
                continue;
            };
            if !blocks_a_join(set, &run) {
                continue;
            }
            let color = run.color();
            return Some(Move::new(
                MoveKind::Shatter,
                [id],
                run.cells().map(|c| Pattern::pixel(c, color)),
            ));
        }
        None
    }
}
