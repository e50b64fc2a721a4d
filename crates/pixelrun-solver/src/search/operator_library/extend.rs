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
        neighborhood::{End, join, outward, random_axis},
        operator::MoveOperator,
    },
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::grid::Grid;
use rand_chacha::ChaCha8Rng;

/// Grows a pattern by one cell into an adjacent single-cell pattern of the
/// same color lying on its axis.
#[derive(Debug, Clone)]
pub struct ExtendOperator {
    pub attempts_per_call: usize,
}

impl Default for ExtendOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 4,
        }
    }
}

impl MoveOperator for ExtendOperator {
    fn name(&self) -> &'static str {
        "Extend"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Extend
    }

    fn propose(&self, set: &PatternSet, grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
        if set.singles() == 0 {
            return None;
        }
        for _ in 0..self.attempts_per_call.max(1) {
            let id = set.random_id(rng)?;
            let Some(p) = set.get(id) else { continue };
            let axis = random_axis(p, rng);
            let (end_cell, dir) = outward(p, axis, End::random(rng));
            let Some((qid, q)) = grid
                .neighbor(end_cell, dir)
                .and_then(|n| set.owner_pattern(n))
            else {
                continue;
            };
            if qid == id || !q.is_single() {
                continue;
            }
            if let Some(grown) = join(p, q, axis) {
                return Some(Move::new(MoveKind::Extend, [id, qid], [grown]));
            }
        }
        None
    }
}
