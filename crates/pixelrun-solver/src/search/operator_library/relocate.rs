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
        neighborhood::{End, detach, join, pick_run},
        operator::MoveOperator,
    },
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::{common::Direction, grid::Grid, pattern::Pattern};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Hands an end cell of a run over to a neighboring pattern of the same
/// color that it extends.
///
/// This shifts the boundary between two colinear runs, or moves a corner
/// cell from one run to a perpendicular one. Pattern count and coverage are
/// unchanged; only the split of cells between the two patterns moves.
#[derive(Debug, Clone)]
pub struct RelocateOperator {
    pub attempts_per_call: usize,
}

impl Default for RelocateOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 4,
        }
    }
}

impl MoveOperator for RelocateOperator {
    fn name(&self) -> &'static str {
        "Relocate"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Relocate
    }

    fn propose(&self, set: &PatternSet, grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
        for _ in 0..self.attempts_per_call.max(1) {
            let (id, donor) = pick_run(set, rng, 4)?;
            let Some((rest, cell)) = detach(&donor, End::random(rng)) else {
                continue;
            };
            let moved = Pattern::pixel(cell, donor.color());

            let mut dirs = Direction::ALL;
            dirs.shuffle(rng);
            for dir in dirs {
                let Some((qid, q)) = grid
                    .neighbor(cell, dir)
                    .and_then(|n| set.owner_pattern(n))
                else {
                    continue;
                };
                if qid == id {
                    continue;
                }
                if let Some(grown) = join(q, &moved, dir.orientation()) {
                    return Some(Move::new(MoveKind::Relocate, [id, qid], [rest, grown]));
                }
            }
        }
        None
    }
}
