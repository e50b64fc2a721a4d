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

/// Fuses two touching, colinear patterns of the same color into one run.
#[derive(Debug, Clone)]
pub struct MergeOperator {
    pub attempts_per_call: usize,
}

impl Default for MergeOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 4,
        }
    }
}

impl MoveOperator for MergeOperator {
    fn name(&self) -> &'static str {
        "Merge"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Merge
    }

    fn propose(&self, set: &PatternSet, grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
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
            if qid == id {
                continue;
            }
            if let Some(merged) = join(p, q, axis) {
                return Some(Move::new(MoveKind::Merge, [id, qid], [merged]));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::{
        common::{Cell, ColorIndex},
        pattern::Pattern,
    };
    use rand::SeedableRng;

    const A: ColorIndex = ColorIndex::new(0);
    const B: ColorIndex = ColorIndex::new(1);

    #[test]
    fn test_merges_two_runs_on_one_column() {
        let g = Grid::from_rows(&vec![vec![Some(A)]; 5], 1).unwrap();
        let set = PatternSet::from_patterns(
            &g,
            [
                Pattern::vertical(Cell::new(0, 0), 2, A),
                Pattern::vertical(Cell::new(0, 2), 3, A),
            ],
        )
        .unwrap();
        let op = MergeOperator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut found = false;
        for _ in 0..64 {
            if let Some(mv) = op.propose(&set, &g, &mut rng) {
                assert_eq!(set.validate_move(&mv, &g), Ok(()));
                assert_eq!(mv.added(), &[Pattern::vertical(Cell::new(0, 0), 5, A)]);
                found = true;
            }
        }
        assert!(found);
    }

    #[test]
    fn test_never_merges_across_colors() {
        // A B
        // B A
        let g = Grid::from_rows(
            &[vec![Some(A), Some(B)], vec![Some(B), Some(A)]],
            2,
        )
        .unwrap();
        let set = PatternSet::trivial(&g);
        let op = MergeOperator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..64 {
            assert!(op.propose(&set, &g, &mut rng).is_none());
        }
    }
}
