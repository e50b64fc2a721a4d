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
    search::{neighborhood::pick_single, operator::MoveOperator},
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::{
    grid::Grid,
    pattern::{Pattern, PatternKind},
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Swaps a single-cell pattern for one of its other two representations.
/// Cost neutral; it only changes which neighbors the cell can later join.
#[derive(Debug, Clone)]
pub struct ReorientOperator {
    pub attempts_per_call: usize,
}

impl Default for ReorientOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 8,
        }
    }
}

impl MoveOperator for ReorientOperator {
    fn name(&self) -> &'static str {
        "Reorient"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Reorient
    }

    fn propose(&self, set: &PatternSet, _grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
        let (id, p) = pick_single(set, rng, self.attempts_per_call.max(1))?;
        let (cell, color) = (p.origin(), p.color());
        let options = match p.kind() {
            PatternKind::Pixel => [
                Pattern::horizontal(cell, 1, color),
                Pattern::vertical(cell, 1, color),
            ],
            PatternKind::Horizontal => {
                [Pattern::pixel(cell, color), Pattern::vertical(cell, 1, color)]
            }
            PatternKind::Vertical => {
                [Pattern::pixel(cell, color), Pattern::horizontal(cell, 1, color)]
            }
        };
        let next = options[rng.random_range(0..2)];
        Some(Move::new(MoveKind::Reorient, [id], [next]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::common::{Cell, ColorIndex};
    use rand::SeedableRng;

    #[test]
    fn test_reorient_changes_variant_only() {
        let a = ColorIndex::new(2);
        let g = Grid::from_rows(&[vec![Some(a)]], 3).unwrap();
        let set = PatternSet::trivial(&g);
        let op = ReorientOperator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut kinds = std::collections::BTreeSet::new();
        for _ in 0..32 {
            let mv = op.propose(&set, &g, &mut rng).unwrap();
            assert_eq!(set.validate_move(&mv, &g), Ok(()));
            let q = mv.added()[0];
            assert_eq!(q.origin(), Cell::new(0, 0));
            assert_ne!(q.kind(), PatternKind::Pixel);
            kinds.insert(q.kind());
        }
        assert_eq!(kinds.len(), 2);
    }
}
