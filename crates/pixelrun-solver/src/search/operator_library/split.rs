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
    search::{neighborhood::pick_run, operator::MoveOperator},
    state::{
        moves::{Move, MoveKind},
        pattern_set::PatternSet,
    },
};
use pixelrun_model::{grid::Grid, pattern::Pattern};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Cuts a run into two at a random inner boundary.
#[derive(Debug, Clone)]
pub struct SplitOperator {
    pub attempts_per_call: usize,
}

impl Default for SplitOperator {
    fn default() -> Self {
        Self {
            attempts_per_call: 8,
        }
    }
}

impl MoveOperator for SplitOperator {
    fn name(&self) -> &'static str {
        "Split"
    }

    fn kind(&self) -> MoveKind {
        MoveKind::Split
    }

    fn propose(&self, set: &PatternSet, _grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move> {
        let (id, run) = pick_run(set, rng, self.attempts_per_call.max(1))?;
        let o = run.orientation()?;
        let k = rng.random_range(1..run.len());
        let head = Pattern::run(o, run.origin(), k, run.color());
        let tail = Pattern::run(o, run.origin().advance(o, k), run.len() - k, run.color());
        Some(Move::new(MoveKind::Split, [id], [head, tail]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::common::{Cell, ColorIndex};
    use rand::SeedableRng;

    const A: ColorIndex = ColorIndex::new(0);

    #[test]
    fn test_split_pieces_cover_the_run() {
        let g = Grid::from_rows(&vec![vec![Some(A)]; 4], 1).unwrap();
        let set =
            PatternSet::from_patterns(&g, [Pattern::vertical(Cell::new(0, 0), 4, A)]).unwrap();
        let op = SplitOperator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let mut cuts = std::collections::BTreeSet::new();
        for _ in 0..64 {
            let mv = op.propose(&set, &g, &mut rng).unwrap();
            assert_eq!(set.validate_move(&mv, &g), Ok(()));
            let [head, tail] = mv.added() else {
                panic!("split must yield two pieces");
            };
            assert_eq!(head.len() + tail.len(), 4);
            assert_eq!(head.origin(), Cell::new(0, 0));
            cuts.insert(head.len());
        }
        assert_eq!(cuts.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
