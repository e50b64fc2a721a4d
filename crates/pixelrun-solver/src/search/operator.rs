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
    pattern_set::PatternSet,
};
use pixelrun_model::grid::Grid;
use rand_chacha::ChaCha8Rng;

/// One move family.
///
/// `propose` inspects the current set and returns a candidate move, or
/// `None` when it found nothing applicable. Candidates are validated by the
/// caller; an operator may return moves that turn out invalid.
pub trait MoveOperator: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> MoveKind;

    fn propose(&self, set: &PatternSet, grid: &Grid, rng: &mut ChaCha8Rng) -> Option<Move>;
}

#[cfg(test)]
mod static_assertions {
    use super::*;
    use ::static_assertions::assert_obj_safe;

    assert_obj_safe!(MoveOperator);
}
