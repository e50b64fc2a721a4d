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

use crate::state::pattern_set::{PatternId, PatternSet};
use pixelrun_model::{
    common::{Cell, Direction, Orientation},
    pattern::Pattern,
};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    First,
    Last,
}

impl End {
    #[inline]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> End {
        if rng.random_bool(0.5) {
            End::First
        } else {
            End::Last
        }
    }
}

/// An axis `p` can act as a run along. Single cells pick one at random.
#[inline]
pub fn random_axis<R: Rng + ?Sized>(p: &Pattern, rng: &mut R) -> Orientation {
    match p.orientation() {
        Some(o) if !p.is_single() => o,
        _ => Orientation::ALL[rng.random_range(0..2)],
    }
}

/// The end cell of `p` at `end` along `o`, with the direction pointing away
/// from the pattern.
#[inline]
pub fn outward(p: &Pattern, o: Orientation, end: End) -> (Cell, Direction) {
    match end {
        End::First => (p.origin(), o.backward()),
        End::Last => (p.last(), o.forward()),
    }
}

/// The run covering both `a` and `b` along `o`, if they are the same color,
/// both lie on that axis, and touch end to end.
pub fn join(a: &Pattern, b: &Pattern, o: Orientation) -> Option<Pattern> {
    if a.color() != b.color() || !a.lies_along(o) || !b.lies_along(o) {
        return None;
    }
    let (first, second) = if a.origin() < b.origin() { (a, b) } else { (b, a) };
    let (f_last, s_origin) = (first.last(), second.origin());
    let touching = match o {
        Orientation::Horizontal => f_last.y == s_origin.y && f_last.x + 1 == s_origin.x,
        Orientation::Vertical => f_last.x == s_origin.x && f_last.y + 1 == s_origin.y,
    };
    touching.then(|| Pattern::run(o, first.origin(), a.len() + b.len(), a.color()))
}

/// Removes the cell at `end` from a run of length at least two. Returns the
/// shortened run and the detached cell.
pub fn detach(p: &Pattern, end: End) -> Option<(Pattern, Cell)> {
    let o = p.orientation()?;
    if p.len() < 2 {
        return None;
    }
    let rest_len = p.len() - 1;
    Some(match end {
        End::First => (
            Pattern::run(o, p.origin().advance(o, 1), rest_len, p.color()),
            p.origin(),
        ),
        End::Last => (Pattern::run(o, p.origin(), rest_len, p.color()), p.last()),
    })
}

/// Whether breaking `run` into pixels would let two same-color patterns on
/// opposite sides of one of its cells join through that cell.
pub fn blocks_a_join(set: &PatternSet, run: &Pattern) -> bool {
    let Some(axis) = run.orientation() else {
        return false;
    };
    if run.is_single() {
        return false;
    }
    let across = axis.other();
    let color = run.color();
    let joinable = |cell: Option<Cell>| {
        cell.and_then(|c| set.owner_pattern(c))
            .is_some_and(|(_, p)| p.color() == color && p.lies_along(across))
    };
    run.cells()
        .any(|c| joinable(c.step(across.backward())) && joinable(c.step(across.forward())))
}

/// Draws up to `attempts` patterns and returns the first with `len >= 2`.
pub fn pick_run<R: Rng + ?Sized>(
    set: &PatternSet,
    rng: &mut R,
    attempts: usize,
) -> Option<(PatternId, Pattern)> {
    if set.singles() == set.len() {
        return None;
    }
    for _ in 0..attempts {
        let id = set.random_id(rng)?;
        if let Some(p) = set.get(id)
            && !p.is_single()
        {
            return Some((id, *p));
        }
    }
    None
}

/// Draws up to `attempts` patterns and returns the first single-cell one.
pub fn pick_single<R: Rng + ?Sized>(
    set: &PatternSet,
    rng: &mut R,
    attempts: usize,
) -> Option<(PatternId, Pattern)> {
    if set.singles() == 0 {
        return None;
    }
    for _ in 0..attempts {
        let id = set.random_id(rng)?;
        if let Some(p) = set.get(id)
            && p.is_single()
        {
            return Some((id, *p));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::common::ColorIndex;

    const A: ColorIndex = ColorIndex::new(0);
    const B: ColorIndex = ColorIndex::new(1);

    #[test]
    fn test_join_colinear_runs() {
        let a = Pattern::horizontal(Cell::new(0, 0), 2, A);
        let b = Pattern::pixel(Cell::new(2, 0), A);
        assert_eq!(
            join(&a, &b, Orientation::Horizontal),
            Some(Pattern::horizontal(Cell::new(0, 0), 3, A))
        );
        assert_eq!(join(&b, &a, Orientation::Horizontal), join(&a, &b, Orientation::Horizontal));
        assert_eq!(join(&a, &b, Orientation::Vertical), None);
    }

    #[test]
    fn test_join_pixels_vertically() {
        let a = Pattern::pixel(Cell::new(3, 1), A);
        let b = Pattern::horizontal(Cell::new(3, 2), 1, A);
        assert_eq!(
            join(&a, &b, Orientation::Vertical),
            Some(Pattern::vertical(Cell::new(3, 1), 2, A))
        );
    }

    #[test]
    fn test_join_rejects_gaps_and_colors() {
        let a = Pattern::pixel(Cell::new(0, 0), A);
        let gap = Pattern::pixel(Cell::new(2, 0), A);
        let other = Pattern::pixel(Cell::new(1, 0), B);
        let crossing = Pattern::vertical(Cell::new(1, 0), 2, A);
        assert_eq!(join(&a, &gap, Orientation::Horizontal), None);
        assert_eq!(join(&a, &other, Orientation::Horizontal), None);
        assert_eq!(join(&a, &crossing, Orientation::Horizontal), None);
    }

    #[test]
    fn test_detach_both_ends() {
        let v = Pattern::vertical(Cell::new(1, 1), 3, A);
        assert_eq!(
            detach(&v, End::First),
            Some((Pattern::vertical(Cell::new(1, 2), 2, A), Cell::new(1, 1)))
        );
        assert_eq!(
            detach(&v, End::Last),
            Some((Pattern::vertical(Cell::new(1, 1), 2, A), Cell::new(1, 3)))
        );

        let h = Pattern::horizontal(Cell::new(0, 0), 2, A);
        assert_eq!(
            detach(&h, End::First),
            Some((Pattern::pixel(Cell::new(1, 0), A), Cell::new(0, 0)))
        );
        assert_eq!(detach(&Pattern::pixel(Cell::new(0, 0), A), End::Last), None);
    }

    #[test]
    fn test_blocker_needs_joinable_patterns_on_both_sides() {
        use pixelrun_model::grid::Grid;

        // A . A
        // A A A
        // A B A
        let g = Grid::from_rows(
            &[
                vec![Some(A), None, Some(A)],
                vec![Some(A), Some(A), Some(A)],
                vec![Some(A), Some(B), Some(A)],
            ],
            2,
        )
        .unwrap();
        let middle = Pattern::horizontal(Cell::new(0, 1), 3, A);
        let mut patterns = vec![middle];
        for (x, y) in [(0, 0), (2, 0), (0, 2), (1, 2), (2, 2)] {
            let c = Cell::new(x, y);
            patterns.push(Pattern::pixel(c, g.color(c).unwrap()));
        }
        let set = PatternSet::from_patterns(&g, patterns).unwrap();
        assert!(blocks_a_join(&set, &middle));

        // The left column touches the border, so nothing lies beyond it.
        let left = Pattern::vertical(Cell::new(0, 0), 3, A);
        let right = Pattern::horizontal(Cell::new(1, 1), 2, A);
        let set = PatternSet::from_patterns(
            &g,
            [
                left,
                right,
                Pattern::pixel(Cell::new(2, 0), A),
                Pattern::pixel(Cell::new(1, 2), B),
                Pattern::pixel(Cell::new(2, 2), A),
            ],
        )
        .unwrap();
        assert!(blocks_a_join(&set, &right));
        assert!(!blocks_a_join(&set, &left));

        let lone = Pattern::horizontal(Cell::new(0, 0), 3, A);
        let row = Grid::from_rows(&[vec![Some(A); 3]], 1).unwrap();
        let set = PatternSet::from_patterns(&row, [lone]).unwrap();
        assert!(!blocks_a_join(&set, &lone));
    }

    #[test]
    fn test_outward_points_away() {
        let h = Pattern::horizontal(Cell::new(2, 0), 3, A);
        assert_eq!(
            outward(&h, Orientation::Horizontal, End::First),
            (Cell::new(2, 0), Direction::Left)
        );
        assert_eq!(
            outward(&h, Orientation::Horizontal, End::Last),
            (Cell::new(4, 0), Direction::Right)
        );
    }
}
