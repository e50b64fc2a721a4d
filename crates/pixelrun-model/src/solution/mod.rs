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

pub mod err;

use crate::{
    common::ColorIndex,
    coverage::{check_coverage, fits},
    grid::Grid,
    pattern::{Pattern, PatternKind},
    solution::err::CoverageError,
};

/// Number of patterns per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PatternCounts {
    pub pixels: usize,
    pub horizontal: usize,
    pub vertical: usize,
}

impl PatternCounts {
    #[inline]
    pub fn total(&self) -> usize {
        self.pixels + self.horizontal + self.vertical
    }

    #[inline]
    pub fn runs(&self) -> usize {
        self.horizontal + self.vertical
    }

    #[inline]
    pub fn record(&mut self, kind: PatternKind) {
        match kind {
            PatternKind::Pixel => self.pixels += 1,
            PatternKind::Horizontal => self.horizontal += 1,
            PatternKind::Vertical => self.vertical += 1,
        }
    }
}

impl std::fmt::Display for PatternCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} patterns ({} pixels, {} horizontal, {} vertical)",
            self.total(),
            self.pixels,
            self.horizontal,
            self.vertical
        )
    }
}

/// A finished pattern set in canonical form.
///
/// Length-one runs are stored as pixels and patterns are sorted by
/// `(y, x, color)`, so two solutions covering a grid the same way compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    width: u32,
    height: u32,
    patterns: Vec<Pattern>,
}

impl Solution {
    pub fn new<I>(width: u32, height: u32, patterns: I) -> Self
    where
        I: IntoIterator<Item = Pattern>,
    {
        let mut patterns: Vec<Pattern> = patterns.into_iter().map(Pattern::canonical).collect();
        patterns.sort_by_key(Pattern::sort_key);
        Self {
            width,
            height,
            patterns,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn counts(&self) -> PatternCounts {
        let mut counts = PatternCounts::default();
        for p in &self.patterns {
            counts.record(p.kind());
        }
        counts
    }

    /// Total number of covered cells.
    pub fn covered_cells(&self) -> usize {
        self.patterns.iter().map(|p| p.len() as usize).sum()
    }

    /// Paints every pattern onto a blank `width x height` raster.
    ///
    /// Patterns that leave the raster are clipped; later patterns win on
    /// overlap. Use [`Solution::validate`] to detect either.
    pub fn reconstruct(&self) -> Vec<Option<ColorIndex>> {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut out = vec![None; w * h];
        for p in &self.patterns {
            for cell in p.cells().take_while(|c| (c.x as usize) < w && (c.y as usize) < h) {
                out[cell.y as usize * w + cell.x as usize] = Some(p.color());
            }
        }
        out
    }

    /// Checks that the solution reproduces `grid` exactly.
    pub fn validate(&self, grid: &Grid) -> Result<(), CoverageError> {
        check_coverage(grid, (self.width, self.height), &self.patterns, None)
    }

    /// Whether every pattern lies inside the solution's raster.
    pub fn is_in_bounds(&self) -> bool {
        self.patterns
            .iter()
            .all(|p| fits(p, self.width, self.height))
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution({}x{}, {})", self.width, self.height, self.counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Cell;

    const A: ColorIndex = ColorIndex::new(0);
    const B: ColorIndex = ColorIndex::new(1);

    #[test]
    fn test_new_canonicalises_and_sorts() {
        let s = Solution::new(
            3,
            2,
            [
                Pattern::vertical(Cell::new(2, 0), 2, B),
                Pattern::horizontal(Cell::new(0, 1), 1, A),
                Pattern::horizontal(Cell::new(0, 0), 2, A),
            ],
        );
        assert_eq!(
            s.patterns(),
            &[
                Pattern::horizontal(Cell::new(0, 0), 2, A),
                Pattern::vertical(Cell::new(2, 0), 2, B),
                Pattern::pixel(Cell::new(0, 1), A),
            ]
        );
        let counts = s.counts();
        assert_eq!(counts.pixels, 1);
        assert_eq!(counts.horizontal, 1);
        assert_eq!(counts.vertical, 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(s.covered_cells(), 5);
    }

    #[test]
    fn test_reconstruct_matches_grid() {
        let grid = Grid::from_rows(
            &[vec![Some(A), Some(A), Some(B)], vec![Some(A), None, Some(B)]],
            2,
        )
        .unwrap();
        let s = Solution::new(
            3,
            2,
            [
                Pattern::horizontal(Cell::new(0, 0), 2, A),
                Pattern::pixel(Cell::new(0, 1), A),
                Pattern::vertical(Cell::new(2, 0), 2, B),
            ],
        );
        assert_eq!(s.reconstruct(), grid.cells());
        assert_eq!(s.validate(&grid), Ok(()));
        assert!(s.is_in_bounds());
    }

    #[test]
    fn test_validate_reports_gap() {
        let grid = Grid::from_rows(&[vec![Some(A), Some(A)]], 1).unwrap();
        let s = Solution::new(2, 1, [Pattern::pixel(Cell::new(0, 0), A)]);
        assert!(matches!(s.validate(&grid), Err(CoverageError::Uncovered(_))));
    }

    #[test]
    fn test_validate_rejects_zero_length_run() {
        let grid = Grid::from_rows(&[vec![Some(A); 3]], 1).unwrap();
        let mut patterns: Vec<_> = (0..3).map(|x| Pattern::pixel(Cell::new(x, 0), A)).collect();
        patterns.push(Pattern::Horizontal {
            x: 0,
            y: 0,
            len: 0,
            color: A,
        });
        let s = Solution::new(3, 1, patterns);
        assert!(matches!(s.validate(&grid), Err(CoverageError::EmptyRun(_))));
        assert!(!s.is_in_bounds());
    }

    #[test]
    fn test_reconstruct_clips_out_of_bounds_runs() {
        let s = Solution::new(2, 1, [Pattern::horizontal(Cell::new(1, 0), 3, A)]);
        assert!(!s.is_in_bounds());
        assert_eq!(s.reconstruct(), vec![None, Some(A)]);
    }
}
