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
    common::Orientation,
    grid::Grid,
    pattern::Pattern,
    solution::err::{
        ColorMismatchError, CoverageError, DimensionMismatchError, EmptyRunError, OverlapError,
        PatternOutOfBoundsError, UncoveredCellError,
    },
};
use fixedbitset::FixedBitSet;

/// Whether `pattern` covers at least one cell and every cell lies inside a
/// `width x height` raster.
#[inline]
pub fn fits(pattern: &Pattern, width: u32, height: u32) -> bool {
    if pattern.is_empty() {
        return false;
    }
    let o = pattern.origin();
    let (x, y, len) = (o.x as u64, o.y as u64, pattern.len() as u64);
    let (end_x, end_y) = match pattern.orientation() {
        Some(Orientation::Horizontal) => (x + len, y + 1),
        Some(Orientation::Vertical) => (x + 1, y + len),
        None => (x + 1, y + 1),
    };
    end_x <= width as u64 && end_y <= height as u64
}

/// Full O(cells) coverage check of `patterns` against `grid`.
///
/// With a `region`, only the cells in the region must be covered and no
/// pattern may reach outside it; without one the whole grid is checked.
/// The first violation found in pattern order, then row-major order, is
/// reported.
pub fn check_coverage<'a, I>(
    grid: &Grid,
    dims: (u32, u32),
    patterns: I,
    region: Option<&FixedBitSet>,
) -> Result<(), CoverageError>
where
    I: IntoIterator<Item = &'a Pattern>,
{
    let expected = (grid.width(), grid.height());
    if dims != expected {
        return Err(DimensionMismatchError::new(expected, dims).into());
    }

    let mut seen = FixedBitSet::with_capacity(grid.len());
    for pattern in patterns {
        if pattern.is_empty() {
            return Err(EmptyRunError::new(*pattern).into());
        }
        if !fits(pattern, grid.width(), grid.height()) {
            return Err(PatternOutOfBoundsError::new(*pattern).into());
        }
        for cell in pattern.cells() {
            let idx = grid.index_of(cell);
            if region.is_some_and(|r| !r.contains(idx)) {
                return Err(PatternOutOfBoundsError::new(*pattern).into());
            }
            let expected = grid.color(cell);
            if expected != Some(pattern.color()) {
                return Err(ColorMismatchError::new(cell, expected, pattern.color()).into());
            }
            if seen.put(idx) {
                return Err(OverlapError::new(cell).into());
            }
        }
    }

    for (idx, color) in grid.cells().iter().enumerate() {
        if color.is_none() || seen.contains(idx) {
            continue;
        }
        if region.is_none_or(|r| r.contains(idx)) {
            return Err(UncoveredCellError::new(grid.cell_at(idx)).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Cell, ColorIndex};

    const A: ColorIndex = ColorIndex::new(0);
    const B: ColorIndex = ColorIndex::new(1);

    fn grid() -> Grid {
        // A A B
        // . A B
        Grid::from_rows(
            &[
                vec![Some(A), Some(A), Some(B)],
                vec![None, Some(A), Some(B)],
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_exact_cover_passes() {
        let g = grid();
        let ps = [
            Pattern::horizontal(Cell::new(0, 0), 2, A),
            Pattern::pixel(Cell::new(1, 1), A),
            Pattern::vertical(Cell::new(2, 0), 2, B),
        ];
        assert_eq!(check_coverage(&g, (3, 2), &ps, None), Ok(()));
    }

    #[test]
    fn test_gap_is_reported() {
        let g = grid();
        let ps = [
            Pattern::horizontal(Cell::new(0, 0), 2, A),
            Pattern::vertical(Cell::new(2, 0), 2, B),
        ];
        assert_eq!(
            check_coverage(&g, (3, 2), &ps, None),
            Err(CoverageError::Uncovered(UncoveredCellError::new(Cell::new(1, 1))))
        );
    }

    #[test]
    fn test_overlap_is_reported() {
        let g = grid();
        let ps = [
            Pattern::horizontal(Cell::new(0, 0), 2, A),
            Pattern::vertical(Cell::new(1, 0), 2, A),
            Pattern::vertical(Cell::new(2, 0), 2, B),
        ];
        assert_eq!(
            check_coverage(&g, (3, 2), &ps, None),
            Err(CoverageError::Overlap(OverlapError::new(Cell::new(1, 0))))
        );
    }

    #[test]
    fn test_background_and_wrong_color_are_reported() {
        let g = grid();
        let ps = [Pattern::pixel(Cell::new(0, 1), A)];
        assert!(matches!(
            check_coverage(&g, (3, 2), &ps, None),
            Err(CoverageError::ColorMismatch(e)) if e.expected().is_none()
        ));

        let ps = [Pattern::pixel(Cell::new(2, 0), A)];
        assert!(matches!(
            check_coverage(&g, (3, 2), &ps, None),
            Err(CoverageError::ColorMismatch(e)) if e.expected() == Some(B)
        ));
    }

    #[test]
    fn test_out_of_bounds_and_dimensions() {
        let g = grid();
        let ps = [Pattern::horizontal(Cell::new(2, 0), 2, B)];
        assert!(matches!(
            check_coverage(&g, (3, 2), &ps, None),
            Err(CoverageError::OutOfBounds(_))
        ));
        assert!(matches!(
            check_coverage(&g, (2, 2), &[], None),
            Err(CoverageError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_region_limits_the_check() {
        let g = grid();
        let mut region = FixedBitSet::with_capacity(g.len());
        region.insert(g.index_of(Cell::new(2, 0)));
        region.insert(g.index_of(Cell::new(2, 1)));

        let ps = [Pattern::vertical(Cell::new(2, 0), 2, B)];
        assert_eq!(check_coverage(&g, (3, 2), &ps, Some(&region)), Ok(()));

        let ps = [Pattern::pixel(Cell::new(0, 0), A)];
        assert!(matches!(
            check_coverage(&g, (3, 2), &ps, Some(&region)),
            Err(CoverageError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_zero_length_run_is_rejected() {
        // A A A
        let g = Grid::from_rows(&[vec![Some(A); 3]], 1).unwrap();
        let empty = Pattern::Horizontal {
            x: 0,
            y: 0,
            len: 0,
            color: A,
        };
        let ps = [
            empty,
            Pattern::pixel(Cell::new(0, 0), A),
            Pattern::pixel(Cell::new(1, 0), A),
            Pattern::pixel(Cell::new(2, 0), A),
        ];
        assert!(empty.is_empty());
        assert!(!fits(&empty, 3, 1));
        assert_eq!(
            check_coverage(&g, (3, 1), &ps, None),
            Err(CoverageError::EmptyRun(EmptyRunError::new(empty)))
        );
    }

    #[test]
    fn test_fits_handles_long_runs() {
        let p = Pattern::horizontal(Cell::new(u32::MAX - 1, 0), 5, A);
        assert!(!fits(&p, 3, 3));
        assert!(fits(&Pattern::vertical(Cell::new(0, 1), 2, A), 1, 3));
    }
}
