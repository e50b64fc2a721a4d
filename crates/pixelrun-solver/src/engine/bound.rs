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

use fixedbitset::FixedBitSet;
use pixelrun_model::{common::Direction, grid::Grid};

/// Which lower bound on the pattern count the engine stops at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LowerBoundKind {
    /// Always zero; the search never stops early.
    Trivial,
    /// Per same-color 4-connected component, the cell count divided by the
    /// longest straight same-color segment inside it, rounded up.
    #[default]
    Components,
}

impl LowerBoundKind {
    pub fn compute(self, grid: &Grid) -> usize {
        match self {
            LowerBoundKind::Trivial => 0,
            LowerBoundKind::Components => component_segment_bound(grid),
        }
    }
}

impl std::fmt::Display for LowerBoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LowerBoundKind::Trivial => write!(f, "trivial"),
            LowerBoundKind::Components => write!(f, "components"),
        }
    }
}

/// Labels every foreground cell with its same-color 4-connected component.
/// Returns the labels (row-major, `u32::MAX` for background) and the size of
/// each component.
pub fn label_components(grid: &Grid) -> (Vec<u32>, Vec<usize>) {
    let mut labels = vec![u32::MAX; grid.len()];
    let mut sizes = Vec::new();
    let mut visited = FixedBitSet::with_capacity(grid.len());
    let mut stack = Vec::new();

    for (start, color) in grid.foreground() {
        let start_idx = grid.index_of(start);
        if visited.put(start_idx) {
            continue;
        }
        let label = sizes.len() as u32;
        let mut size = 0usize;
        stack.push(start);
        while let Some(cell) = stack.pop() {
            labels[grid.index_of(cell)] = label;
            size += 1;
            for dir in Direction::ALL {
                if let Some(n) = grid.neighbor(cell, dir)
                    && grid.color(n) == Some(color)
                    && !visited.put(grid.index_of(n))
                {
                    stack.push(n);
                }
            }
        }
        sizes.push(size);
    }
    (labels, sizes)
}

/// No pattern can cover more cells of a component than its longest
/// straight same-color segment, so each component needs at least
/// `ceil(cells / longest)` patterns.
pub fn component_segment_bound(grid: &Grid) -> usize {
    let (labels, sizes) = label_components(grid);
    if sizes.is_empty() {
        return 0;
    }
    let mut longest = vec![1usize; sizes.len()];
    let (w, h) = (grid.width() as usize, grid.height() as usize);

    let mut scan = |index_of: &dyn Fn(usize, usize) -> usize, outer: usize, inner: usize| {
        for o in 0..outer {
            let mut run = 0usize;
            let mut prev = u32::MAX;
            for i in 0..inner {
                let label = labels[index_of(o, i)];
                run = if label == u32::MAX {
                    0
                } else if label == prev {
                    run + 1
                } else {
                    1
                };
                if label != u32::MAX {
                    let slot = &mut longest[label as usize];
                    *slot = (*slot).max(run);
                }
                prev = label;
            }
        }
    };
    scan(&|row, col| row * w + col, h, w);
    scan(&|col, row| row * w + col, w, h);

    sizes
        .iter()
        .zip(&longest)
        .map(|(&n, &l)| n.div_ceil(l).max(1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::common::ColorIndex;

    const A: Option<ColorIndex> = Some(ColorIndex::new(0));
    const B: Option<ColorIndex> = Some(ColorIndex::new(1));

    #[test]
    fn test_single_row_needs_one_pattern() {
        let g = Grid::from_rows(&[vec![A; 5]], 1).unwrap();
        assert_eq!(component_segment_bound(&g), 1);
    }

    #[test]
    fn test_checkerboard_needs_every_pixel() {
        let g = Grid::from_rows(&[vec![A, B, A], vec![B, A, B], vec![A, B, A]], 2).unwrap();
        assert_eq!(component_segment_bound(&g), 9);
        let (_, sizes) = label_components(&g);
        assert_eq!(sizes.len(), 9);
    }

    #[test]
    fn test_l_shape_needs_two() {
        let g = Grid::from_rows(
            &[vec![A, A, A], vec![A, None, None], vec![A, None, None]],
            1,
        )
        .unwrap();
        assert_eq!(component_segment_bound(&g), 2);
    }

    #[test]
    fn test_square_block() {
        // 3x3 block of one color: 9 cells, longest segment 3.
        let g = Grid::from_rows(&[vec![A; 3], vec![A; 3], vec![A; 3]], 1).unwrap();
        assert_eq!(component_segment_bound(&g), 3);
    }

    #[test]
    fn test_background_and_empty_grids() {
        let g = Grid::from_rows(&[vec![None, None]], 1).unwrap();
        assert_eq!(component_segment_bound(&g), 0);
        assert_eq!(LowerBoundKind::Trivial.compute(&g), 0);
        let empty = Grid::new(0, 0, vec![], 0).unwrap();
        assert_eq!(LowerBoundKind::Components.compute(&empty), 0);
    }

    #[test]
    fn test_labels_follow_color() {
        let g = Grid::from_rows(&[vec![A, A, B], vec![None, A, B]], 2).unwrap();
        let (labels, sizes) = label_components(&g);
        assert_eq!(sizes, vec![3, 2]);
        assert_eq!(labels, vec![0, 0, 1, u32::MAX, 0, 1]);
    }
}
