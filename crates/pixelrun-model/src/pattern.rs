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

use crate::common::{Cell, ColorIndex, Orientation};

/// The three pattern variants. `code()` is the type tag used in the
/// encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
    Pixel,
    Horizontal,
    Vertical,
}

impl PatternKind {
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            PatternKind::Pixel => 0,
            PatternKind::Horizontal => 1,
            PatternKind::Vertical => 2,
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternKind::Pixel => write!(f, "Pixel"),
            PatternKind::Horizontal => write!(f, "HorizontalRun"),
            PatternKind::Vertical => write!(f, "VerticalRun"),
        }
    }
}

/// A single-colored straight segment of cells.
///
/// Runs have `len >= 1`. A run of length one covers the same cell as a
/// [`Pattern::Pixel`] and is treated as orientation-agnostic by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Pixel {
        x: u32,
        y: u32,
        color: ColorIndex,
    },
    Horizontal {
        x: u32,
        y: u32,
        len: u32,
        color: ColorIndex,
    },
    Vertical {
        x: u32,
        y: u32,
        len: u32,
        color: ColorIndex,
    },
}

impl Pattern {
    #[inline]
    pub const fn pixel(cell: Cell, color: ColorIndex) -> Self {
        Pattern::Pixel {
            x: cell.x,
            y: cell.y,
            color,
        }
    }

    #[inline]
    pub fn horizontal(origin: Cell, len: u32, color: ColorIndex) -> Self {
        debug_assert!(len >= 1);
        Pattern::Horizontal {
            x: origin.x,
            y: origin.y,
            len,
            color,
        }
    }

    #[inline]
    pub fn vertical(origin: Cell, len: u32, color: ColorIndex) -> Self {
        debug_assert!(len >= 1);
        Pattern::Vertical {
            x: origin.x,
            y: origin.y,
            len,
            color,
        }
    }

    /// A run along `orientation`; a length of one yields a [`Pattern::Pixel`].
    #[inline]
    pub fn run(orientation: Orientation, origin: Cell, len: u32, color: ColorIndex) -> Self {
        match (len, orientation) {
            (1, _) => Pattern::pixel(origin, color),
            (_, Orientation::Horizontal) => Pattern::horizontal(origin, len, color),
            (_, Orientation::Vertical) => Pattern::vertical(origin, len, color),
        }
    }

    #[inline]
    pub const fn kind(&self) -> PatternKind {
        match self {
            Pattern::Pixel { .. } => PatternKind::Pixel,
            Pattern::Horizontal { .. } => PatternKind::Horizontal,
            Pattern::Vertical { .. } => PatternKind::Vertical,
        }
    }

    #[inline]
    pub const fn color(&self) -> ColorIndex {
        match self {
            Pattern::Pixel { color, .. }
            | Pattern::Horizontal { color, .. }
            | Pattern::Vertical { color, .. } => *color,
        }
    }

    /// First covered cell (leftmost or topmost).
    #[inline]
    pub const fn origin(&self) -> Cell {
        match self {
            Pattern::Pixel { x, y, .. }
            | Pattern::Horizontal { x, y, .. }
            | Pattern::Vertical { x, y, .. } => Cell::new(*x, *y),
        }
    }

    /// Number of covered cells.
    #[inline]
    pub const fn len(&self) -> u32 {
        match self {
            Pattern::Pixel { .. } => 1,
            Pattern::Horizontal { len, .. } | Pattern::Vertical { len, .. } => *len,
        }
    }

    /// Only a malformed run with `len == 0` is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn is_single(&self) -> bool {
        self.len() == 1
    }

    /// The declared orientation; `None` for pixels.
    #[inline]
    pub const fn orientation(&self) -> Option<Orientation> {
        match self {
            Pattern::Pixel { .. } => None,
            Pattern::Horizontal { .. } => Some(Orientation::Horizontal),
            Pattern::Vertical { .. } => Some(Orientation::Vertical),
        }
    }

    /// Whether the pattern can act as a run along `orientation`.
    /// Single-cell patterns lie on both axes.
    #[inline]
    pub fn lies_along(&self, orientation: Orientation) -> bool {
        self.is_single() || self.orientation() == Some(orientation)
    }

    /// Last covered cell (rightmost or bottommost).
    #[inline]
    pub fn last(&self) -> Cell {
        let o = self.origin();
        match self {
            Pattern::Pixel { .. } => o,
            Pattern::Horizontal { len, .. } => Cell::new(o.x + len.saturating_sub(1), o.y),
            Pattern::Vertical { len, .. } => Cell::new(o.x, o.y + len.saturating_sub(1)),
        }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        let (o, l) = (self.origin(), self.last());
        cell.x >= o.x && cell.x <= l.x && cell.y >= o.y && cell.y <= l.y
    }

    /// Iterates the covered cells from origin to last.
    #[inline]
    pub fn cells(&self) -> PatternCells {
        let orientation = self.orientation().unwrap_or(Orientation::Horizontal);
        PatternCells {
            origin: self.origin(),
            orientation,
            len: self.len(),
            next: 0,
        }
    }

    /// Replaces a length-one run with the equivalent pixel.
    #[inline]
    pub fn canonical(self) -> Pattern {
        if self.is_single() {
            Pattern::pixel(self.origin(), self.color())
        } else {
            self
        }
    }

    /// Sort key used for output: `(y, x, color)` then variant and length.
    #[inline]
    pub fn sort_key(&self) -> (u32, u32, ColorIndex, PatternKind, u32) {
        let o = self.origin();
        (o.y, o.x, self.color(), self.kind(), self.len())
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let o = self.origin();
        match self {
            Pattern::Pixel { color, .. } => write!(f, "Pixel({}, {}, c{})", o.x, o.y, color),
            Pattern::Horizontal { len, color, .. } => {
                write!(f, "HorizontalRun({}, {}, len {}, c{})", o.x, o.y, len, color)
            }
            Pattern::Vertical { len, color, .. } => {
                write!(f, "VerticalRun({}, {}, len {}, c{})", o.x, o.y, len, color)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternCells {
    origin: Cell,
    orientation: Orientation,
    len: u32,
    next: u32,
}

impl Iterator for PatternCells {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Cell> {
        if self.next >= self.len {
            return None;
        }
        let cell = self.origin.advance(self.orientation, self.next);
        self.next += 1;
        Some(cell)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = (self.len - self.next) as usize;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for PatternCells {}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: ColorIndex = ColorIndex::new(1);

    #[test]
    fn test_cells_cover_the_run() {
        let h = Pattern::horizontal(Cell::new(2, 1), 3, RED);
        let cells: Vec<_> = h.cells().collect();
        assert_eq!(cells, vec![Cell::new(2, 1), Cell::new(3, 1), Cell::new(4, 1)]);
        assert_eq!(h.cells().len(), 3);

        let v = Pattern::vertical(Cell::new(0, 0), 2, RED);
        let cells: Vec<_> = v.cells().collect();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_contains_and_last() {
        let v = Pattern::vertical(Cell::new(1, 1), 3, RED);
        assert_eq!(v.last(), Cell::new(1, 3));
        assert!(v.contains(Cell::new(1, 2)));
        assert!(!v.contains(Cell::new(2, 2)));
        assert!(!v.contains(Cell::new(1, 4)));
    }

    #[test]
    fn test_run_of_length_one_is_pixel() {
        let p = Pattern::run(Orientation::Vertical, Cell::new(4, 4), 1, RED);
        assert_eq!(p.kind(), PatternKind::Pixel);
        let r = Pattern::run(Orientation::Vertical, Cell::new(4, 4), 2, RED);
        assert_eq!(r.kind(), PatternKind::Vertical);
    }

    #[test]
    fn test_single_cell_patterns_lie_on_both_axes() {
        let h1 = Pattern::horizontal(Cell::new(0, 0), 1, RED);
        assert!(h1.lies_along(Orientation::Vertical));
        assert_eq!(h1.canonical(), Pattern::pixel(Cell::new(0, 0), RED));

        let h2 = Pattern::horizontal(Cell::new(0, 0), 2, RED);
        assert!(h2.lies_along(Orientation::Horizontal));
        assert!(!h2.lies_along(Orientation::Vertical));
        assert_eq!(h2.canonical(), h2);
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(PatternKind::Pixel.code(), 0);
        assert_eq!(PatternKind::Horizontal.code(), 1);
        assert_eq!(PatternKind::Vertical.code(), 2);
    }
}
