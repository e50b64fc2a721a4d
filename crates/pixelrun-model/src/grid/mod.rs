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
    common::{Cell, ColorIndex, Direction},
    grid::err::{
        CellCountMismatchError, ColorOutOfRangeError, DegenerateDimensionsError, GridError,
        RaggedRowError,
    },
};

/// An immutable `width x height` raster of palette indices.
///
/// Each cell either holds a [`ColorIndex`] or is background (`None`).
/// Cells are stored row-major, so the linear index of `(x, y)` is
/// `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    palette_len: usize,
    cells: Vec<Option<ColorIndex>>,
    foreground: usize,
}

impl Grid {
    /// Validates and builds a grid.
    ///
    /// Fails when the cell count is not `width * height`, when exactly one
    /// of the dimensions is zero, or when a color lies outside the palette.
    pub fn new(
        width: u32,
        height: u32,
        cells: Vec<Option<ColorIndex>>,
        palette_len: usize,
    ) -> Result<Self, GridError> {
        if (width == 0) != (height == 0) {
            return Err(DegenerateDimensionsError::new(width, height).into());
        }

        let expected = (width as usize) * (height as usize);
        if cells.len() != expected {
            return Err(CellCountMismatchError::new(expected, cells.len()).into());
        }

        let mut foreground = 0;
        for (idx, color) in cells.iter().enumerate() {
            if let Some(c) = color {
                if c.get() as usize >= palette_len {
                    let cell = Cell::new(idx as u32 % width, idx as u32 / width);
                    return Err(ColorOutOfRangeError::new(cell, *c, palette_len).into());
                }
                foreground += 1;
            }
        }

        Ok(Self {
            width,
            height,
            palette_len,
            cells,
            foreground,
        })
    }

    /// Builds a grid from rows of equal length.
    pub fn from_rows<R>(rows: &[R], palette_len: usize) -> Result<Self, GridError>
    where
        R: AsRef<[Option<ColorIndex>]>,
    {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(RaggedRowError::new(i, width, row.len()).into());
            }
            cells.extend_from_slice(row);
        }
        Self::new(width as u32, height as u32, cells, palette_len)
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
    pub fn palette_len(&self) -> usize {
        self.palette_len
    }

    /// Total number of cells, background included.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of non-background cells.
    #[inline]
    pub fn foreground_count(&self) -> usize {
        self.foreground
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    #[inline]
    pub fn index_of(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell));
        (cell.y as usize) * (self.width as usize) + cell.x as usize
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index % w) as u32, (index / w) as u32)
    }

    /// Color at `cell`; `None` for background or out-of-bounds cells.
    #[inline]
    pub fn color(&self, cell: Cell) -> Option<ColorIndex> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[self.index_of(cell)]
    }

    /// In-bounds neighbor of `cell` in `dir`.
    #[inline]
    pub fn neighbor(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        cell.step(dir).filter(|c| self.contains(*c))
    }

    #[inline]
    pub fn cells(&self) -> &[Option<ColorIndex>] {
        &self.cells
    }

    /// Non-background cells with their colors, row-major.
    pub fn foreground(&self) -> impl Iterator<Item = (Cell, ColorIndex)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (self.cell_at(i), c)))
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid({}x{}, {} colors, {} foreground cells)",
            self.width, self.height, self.palette_len, self.foreground
        )
    }
}
