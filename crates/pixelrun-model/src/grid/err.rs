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

use crate::common::{Cell, ColorIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCountMismatchError {
    expected: usize,
    actual: usize,
}

impl CellCountMismatchError {
    pub fn new(expected: usize, actual: usize) -> Self {
        Self { expected, actual }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn actual(&self) -> usize {
        self.actual
    }
}

impl std::fmt::Display for CellCountMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid expects {} cells but {} were given",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for CellCountMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DegenerateDimensionsError {
    width: u32,
    height: u32,
}

impl DegenerateDimensionsError {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Display for DegenerateDimensionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid dimensions {}x{} are degenerate: either both or neither must be zero",
            self.width, self.height
        )
    }
}

impl std::error::Error for DegenerateDimensionsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaggedRowError {
    row: usize,
    expected: usize,
    actual: usize,
}

impl RaggedRowError {
    pub fn new(row: usize, expected: usize, actual: usize) -> Self {
        Self {
            row,
            expected,
            actual,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn actual(&self) -> usize {
        self.actual
    }
}

impl std::fmt::Display for RaggedRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row {} has {} cells, expected {}",
            self.row, self.actual, self.expected
        )
    }
}

impl std::error::Error for RaggedRowError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorOutOfRangeError {
    cell: Cell,
    color: ColorIndex,
    palette_len: usize,
}

impl ColorOutOfRangeError {
    pub fn new(cell: Cell, color: ColorIndex, palette_len: usize) -> Self {
        Self {
            cell,
            color,
            palette_len,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn color(&self) -> ColorIndex {
        self.color
    }

    pub fn palette_len(&self) -> usize {
        self.palette_len
    }
}

impl std::fmt::Display for ColorOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Color index {} at cell {} is outside the palette of {} colors",
            self.color, self.cell, self.palette_len
        )
    }
}

impl std::error::Error for ColorOutOfRangeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridError {
    CellCountMismatch(CellCountMismatchError),
    DegenerateDimensions(DegenerateDimensionsError),
    RaggedRow(RaggedRowError),
    ColorOutOfRange(ColorOutOfRangeError),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::CellCountMismatch(e) => write!(f, "{}", e),
            GridError::DegenerateDimensions(e) => write!(f, "{}", e),
            GridError::RaggedRow(e) => write!(f, "{}", e),
            GridError::ColorOutOfRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GridError {}

impl From<CellCountMismatchError> for GridError {
    fn from(err: CellCountMismatchError) -> Self {
        GridError::CellCountMismatch(err)
    }
}

impl From<DegenerateDimensionsError> for GridError {
    fn from(err: DegenerateDimensionsError) -> Self {
        GridError::DegenerateDimensions(err)
    }
}

impl From<RaggedRowError> for GridError {
    fn from(err: RaggedRowError) -> Self {
        GridError::RaggedRow(err)
    }
}

impl From<ColorOutOfRangeError> for GridError {
    fn from(err: ColorOutOfRangeError) -> Self {
        GridError::ColorOutOfRange(err)
    }
}
