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
    common::{Cell, ColorIndex},
    pattern::Pattern,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionMismatchError {
    expected: (u32, u32),
    actual: (u32, u32),
}

impl DimensionMismatchError {
    pub fn new(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self { expected, actual }
    }

    pub fn expected(&self) -> (u32, u32) {
        self.expected
    }

    pub fn actual(&self) -> (u32, u32) {
        self.actual
    }
}

impl std::fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dimensions {}x{} do not match the grid {}x{}",
            self.actual.0, self.actual.1, self.expected.0, self.expected.1
        )
    }
}

impl std::error::Error for DimensionMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternOutOfBoundsError {
    pattern: Pattern,
}

impl PatternOutOfBoundsError {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }
}

impl std::fmt::Display for PatternOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pattern {} leaves the grid", self.pattern)
    }
}

impl std::error::Error for PatternOutOfBoundsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyRunError {
    pattern: Pattern,
}

impl EmptyRunError {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }
}

impl std::fmt::Display for EmptyRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pattern {} covers no cells", self.pattern)
    }
}

impl std::error::Error for EmptyRunError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapError {
    cell: Cell,
}

impl OverlapError {
    pub fn new(cell: Cell) -> Self {
        Self { cell }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }
}

impl std::fmt::Display for OverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell {} is covered by more than one pattern", self.cell)
    }
}

impl std::error::Error for OverlapError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMismatchError {
    cell: Cell,
    expected: Option<ColorIndex>,
    found: ColorIndex,
}

impl ColorMismatchError {
    pub fn new(cell: Cell, expected: Option<ColorIndex>, found: ColorIndex) -> Self {
        Self {
            cell,
            expected,
            found,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// `None` when the pattern paints a background cell.
    pub fn expected(&self) -> Option<ColorIndex> {
        self.expected
    }

    pub fn found(&self) -> ColorIndex {
        self.found
    }
}

impl std::fmt::Display for ColorMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.expected {
            Some(expected) => write!(
                f,
                "Cell {} has color {} but is covered with color {}",
                self.cell, expected, self.found
            ),
            None => write!(
                f,
                "Background cell {} is covered with color {}",
                self.cell, self.found
            ),
        }
    }
}

impl std::error::Error for ColorMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UncoveredCellError {
    cell: Cell,
}

impl UncoveredCellError {
    pub fn new(cell: Cell) -> Self {
        Self { cell }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }
}

impl std::fmt::Display for UncoveredCellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell {} is not covered by any pattern", self.cell)
    }
}

impl std::error::Error for UncoveredCellError {}

/// A violation of exact coverage: every foreground cell covered exactly
/// once with its own color, and nothing else covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverageError {
    DimensionMismatch(DimensionMismatchError),
    OutOfBounds(PatternOutOfBoundsError),
    EmptyRun(EmptyRunError),
    Overlap(OverlapError),
    ColorMismatch(ColorMismatchError),
    Uncovered(UncoveredCellError),
}

impl std::fmt::Display for CoverageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageError::DimensionMismatch(e) => write!(f, "{}", e),
            CoverageError::OutOfBounds(e) => write!(f, "{}", e),
            CoverageError::EmptyRun(e) => write!(f, "{}", e),
            CoverageError::Overlap(e) => write!(f, "{}", e),
            CoverageError::ColorMismatch(e) => write!(f, "{}", e),
            CoverageError::Uncovered(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CoverageError {}

impl From<DimensionMismatchError> for CoverageError {
    fn from(err: DimensionMismatchError) -> Self {
        CoverageError::DimensionMismatch(err)
    }
}

impl From<PatternOutOfBoundsError> for CoverageError {
    fn from(err: PatternOutOfBoundsError) -> Self {
        CoverageError::OutOfBounds(err)
    }
}

impl From<EmptyRunError> for CoverageError {
    fn from(err: EmptyRunError) -> Self {
        CoverageError::EmptyRun(err)
    }
}

impl From<OverlapError> for CoverageError {
    fn from(err: OverlapError) -> Self {
        CoverageError::Overlap(err)
    }
}

impl From<ColorMismatchError> for CoverageError {
    fn from(err: ColorMismatchError) -> Self {
        CoverageError::ColorMismatch(err)
    }
}

impl From<UncoveredCellError> for CoverageError {
    fn from(err: UncoveredCellError) -> Self {
        CoverageError::Uncovered(err)
    }
}
