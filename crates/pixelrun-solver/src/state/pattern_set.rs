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
    err::MoveValidationError,
    eval::cost::CostWeights,
    state::{cost::Cost, moves::Move},
};
use fixedbitset::FixedBitSet;
use pixelrun_model::{
    common::Cell,
    coverage::{check_coverage, fits},
    grid::Grid,
    pattern::Pattern,
    solution::{
        Solution,
        err::{
            ColorMismatchError, CoverageError, EmptyRunError, OverlapError,
            PatternOutOfBoundsError,
        },
    },
};
use rand::Rng;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(pub usize);

impl PatternId {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PatternId({})", self.0)
    }
}

impl From<usize> for PatternId {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

/// The mutable covering the search works on.
///
/// Patterns live in a slab addressed by [`PatternId`]; freed slots are
/// reused last-in first-out. `live` keeps the ids of all present patterns
/// in a deterministic order and `owner` maps every cell to the pattern
/// covering it. The set is only ever changed through [`PatternSet::apply`],
/// which validates the move first and leaves the set untouched on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    width: u32,
    height: u32,
    slots: Vec<Option<Pattern>>,
    free: Vec<PatternId>,
    live: Vec<PatternId>,
    live_pos: Vec<usize>,
    owner: Vec<Option<PatternId>>,
    singles: usize,
}

impl PatternSet {
    /// An empty set for a `width x height` grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            slots: Vec::new(),
            free: Vec::new(),
            live: Vec::new(),
            live_pos: Vec::new(),
            owner: vec![None; (width as usize) * (height as usize)],
            singles: 0,
        }
    }

    /// One pixel per foreground cell, in row-major order.
    pub fn trivial(grid: &Grid) -> Self {
        let mut set = Self::new(grid.width(), grid.height());
        set.slots.reserve(grid.foreground_count());
        for (cell, color) in grid.foreground() {
            set.insert(Pattern::pixel(cell, color));
        }
        set
    }

    /// Builds a set from arbitrary patterns.
    ///
    /// Patterns must be in bounds, color-faithful and pairwise disjoint, but
    /// need not cover the whole grid.
    pub fn from_patterns<I>(grid: &Grid, patterns: I) -> Result<Self, CoverageError>
    where
        I: IntoIterator<Item = Pattern>,
    {
        let mut set = Self::new(grid.width(), grid.height());
        for p in patterns {
            if p.is_empty() {
                return Err(EmptyRunError::new(p).into());
            }
            if !fits(&p, set.width, set.height) {
                return Err(PatternOutOfBoundsError::new(p).into());
            }
            for cell in p.cells() {
                let expected = grid.color(cell);
                if expected != Some(p.color()) {
                    return Err(ColorMismatchError::new(cell, expected, p.color()).into());
                }
                if set.owner[set.index(cell)].is_some() {
                    return Err(OverlapError::new(cell).into());
                }
            }
            set.insert(p);
        }
        Ok(set)
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
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of single-cell patterns.
    #[inline]
    pub fn singles(&self) -> usize {
        self.singles
    }

    #[inline]
    pub fn ids(&self) -> &[PatternId] {
        &self.live
    }

    #[inline]
    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.slots.get(id.get()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn contains_id(&self, id: PatternId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> + '_ {
        self.live
            .iter()
            .filter_map(move |&id| self.get(id).map(|p| (id, p)))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.iter().map(|(_, p)| p)
    }

    #[inline]
    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        (cell.y as usize) * (self.width as usize) + cell.x as usize
    }

    /// The pattern covering `cell`, if any.
    #[inline]
    pub fn owner(&self, cell: Cell) -> Option<PatternId> {
        if !self.contains_cell(cell) {
            return None;
        }
        self.owner[self.index(cell)]
    }

    #[inline]
    pub fn owner_pattern(&self, cell: Cell) -> Option<(PatternId, &Pattern)> {
        let id = self.owner(cell)?;
        self.get(id).map(|p| (id, p))
    }

    /// A uniformly drawn live pattern.
    #[inline]
    pub fn random_id<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PatternId> {
        if self.live.is_empty() {
            return None;
        }
        Some(self.live[rng.random_range(0..self.live.len())])
    }

    /// Current objective; O(1).
    #[inline]
    pub fn cost(&self, weights: &CostWeights) -> Cost {
        let runs = (self.live.len() - self.singles) as u64;
        Cost::new(
            self.live.len(),
            self.singles as u64 * weights.pixel_weight as u64 + runs * weights.run_weight as u64,
        )
    }

    /// Checks that `mv` swaps out exactly the cells it puts back, each with
    /// its own color. Touches only the cells of the move.
    pub fn validate_move(&self, mv: &Move, grid: &Grid) -> Result<(), MoveValidationError> {
        debug_assert_eq!((grid.width(), grid.height()), (self.width, self.height));
        if mv.is_noop() {
            return Ok(());
        }

        let mut removed: SmallVec<[PatternId; 8]> = mv.removed().iter().copied().collect();
        removed.sort_unstable();
        if let Some(w) = removed.windows(2).find(|w| w[0] == w[1]) {
            return Err(MoveValidationError::DuplicateRemoval(w[0]));
        }

        let mut removed_cells = 0usize;
        for &id in &removed {
            let p = self
                .get(id)
                .ok_or(MoveValidationError::UnknownPattern(id))?;
            removed_cells += p.len() as usize;
        }

        let mut touched: SmallVec<[usize; 16]> = SmallVec::new();
        for p in mv.added() {
            if p.is_empty() {
                return Err(MoveValidationError::EmptyRun(*p));
            }
            if !fits(p, self.width, self.height) {
                return Err(MoveValidationError::OutOfBounds(*p));
            }
            for cell in p.cells() {
                let expected = grid.color(cell);
                if expected != Some(p.color()) {
                    return Err(MoveValidationError::ColorMismatch {
                        cell,
                        expected,
                        found: p.color(),
                    });
                }
                let idx = self.index(cell);
                match self.owner[idx] {
                    Some(o) if removed.binary_search(&o).is_ok() => {}
                    _ => return Err(MoveValidationError::NotFreed(cell)),
                }
                touched.push(idx);
            }
        }

        touched.sort_unstable();
        if let Some(w) = touched.windows(2).find(|w| w[0] == w[1]) {
            let cell = Cell::new(
                (w[0] % self.width as usize) as u32,
                (w[0] / self.width as usize) as u32,
            );
            return Err(MoveValidationError::Overlap(cell));
        }

        if touched.len() != removed_cells {
            return Err(MoveValidationError::CellCountMismatch {
                removed: removed_cells,
                added: touched.len(),
            });
        }
        Ok(())
    }

    /// Validates and commits `mv`. On error nothing changes.
    pub fn apply(&mut self, mv: Move, grid: &Grid) -> Result<(), MoveValidationError> {
        self.validate_move(&mv, grid)?;
        if mv.is_noop() {
            return Ok(());
        }
        for &id in mv.removed() {
            self.remove(id);
        }
        for p in mv.into_added() {
            self.insert(p);
        }
        Ok(())
    }

    /// Full check of coverage, non-overlap and color fidelity; O(cells).
    pub fn check_coverage(&self, grid: &Grid) -> Result<(), CoverageError> {
        check_coverage(grid, (self.width, self.height), self.patterns(), None)
    }

    /// Like [`PatternSet::check_coverage`] but only `region` has to be
    /// covered, and nothing outside it may be.
    pub fn check_region(&self, grid: &Grid, region: &FixedBitSet) -> Result<(), CoverageError> {
        check_coverage(grid, (self.width, self.height), self.patterns(), Some(region))
    }

    #[inline]
    pub fn covers(&self, grid: &Grid) -> bool {
        self.check_coverage(grid).is_ok()
    }

    /// Linear indices of all covered cells.
    pub fn covered_cells(&self) -> FixedBitSet {
        let mut bits = FixedBitSet::with_capacity(self.owner.len());
        for (idx, o) in self.owner.iter().enumerate() {
            if o.is_some() {
                bits.insert(idx);
            }
        }
        bits
    }

    /// Patterns in live order.
    pub fn to_vec(&self) -> Vec<Pattern> {
        self.patterns().copied().collect()
    }

    pub fn to_solution(&self) -> Solution {
        Solution::new(self.width, self.height, self.patterns().copied())
    }

    fn insert(&mut self, p: Pattern) -> PatternId {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.get()] = Some(p);
                id
            }
            None => {
                self.slots.push(Some(p));
                self.live_pos.push(0);
                PatternId::new(self.slots.len() - 1)
            }
        };
        self.live_pos[id.get()] = self.live.len();
        self.live.push(id);
        for cell in p.cells() {
            let idx = self.index(cell);
            self.owner[idx] = Some(id);
        }
        if p.is_single() {
            self.singles += 1;
        }
        id
    }

    fn remove(&mut self, id: PatternId) -> Option<Pattern> {
        let p = self.slots.get_mut(id.get())?.take()?;
        for cell in p.cells() {
            let idx = self.index(cell);
            if self.owner[idx] == Some(id) {
                self.owner[idx] = None;
            }
        }
        let pos = self.live_pos[id.get()];
        self.live.swap_remove(pos);
        if let Some(&moved) = self.live.get(pos) {
            self.live_pos[moved.get()] = pos;
        }
        self.free.push(id);
        if p.is_single() {
            self.singles -= 1;
        }
        Some(p)
    }
}

impl std::fmt::Display for PatternSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PatternSet({}x{}, {} patterns, {} single-cell)",
            self.width,
            self.height,
            self.live.len(),
            self.singles
        )
    }
}
