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

use crate::state::pattern_set::PatternId;
use pixelrun_model::pattern::Pattern;
use smallvec::SmallVec;

/// The move family a [`Move`] was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveKind {
    Extend,
    Shrink,
    Merge,
    Split,
    Reorient,
    Relocate,
    Shatter,
    /// Replacement of a whole cluster by the result of a nested pass.
    Reoptimize,
    Noop,
}

impl MoveKind {
    pub const SEARCH: [MoveKind; 7] = [
        MoveKind::Extend,
        MoveKind::Shrink,
        MoveKind::Merge,
        MoveKind::Split,
        MoveKind::Reorient,
        MoveKind::Relocate,
        MoveKind::Shatter,
    ];

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            MoveKind::Extend => "extend",
            MoveKind::Shrink => "shrink",
            MoveKind::Merge => "merge",
            MoveKind::Split => "split",
            MoveKind::Reorient => "reorient",
            MoveKind::Relocate => "relocate",
            MoveKind::Shatter => "shatter",
            MoveKind::Reoptimize => "reoptimize",
            MoveKind::Noop => "noop",
        }
    }
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A local edit of a pattern set: drop `removed`, insert `added`.
///
/// A move is only meaningful when the cells of `added` are exactly the cells
/// of `removed`; [`crate::state::pattern_set::PatternSet::validate_move`]
/// checks this before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    kind: MoveKind,
    removed: SmallVec<[PatternId; 2]>,
    added: SmallVec<[Pattern; 2]>,
}

impl Move {
    #[inline]
    pub fn new<R, A>(kind: MoveKind, removed: R, added: A) -> Self
    where
        R: IntoIterator<Item = PatternId>,
        A: IntoIterator<Item = Pattern>,
    {
        Self {
            kind,
            removed: removed.into_iter().collect(),
            added: added.into_iter().collect(),
        }
    }

    #[inline]
    pub fn noop() -> Self {
        Self {
            kind: MoveKind::Noop,
            removed: SmallVec::new(),
            added: SmallVec::new(),
        }
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.kind == MoveKind::Noop || (self.removed.is_empty() && self.added.is_empty())
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub fn removed(&self) -> &[PatternId] {
        &self.removed
    }

    #[inline]
    pub fn added(&self) -> &[Pattern] {
        &self.added
    }

    #[inline]
    pub fn into_added(self) -> SmallVec<[Pattern; 2]> {
        self.added
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Move({}: remove [", self.kind)?;
        for (i, id) in self.removed.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "], add [")?;
        for (i, p) in self.added.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelrun_model::common::{Cell, ColorIndex};

    #[test]
    fn test_noop_is_empty() {
        let m = Move::noop();
        assert!(m.is_noop());
        assert!(m.removed().is_empty());
        assert!(m.added().is_empty());
        assert_eq!(m.kind(), MoveKind::Noop);
    }

    #[test]
    fn test_display_lists_both_sides() {
        let m = Move::new(
            MoveKind::Merge,
            [PatternId::new(0), PatternId::new(1)],
            [Pattern::horizontal(Cell::new(0, 0), 2, ColorIndex::new(0))],
        );
        let s = m.to_string();
        assert!(s.starts_with("Move(merge"));
        assert!(s.contains("PatternId(1)"));
        assert!(s.contains("HorizontalRun(0, 0, len 2, c0)"));
        assert!(!m.is_noop());
    }
}
