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

pub mod extend;
pub mod merge;
pub mod relocate;
pub mod reorient;
pub mod shatter;
pub mod shrink;
pub mod split;

use crate::{search::operator::MoveOperator, state::moves::MoveKind};

/// The built-in operator for a search move family.
pub fn operator_for(kind: MoveKind) -> Option<Box<dyn MoveOperator>> {
    Some(match kind {
        MoveKind::Extend => Box::new(extend::ExtendOperator::default()),
        MoveKind::Shrink => Box::new(shrink::ShrinkOperator::default()),
        MoveKind::Merge => Box::new(merge::MergeOperator::default()),
        MoveKind::Split => Box::new(split::SplitOperator::default()),
        MoveKind::Reorient => Box::new(reorient::ReorientOperator::default()),
        MoveKind::Relocate => Box::new(relocate::RelocateOperator::default()),
        MoveKind::Shatter => Box::new(shatter::ShatterOperator::default()),
        MoveKind::Reoptimize | MoveKind::Noop => return None,
    })
}
