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

use crate::{pattern::Pattern, solution::Solution};
use std::io::{self, Write};

/// Writes a solution as plain text.
///
/// The palette section lists `index,color` lines and is followed by a blank
/// line. Each pattern then becomes `x,y,color,type,size` where `type` is
/// `0` for pixels, `1` for horizontal and `2` for vertical runs. Patterns are
/// written in `(y, x, color)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEncoder {
    include_palette: bool,
}

impl Default for PatternEncoder {
    fn default() -> Self {
        Self {
            include_palette: true,
        }
    }
}

impl PatternEncoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn include_palette(mut self, yes: bool) -> Self {
        self.include_palette = yes;
        self
    }

    pub fn encode<W: Write>(
        &self,
        palette: &[String],
        solution: &Solution,
        mut out: W,
    ) -> io::Result<()> {
        if self.include_palette {
            for (i, color) in palette.iter().enumerate() {
                writeln!(out, "{i},{color}")?;
            }
            writeln!(out)?;
        }
        for p in solution.patterns() {
            writeln!(out, "{}", encode_line(p))?;
        }
        out.flush()
    }

    pub fn encode_to_string(&self, palette: &[String], solution: &Solution) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec<u8> cannot fail.
        let _ = self.encode(palette, solution, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[inline]
fn encode_line(p: &Pattern) -> String {
    let o = p.origin();
    format!(
        "{},{},{},{},{}",
        o.x,
        o.y,
        p.color(),
        p.kind().code(),
        p.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Cell, ColorIndex};

    #[test]
    fn test_encodes_palette_then_patterns() {
        let a = ColorIndex::new(0);
        let b = ColorIndex::new(1);
        let s = Solution::new(
            3,
            2,
            [
                Pattern::pixel(Cell::new(0, 1), a),
                Pattern::vertical(Cell::new(2, 0), 2, b),
                Pattern::horizontal(Cell::new(0, 0), 2, a),
            ],
        );
        let palette = vec!["#000000".to_string(), "#ffffff".to_string()];
        let text = PatternEncoder::new().encode_to_string(&palette, &s);
        assert_eq!(
            text,
            "0,#000000\n1,#ffffff\n\n0,0,0,1,2\n2,0,1,2,2\n0,1,0,0,1\n"
        );
    }

    #[test]
    fn test_palette_can_be_omitted() {
        let s = Solution::new(1, 1, [Pattern::horizontal(Cell::new(0, 0), 1, ColorIndex::new(3))]);
        let text = PatternEncoder::new()
            .include_palette(false)
            .encode_to_string(&[], &s);
        assert_eq!(text, "0,0,3,0,1\n");
    }
}
