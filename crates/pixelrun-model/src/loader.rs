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
    common::ColorIndex,
    grid::{Grid, err::GridError},
};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    num::ParseIntError,
    path::Path,
};

/// A grid together with the palette its indices refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGrid {
    grid: Grid,
    palette: Vec<String>,
}

impl LoadedGrid {
    pub fn new(grid: Grid, palette: Vec<String>) -> Self {
        Self { grid, palette }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn into_parts(self) -> (Grid, Vec<String>) {
        (self.grid, self.palette)
    }
}

#[derive(Debug)]
pub enum GridLoaderError {
    Io(std::io::Error),
    ParseInt(ParseIntError),
    UnexpectedEof,
    PaletteTooLarge(usize),
    InvalidCell { index: usize, token: String },
    Grid(GridError),
}

impl From<std::io::Error> for GridLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseIntError> for GridLoaderError {
    fn from(e: ParseIntError) -> Self {
        Self::ParseInt(e)
    }
}

impl From<GridError> for GridLoaderError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl std::fmt::Display for GridLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use GridLoaderError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            ParseInt(e) => write!(f, "parse-int error: {e}"),
            UnexpectedEof => write!(f, "unexpected end of file while parsing grid"),
            PaletteTooLarge(n) => write!(f, "palette of {n} colors exceeds the index range"),
            InvalidCell { index, token } => {
                write!(f, "cell {index}: expected a color index or '.', found '{token}'")
            }
            Grid(e) => write!(f, "grid error: {e}"),
        }
    }
}

impl std::error::Error for GridLoaderError {}

/// Reads the whitespace-separated grid format:
///
/// ```text
/// width height palette_len
/// <palette_len color tokens>
/// <width * height cells: a palette index or '.' for background>
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLoader {
    background: char,
}

impl Default for GridLoader {
    fn default() -> Self {
        Self { background: '.' }
    }
}

impl GridLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that marks a background cell.
    #[inline]
    pub fn background(mut self, c: char) -> Self {
        self.background = c;
        self
    }

    pub fn from_bufread<R: BufRead>(&self, mut br: R) -> Result<LoadedGrid, GridLoaderError> {
        let mut sc = Scanner::new(&mut br);
        let width = sc.next_parsed::<u32>()?;
        let height = sc.next_parsed::<u32>()?;
        let palette_len = sc.next_parsed::<usize>()?;
        if palette_len > u16::MAX as usize + 1 {
            return Err(GridLoaderError::PaletteTooLarge(palette_len));
        }

        let mut palette = Vec::with_capacity(palette_len);
        for _ in 0..palette_len {
            palette.push(sc.next_token()?.to_owned());
        }

        let n = (width as usize) * (height as usize);
        let mut cells = Vec::with_capacity(n);
        for index in 0..n {
            let tok = sc.next_token()?;
            if tok.len() == self.background.len_utf8() && tok.starts_with(self.background) {
                cells.push(None);
                continue;
            }
            let value = tok
                .parse::<u16>()
                .map_err(|_| GridLoaderError::InvalidCell {
                    index,
                    token: tok.to_owned(),
                })?;
            cells.push(Some(ColorIndex::new(value)));
        }

        let grid = Grid::new(width, height, cells, palette_len)?;
        Ok(LoadedGrid::new(grid, palette))
    }

    #[inline]
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<LoadedGrid, GridLoaderError> {
        let file = File::open(path).map_err(GridLoaderError::Io)?;
        self.from_bufread(BufReader::new(file))
    }

    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<LoadedGrid, GridLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    #[inline]
    pub fn from_str(&self, s: &str) -> Result<LoadedGrid, GridLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

#[derive(Debug)]
struct Scanner<R: BufRead> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    #[inline]
    fn fill_line(&mut self) -> Result<(), GridLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self
            .rdr
            .read_line(&mut self.buf)
            .map_err(GridLoaderError::Io)?;
        if n == 0 {
            return Err(GridLoaderError::UnexpectedEof);
        }
        Ok(())
    }

    #[inline]
    fn skip_ws(&mut self) -> Result<(), GridLoaderError> {
        loop {
            if self.pos >= self.buf.len() {
                self.fill_line()?;
                continue;
            }
            while self.pos < self.buf.len() && self.buf.as_bytes()[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.buf.len() {
                continue;
            }
            return Ok(());
        }
    }

    #[inline]
    fn next_token(&mut self) -> Result<&str, GridLoaderError> {
        self.skip_ws()?;
        let start = self.pos;
        while self.pos < self.buf.len() && !self.buf.as_bytes()[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok(&self.buf[start..self.pos])
    }

    #[inline]
    fn next_parsed<T>(&mut self) -> Result<T, GridLoaderError>
    where
        T: std::str::FromStr<Err = ParseIntError>,
    {
        Ok(self.next_token()?.parse::<T>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Cell;

    const SMALL: &str = r#"
        3 2 2
        #ff0000 #00ff00
        0 0 1
        . 0 1
    "#;

    #[test]
    fn test_loads_palette_and_cells() {
        let loaded = GridLoader::new().from_str(SMALL).unwrap();
        assert_eq!(loaded.palette(), &["#ff0000".to_string(), "#00ff00".to_string()]);
        let g = loaded.grid();
        assert_eq!((g.width(), g.height()), (3, 2));
        assert_eq!(g.foreground_count(), 5);
        assert_eq!(g.color(Cell::new(0, 1)), None);
        assert_eq!(g.color(Cell::new(2, 1)), Some(ColorIndex::new(1)));
    }

    #[test]
    fn test_custom_background_token() {
        let src = "2 1 1\nink\n_ 0\n";
        let loaded = GridLoader::new().background('_').from_str(src).unwrap();
        assert_eq!(loaded.grid().foreground_count(), 1);
    }

    #[test]
    fn test_truncated_input_is_eof() {
        let err = GridLoader::new().from_str("2 2 1\nink\n0 0 0").unwrap_err();
        assert!(matches!(err, GridLoaderError::UnexpectedEof));
    }

    #[test]
    fn test_bad_header_is_parse_error() {
        let err = GridLoader::new().from_str("two 2 1").unwrap_err();
        assert!(matches!(err, GridLoaderError::ParseInt(_)));
    }

    #[test]
    fn test_bad_cell_token_is_reported() {
        let err = GridLoader::new().from_str("1 1 1\nink\nx\n").unwrap_err();
        match err {
            GridLoaderError::InvalidCell { index, token } => {
                assert_eq!(index, 0);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_color_outside_palette_is_grid_error() {
        let err = GridLoader::new().from_str("1 1 1\nink\n4\n").unwrap_err();
        assert!(matches!(err, GridLoaderError::Grid(GridError::ColorOutOfRange(_))));
    }

    #[test]
    fn test_reads_from_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("pixelrun-loader-{}.txt", std::process::id()));
        std::fs::write(&path, SMALL).unwrap();
        let loaded = GridLoader::new().from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap().grid().width(), 3);
    }
}
