//! # Grid
//!
//! A rectangular matrix of Life cells stored row-major with a top-left origin.
//! This is the host-side representation of a simulation state: patterns are
//! built and pasted here, then pushed to the GPU (and read back) by the
//! simulation facade.

use std::fmt;

use crate::error::{LifeError, LifeResult};

/// Horizontal placement for [`Grid::paste_aligned`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Centre,
    Right,
}

/// Vertical placement for [`Grid::paste_aligned`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// 2D boolean cell matrix
///
/// `cells.len() == width * height` holds for every grid that can be observed;
/// all operations that would break it return an error instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// All-dead grid of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Caller guarantees `cells.len() == width * height`
    pub(super) fn from_cells_unchecked(width: usize, height: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells in row-major order, origin top-left
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Number of live cells
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Index of `(x, y)` in the cell vector
    ///
    /// # Errors
    /// [`LifeError::CellOutOfBounds`] if either coordinate is negative or past
    /// the edge.
    pub fn cell_index(&self, x: i64, y: i64) -> LifeResult<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(LifeError::CellOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(y as usize * self.width + x as usize)
    }

    pub fn get_cell(&self, x: i64, y: i64) -> LifeResult<bool> {
        let index = self.cell_index(x, y)?;
        Ok(self.cells[index])
    }

    pub fn set_cell(&mut self, x: i64, y: i64, state: bool) -> LifeResult<()> {
        let index = self.cell_index(x, y)?;
        self.cells[index] = state;
        Ok(())
    }

    /// Replace the whole grid with `cells` of size `width` x `height`
    pub fn set_using_bool_array(
        &mut self,
        cells: Vec<bool>,
        width: usize,
        height: usize,
    ) -> LifeResult<()> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(LifeError::GridSizeMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }

        self.cells = cells;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Replace the whole grid from a text grid
    ///
    /// Rows may be separated by CRLF, CR or LF. The first row defines the
    /// width and every other row must match it. A single trailing line
    /// terminator is accepted. The grid is left untouched on error.
    pub fn set_using_text_grid(
        &mut self,
        text: &str,
        live_char: char,
        dead_char: char,
    ) -> LifeResult<()> {
        if live_char == dead_char {
            return Err(LifeError::AmbiguousTextChars(live_char));
        }

        let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
        let body = normalised.strip_suffix('\n').unwrap_or(&normalised);
        if body.is_empty() {
            return Err(LifeError::EmptyTextGrid);
        }

        let rows: Vec<&str> = body.split('\n').collect();
        let width = rows[0].chars().count();
        let mut cells = Vec::with_capacity(width * rows.len());

        for (y, row) in rows.iter().enumerate() {
            let row_len = row.chars().count();
            if row_len != width {
                return Err(LifeError::InconsistentRowLength {
                    row: y + 1,
                    expected: width,
                    actual: row_len,
                });
            }

            for (x, ch) in row.chars().enumerate() {
                if ch == live_char {
                    cells.push(true);
                } else if ch == dead_char {
                    cells.push(false);
                } else {
                    return Err(LifeError::InvalidTextCharacter {
                        row: y + 1,
                        column: x + 1,
                        found: ch,
                    });
                }
            }
        }

        let height = rows.len();
        self.set_using_bool_array(cells, width, height)
    }

    /// Copy `other` into this grid with its top-left corner at `(x, y)`
    ///
    /// # Errors
    /// [`LifeError::PasteOutOfBounds`] unless the whole of `other` fits.
    pub fn paste(&mut self, other: &Grid, x: i64, y: i64) -> LifeResult<()> {
        let fits = x >= 0
            && y >= 0
            && x as usize + other.width <= self.width
            && y as usize + other.height <= self.height;

        if !fits {
            return Err(LifeError::PasteOutOfBounds {
                x,
                y,
                paste_width: other.width,
                paste_height: other.height,
                width: self.width,
                height: self.height,
            });
        }

        let (x, y) = (x as usize, y as usize);
        for row in 0..other.height {
            let src = &other.cells[row * other.width..(row + 1) * other.width];
            let start = (y + row) * self.width + x;
            self.cells[start..start + other.width].copy_from_slice(src);
        }

        Ok(())
    }

    /// Paste `other` at a symbolic position
    pub fn paste_aligned(
        &mut self,
        other: &Grid,
        horizontal: HorizontalAlign,
        vertical: VerticalAlign,
    ) -> LifeResult<()> {
        let spare_x = self.width as i64 - other.width as i64;
        let spare_y = self.height as i64 - other.height as i64;

        let x = match horizontal {
            HorizontalAlign::Left => 0,
            HorizontalAlign::Centre => spare_x.div_euclid(2),
            HorizontalAlign::Right => spare_x,
        };
        let y = match vertical {
            VerticalAlign::Top => 0,
            VerticalAlign::Middle => spare_y.div_euclid(2),
            VerticalAlign::Bottom => spare_y,
        };

        self.paste(other, x, y)
    }

    /// New grid with the row order reversed
    ///
    /// Texture rows run bottom-up while grid rows run top-down; every state
    /// upload and readback goes through this exactly once.
    pub fn vertically_flipped(&self) -> Grid {
        let cells = self
            .cells
            .chunks(self.width.max(1))
            .rev()
            .flatten()
            .copied()
            .collect();

        Grid {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Text representation, one row per line, each row terminated by `\n`
    pub fn get_as_text_grid(&self, live_char: char, dead_char: char) -> String {
        let mut output = String::with_capacity((self.width + 1) * self.height);

        // Zero-width grids still produce one (empty) line per row
        for y in 0..self.height {
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            output.extend(row.iter().map(|&alive| if alive { live_char } else { dead_char }));
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_as_text_grid('#', '.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridFactory;

    const GLIDER: &str = ".#.\n..#\n###\n";

    #[test]
    fn bounds_fail_at_every_edge() {
        let mut grid = GridFactory::create_empty(4, 3);

        for (x, y) in [(-1, 0), (4, 0), (0, -1), (0, 3)] {
            assert!(matches!(
                grid.get_cell(x, y),
                Err(LifeError::CellOutOfBounds { .. })
            ));
            assert!(grid.set_cell(x, y, true).is_err());
        }

        assert!(grid.set_cell(3, 2, true).is_ok());
        assert!(grid.get_cell(3, 2).unwrap());
    }

    #[test]
    fn bool_array_must_match_dimensions() {
        let mut grid = Grid::default();
        let err = grid
            .set_using_bool_array(vec![false; 5], 2, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            LifeError::GridSizeMismatch {
                expected: 6,
                actual: 5,
                ..
            }
        ));
        assert_eq!(grid.cells().len(), 0);
    }

    #[test]
    fn text_grid_accepts_any_newline_convention() {
        let lf = GridFactory::create_using_text_grid("#.\n.#", '#', '.').unwrap();
        let crlf = GridFactory::create_using_text_grid("#.\r\n.#\r\n", '#', '.').unwrap();
        let cr = GridFactory::create_using_text_grid("#.\r.#", '#', '.').unwrap();

        assert_eq!(lf, crlf);
        assert_eq!(lf, cr);
        assert_eq!((lf.width(), lf.height()), (2, 2));
        assert!(lf.get_cell(0, 0).unwrap());
        assert!(!lf.get_cell(1, 0).unwrap());
    }

    #[test]
    fn text_grid_reports_bad_character_position() {
        let err = GridFactory::create_using_text_grid("..\n.x", '#', '.').unwrap_err();
        assert!(matches!(
            err,
            LifeError::InvalidTextCharacter {
                row: 2,
                column: 2,
                found: 'x'
            }
        ));
    }

    #[test]
    fn text_grid_reports_ragged_rows() {
        let err = GridFactory::create_using_text_grid("...\n..\n...", '#', '.').unwrap_err();
        assert!(matches!(
            err,
            LifeError::InconsistentRowLength {
                row: 2,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn text_round_trip() {
        let glider = GridFactory::create_using_text_grid(GLIDER, '#', '.').unwrap();
        let grids = [
            GridFactory::create_empty(5, 4),
            GridFactory::create_empty(0, 2),
            GridFactory::create_using_bool_array(vec![true; 12], 3, 4).unwrap(),
            glider,
        ];

        for grid in grids {
            let text = grid.get_as_text_grid('#', '.');
            let parsed = GridFactory::create_using_text_grid(&text, '#', '.').unwrap();
            assert_eq!(parsed, grid);
        }
    }

    #[test]
    fn text_output_has_trailing_newline_per_row() {
        let glider = GridFactory::create_using_text_grid(GLIDER, '#', '.').unwrap();
        assert_eq!(glider.get_as_text_grid('#', '.'), GLIDER);
        assert_eq!(glider.get_as_text_grid('O', ' '), " O \n  O\nOOO\n");
        assert_eq!(glider.live_count(), 5);
    }

    #[test]
    fn paste_copies_region() {
        let glider = GridFactory::create_using_text_grid(GLIDER, '#', '.').unwrap();
        let mut target = GridFactory::create_empty(6, 5);
        target.paste(&glider, 2, 1).unwrap();

        assert!(target.get_cell(3, 1).unwrap());
        assert!(target.get_cell(4, 2).unwrap());
        assert!(target.get_cell(2, 3).unwrap());
        assert!(!target.get_cell(2, 1).unwrap());
        assert_eq!(target.live_count(), 5);
    }

    #[test]
    fn paste_overflow_fails_on_either_axis() {
        let block = GridFactory::create_using_bool_array(vec![true; 6], 3, 2).unwrap();
        let mut target = GridFactory::create_empty(5, 4);

        for (x, y) in [(3, 0), (0, 3), (3, 3), (-1, 0), (0, -1), (5, 0), (0, 4)] {
            assert!(
                matches!(
                    target.paste(&block, x, y),
                    Err(LifeError::PasteOutOfBounds { .. })
                ),
                "offset ({x}, {y}) should overflow"
            );
        }
        assert_eq!(target.live_count(), 0);

        assert!(target.paste(&block, 2, 2).is_ok());
        let too_big = GridFactory::create_empty(6, 1);
        assert!(target.paste(&too_big, 0, 0).is_err());
    }

    #[test]
    fn paste_aligned_positions() {
        let dot = GridFactory::create_using_text_grid("#", '#', '.').unwrap();
        let cases = [
            (HorizontalAlign::Left, VerticalAlign::Top, (0, 0)),
            (HorizontalAlign::Centre, VerticalAlign::Middle, (2, 1)),
            (HorizontalAlign::Right, VerticalAlign::Bottom, (4, 3)),
        ];

        for (h, v, (x, y)) in cases {
            let mut target = GridFactory::create_empty(5, 4);
            target.paste_aligned(&dot, h, v).unwrap();
            assert!(target.get_cell(x, y).unwrap(), "{h:?}/{v:?}");
        }

        let mut small = GridFactory::create_empty(2, 2);
        let big = GridFactory::create_empty(3, 1);
        assert!(small
            .paste_aligned(&big, HorizontalAlign::Centre, VerticalAlign::Top)
            .is_err());
    }

    #[test]
    fn vertical_flip_reverses_rows() {
        let grid = GridFactory::create_using_text_grid("#..\n.#.\n..#\n...", '#', '.').unwrap();
        let flipped = grid.vertically_flipped();

        assert_eq!(flipped.get_as_text_grid('#', '.'), "...\n..#\n.#.\n#..\n");
        assert_eq!(flipped.vertically_flipped(), grid);
    }
}
