//! Grid module - manages the playfield
//!
//! The grid is 8 columns x 12 rows where each cell is empty or holds a symbol.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..7 (left to right) and y ranges
//! 0..11 (bottom to top). New pieces appear at y = 12, just above the grid.

use std::fmt;

use thiserror::Error;

use crate::types::{Cell, Coord, Piece, Symbol, Tile, EMPTY_CHAR, GRID_HEIGHT, GRID_WIDTH, PIECE_LEN};

/// Total number of cells on the grid
const GRID_SIZE: usize = (GRID_WIDTH as usize) * (GRID_HEIGHT as usize);

/// Flat numeric export of the grid, `[y][x]` with row 0 at the bottom
pub type U8Grid = [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize];

/// Errors from [`Grid::parse`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("grid picture has {rows} rows, at most {max} allowed", max = GRID_HEIGHT)]
    TooManyRows { rows: usize },
    #[error("row {row} is {width} cells wide, expected {expected}", expected = GRID_WIDTH)]
    RowWidth { row: usize, width: usize },
    #[error("row {row}, column {column}: unexpected character {found:?}")]
    BadSymbol { row: usize, column: usize, found: char },
}

/// The playfield - 8 columns x 12 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Flat array of cells, row-major order (y * WIDTH + x), row 0 first
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if !Coord::new(x, y).in_grid() {
            return None;
        }
        Some((y as usize) * (GRID_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> i8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> i8 {
        GRID_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Symbol at `coord`, or `None` when empty or outside the grid
    pub fn symbol_at(&self, coord: Coord) -> Option<Symbol> {
        self.get(coord.x, coord.y).flatten()
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Number of contiguous filled cells from the bottom of column `x`
    ///
    /// A full column reports `GRID_HEIGHT`. Off-grid columns also report
    /// `GRID_HEIGHT`, so they behave like walls.
    pub fn column_height(&self, x: i8) -> i8 {
        if x < 0 || x >= GRID_WIDTH {
            return GRID_HEIGHT;
        }
        (0..GRID_HEIGHT)
            .find(|&y| !self.is_occupied(x, y))
            .unwrap_or(GRID_HEIGHT)
    }

    /// Write a piece's symbols into its column
    ///
    /// Cells above the grid are skipped; all three tiles are returned
    /// regardless, bottom first.
    pub fn place_piece(&mut self, piece: &Piece) -> [Tile; PIECE_LEN] {
        let tiles = piece.tiles();
        for tile in &tiles {
            self.set(tile.coord.x, tile.coord.y, Some(tile.symbol));
        }
        tiles
    }

    /// True when no column has an empty cell below a filled one
    pub fn is_settled(&self) -> bool {
        (0..GRID_WIDTH).all(|x| {
            let height = self.column_height(x);
            (height..GRID_HEIGHT).all(|y| !self.is_occupied(x, y))
        })
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Export as numeric codes (0 = empty, 1..=3 = A..C)
    pub fn write_u8_grid(&self, out: &mut U8Grid) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, code) in row.iter_mut().enumerate() {
                *code = self.cells[y * GRID_WIDTH as usize + x].map_or(0, |s| s.code());
            }
        }
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a grid from a top-down picture
    ///
    /// The last string is row 0. Pictures with fewer than `GRID_HEIGHT`
    /// rows leave the rows above them empty. `-` and `.` are empty cells.
    ///
    /// ```
    /// use columns_core::Grid;
    /// use columns_core::types::Symbol;
    ///
    /// let grid = Grid::parse(&[
    ///     "B-------",
    ///     "AA------",
    /// ]).unwrap();
    /// assert_eq!(grid.get(1, 0), Some(Some(Symbol::A)));
    /// assert_eq!(grid.get(0, 1), Some(Some(Symbol::B)));
    /// assert_eq!(grid.column_height(0), 2);
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Self, GridParseError> {
        if rows.len() > GRID_HEIGHT as usize {
            return Err(GridParseError::TooManyRows { rows: rows.len() });
        }

        let mut grid = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != GRID_WIDTH as usize {
                return Err(GridParseError::RowWidth { row, width });
            }
            let y = (rows.len() - 1 - row) as i8;
            for (column, c) in line.chars().enumerate() {
                let cell = match c {
                    EMPTY_CHAR | '.' => None,
                    other => Some(Symbol::from_char(other).ok_or(GridParseError::BadSymbol {
                        row,
                        column,
                        found: other,
                    })?),
                };
                grid.set(column as i8, y, cell);
            }
        }
        Ok(grid)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..GRID_HEIGHT).rev() {
            for x in 0..GRID_WIDTH {
                let c = self
                    .get(x, y)
                    .flatten()
                    .map_or(EMPTY_CHAR, |symbol| symbol.as_char());
                write!(f, "{c}")?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(Grid::index(0, 0), Some(0));
        assert_eq!(Grid::index(7, 0), Some(7));
        assert_eq!(Grid::index(0, 1), Some(8));
        assert_eq!(Grid::index(7, 11), Some(95));
        assert_eq!(Grid::index(-1, 0), None);
        assert_eq!(Grid::index(8, 0), None);
        assert_eq!(Grid::index(0, 12), None);
    }

    #[test]
    fn test_column_height_stops_at_first_gap() {
        let mut grid = Grid::new();
        grid.set(2, 0, Some(Symbol::A));
        grid.set(2, 1, Some(Symbol::B));
        grid.set(2, 3, Some(Symbol::C));
        assert_eq!(grid.column_height(2), 2);
        assert_eq!(grid.column_height(3), 0);
    }

    #[test]
    fn test_column_height_full_and_walls() {
        let mut grid = Grid::new();
        for y in 0..GRID_HEIGHT {
            grid.set(5, y, Some(Symbol::ALL[(y % 3) as usize]));
        }
        assert_eq!(grid.column_height(5), GRID_HEIGHT);
        assert_eq!(grid.column_height(-1), GRID_HEIGHT);
        assert_eq!(grid.column_height(GRID_WIDTH), GRID_HEIGHT);
    }

    #[test]
    fn test_place_piece_skips_cells_above_grid() {
        let mut grid = Grid::new();
        let piece = Piece::new(Coord::new(4, 11), [Symbol::A, Symbol::B, Symbol::C]);
        let tiles = grid.place_piece(&piece);

        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[2].coord, Coord::new(4, 13));
        assert_eq!(grid.get(4, 11), Some(Some(Symbol::A)));
        assert_eq!(grid.filled_count(), 1);
    }

    #[test]
    fn test_is_settled_detects_floating_tile() {
        let mut grid = Grid::new();
        grid.set(0, 0, Some(Symbol::A));
        assert!(grid.is_settled());
        grid.set(1, 2, Some(Symbol::B));
        assert!(!grid.is_settled());
    }

    #[test]
    fn test_parse_and_display_agree() {
        let picture = ["--C-----", "-BA-----", "AAB----C"];
        let grid = Grid::parse(&picture).unwrap();
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), GRID_HEIGHT as usize);
        assert_eq!(&lines[9..], &picture);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Grid::parse(&["AAA"]),
            Err(GridParseError::RowWidth { row: 0, width: 3 })
        );
        assert_eq!(
            Grid::parse(&["---X----"]),
            Err(GridParseError::BadSymbol {
                row: 0,
                column: 3,
                found: 'X'
            })
        );
        let tall = ["--------"; 13];
        assert_eq!(
            Grid::parse(&tall),
            Err(GridParseError::TooManyRows { rows: 13 })
        );
    }

    #[test]
    fn test_write_u8_grid() {
        let grid = Grid::parse(&["-------C", "AB------"]).unwrap();
        let mut out = [[0u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        grid.write_u8_grid(&mut out);
        assert_eq!(out[0][0], 1);
        assert_eq!(out[0][1], 2);
        assert_eq!(out[1][7], 3);
        assert_eq!(out[11][0], 0);
    }
}
