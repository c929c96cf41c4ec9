//! Match finder - detects runs of three or more identical symbols
//!
//! Four directional scanners walk every strip of the grid that can hold a
//! run of [`MIN_RUN`] cells:
//!
//! | Direction | Step | Strip starts |
//! |-----------|------|--------------|
//! | Vertical | (0, +1) | bottom of every column |
//! | Horizontal | (+1, 0) | left end of every row |
//! | Diagonal right | (+1, +1) | bottom row `x <= W-3`, then left column `1 <= y <= H-3` |
//! | Diagonal left | (-1, +1) | bottom row `x >= 2`, then right column `1 <= y <= H-3` |
//!
//! The bottom corner cell belongs to the bottom-row loop only, so each strip
//! is walked exactly once. The scanners only read the grid; with the `rayon`
//! feature they run as a four-way fork/join.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Coord, Symbol, GRID_HEIGHT, GRID_WIDTH, MIN_RUN};

/// Longest possible strip (the taller grid dimension)
const MAX_STRIP: usize = if GRID_WIDTH > GRID_HEIGHT {
    GRID_WIDTH as usize
} else {
    GRID_HEIGHT as usize
};

/// Cells taking part in at least one run, ordered by (x, y)
pub type MatchSet = BTreeSet<Coord>;

/// The four scan directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Vertical,
    Horizontal,
    DiagonalRight,
    DiagonalLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Vertical,
        Direction::Horizontal,
        Direction::DiagonalRight,
        Direction::DiagonalLeft,
    ];

    /// Step vector (dx, dy)
    pub fn step(&self) -> (i8, i8) {
        match self {
            Direction::Vertical => (0, 1),
            Direction::Horizontal => (1, 0),
            Direction::DiagonalRight => (1, 1),
            Direction::DiagonalLeft => (-1, 1),
        }
    }

    /// First cell of every strip scanned in this direction
    pub fn strip_starts(&self) -> Vec<Coord> {
        let last_start_row = GRID_HEIGHT - MIN_RUN as i8;
        match self {
            Direction::Vertical => (0..GRID_WIDTH).map(|x| Coord::new(x, 0)).collect(),
            Direction::Horizontal => (0..GRID_HEIGHT).map(|y| Coord::new(0, y)).collect(),
            Direction::DiagonalRight => (0..=GRID_WIDTH - MIN_RUN as i8)
                .map(|x| Coord::new(x, 0))
                .chain((1..=last_start_row).map(|y| Coord::new(0, y)))
                .collect(),
            Direction::DiagonalLeft => (MIN_RUN as i8 - 1..GRID_WIDTH)
                .map(|x| Coord::new(x, 0))
                .chain((1..=last_start_row).map(|y| Coord::new(GRID_WIDTH - 1, y)))
                .collect(),
        }
    }
}

/// A maximal run of one symbol along one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub direction: Direction,
    pub symbol: Symbol,
    pub cells: Vec<Coord>,
}

impl Run {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Accumulates the current run while walking one strip
struct RunTracker<'a> {
    direction: Direction,
    symbol: Option<Symbol>,
    cells: ArrayVec<Coord, MAX_STRIP>,
    out: &'a mut Vec<Run>,
}

impl<'a> RunTracker<'a> {
    fn new(direction: Direction, out: &'a mut Vec<Run>) -> Self {
        Self {
            direction,
            symbol: None,
            cells: ArrayVec::new(),
            out,
        }
    }

    fn visit(&mut self, coord: Coord, cell: Option<Symbol>) {
        if cell != self.symbol {
            self.flush();
        }
        if let Some(symbol) = cell {
            self.symbol = Some(symbol);
            self.cells.push(coord);
        }
    }

    /// End the current run, keeping it if it is long enough
    fn flush(&mut self) {
        if let Some(symbol) = self.symbol.take() {
            if self.cells.len() >= MIN_RUN {
                self.out.push(Run {
                    direction: self.direction,
                    symbol,
                    cells: self.cells.to_vec(),
                });
            }
        }
        self.cells.clear();
    }
}

/// Walk one strip from `start` until the grid edge
fn scan_strip(grid: &Grid, direction: Direction, start: Coord, out: &mut Vec<Run>) {
    let (dx, dy) = direction.step();
    let mut tracker = RunTracker::new(direction, out);
    let mut coord = start;
    while let Some(cell) = grid.get(coord.x, coord.y) {
        tracker.visit(coord, cell);
        coord = coord.offset(dx, dy);
    }
    tracker.flush();
}

/// All runs of length >= 3 in one direction
pub fn scan(grid: &Grid, direction: Direction) -> Vec<Run> {
    let mut runs = Vec::new();
    for start in direction.strip_starts() {
        scan_strip(grid, direction, start, &mut runs);
    }
    runs
}

/// All runs in all four directions
#[cfg(feature = "rayon")]
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let ((mut vertical, horizontal), (right, left)) = rayon::join(
        || {
            rayon::join(
                || scan(grid, Direction::Vertical),
                || scan(grid, Direction::Horizontal),
            )
        },
        || {
            rayon::join(
                || scan(grid, Direction::DiagonalRight),
                || scan(grid, Direction::DiagonalLeft),
            )
        },
    );
    vertical.extend(horizontal);
    vertical.extend(right);
    vertical.extend(left);
    vertical
}

/// All runs in all four directions
#[cfg(not(feature = "rayon"))]
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    Direction::ALL
        .iter()
        .flat_map(|&direction| scan(grid, direction))
        .collect()
}

/// Every cell that belongs to a run, deduplicated across directions
pub fn find_matches(grid: &Grid) -> MatchSet {
    find_runs(grid)
        .into_iter()
        .flat_map(|run| run.cells)
        .collect()
}
