//! Settle loop - clear matches and collapse until the grid is stable
//!
//! One pass finds every match, clears it, scores it, and collapses the
//! grid. Passes repeat until a pass finds nothing. Every non-empty pass
//! removes at least three tiles, so the loop always terminates.

use tracing::{debug, instrument};

use crate::gravity::{collapse, ShiftBatch};
use crate::grid::Grid;
use crate::matcher::find_matches;
use crate::scoring::clear_score;
use crate::types::Tile;

/// The outcome of one non-empty settle pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlePass {
    /// Cleared tiles, ordered by (x, y)
    pub removed: Vec<Tile>,
    pub score: u32,
    pub shifts: Vec<ShiftBatch>,
}

/// Run one pass; `None` means the grid was already stable
pub fn settle_pass(grid: &mut Grid) -> Option<SettlePass> {
    let matches = find_matches(grid);
    if matches.is_empty() {
        return None;
    }

    let removed: Vec<Tile> = matches
        .iter()
        .filter_map(|&coord| {
            let symbol = grid.symbol_at(coord)?;
            grid.set(coord.x, coord.y, None);
            Some(Tile::new(coord, symbol))
        })
        .collect();

    let score = clear_score(removed.len());
    let shifts = collapse(grid);
    debug!(
        cleared = removed.len(),
        score,
        batches = shifts.len(),
        "settle pass"
    );

    Some(SettlePass {
        removed,
        score,
        shifts,
    })
}

/// Run passes until the grid is stable
#[instrument(level = "debug", skip_all)]
pub fn settle(grid: &mut Grid) -> Vec<SettlePass> {
    std::iter::from_fn(|| settle_pass(grid)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Symbol};

    #[test]
    fn test_stable_grid_yields_no_pass() {
        let mut grid = Grid::parse(&["A-------", "B-------", "A-------"]).unwrap();
        assert!(settle_pass(&mut grid).is_none());
    }

    #[test]
    fn test_single_pass_clears_and_collapses() {
        let mut grid = Grid::parse(&["C-------", "B-------", "AAA-----"]).unwrap();
        let pass = settle_pass(&mut grid).unwrap();

        assert_eq!(pass.removed.len(), 3);
        assert_eq!(pass.score, 3);
        assert_eq!(pass.shifts.len(), 1);
        assert_eq!(pass.shifts[0].distance, 1);
        assert_eq!(grid.get(0, 0), Some(Some(Symbol::B)));
        assert_eq!(grid.get(0, 1), Some(Some(Symbol::C)));
        assert!(settle_pass(&mut grid).is_none());
    }

    #[test]
    fn test_overlapping_runs_score_once_per_tile() {
        // An L of five A tiles: vertical and horizontal share the corner
        let mut grid = Grid::parse(&["A-------", "A-------", "AAA-----"]).unwrap();
        let pass = settle_pass(&mut grid).unwrap();
        assert_eq!(pass.removed.len(), 5);
        assert_eq!(pass.score, 9);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_cascade_of_three_passes() {
        let mut grid = Grid::parse(&[
            "--B-----", "--B-----", "--A-----", "--B-----", "--C-----", "AAC-----", "CBC-----",
        ])
        .unwrap();
        let passes = settle(&mut grid);

        assert_eq!(passes.len(), 3);
        assert!(passes.iter().all(|pass| pass.score == 3));
        assert_eq!(
            passes[1].removed.iter().map(|t| t.coord).collect::<Vec<_>>(),
            vec![Coord::new(0, 1), Coord::new(1, 1), Coord::new(2, 1)]
        );
        assert_eq!(grid.filled_count(), 2);
        assert!(grid.is_settled());
    }
}
