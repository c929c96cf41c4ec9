//! Gravity collapser - slides tiles down into emptied cells
//!
//! Each column is compacted independently, bottom to top. Moved tiles are
//! reported in batches: one batch per contiguous block that falls the same
//! distance, so observers can animate a block as a unit.

use crate::grid::Grid;
use crate::types::{Coord, Tile, GRID_HEIGHT, GRID_WIDTH};

/// A contiguous block of one column that fell `distance` rows
///
/// Tiles carry their coordinates from before the fall, bottom first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftBatch {
    pub tiles: Vec<Tile>,
    pub distance: i8,
}

/// Compact column `x`, appending its batches to `out`
fn collapse_column(grid: &mut Grid, x: i8, out: &mut Vec<ShiftBatch>) {
    let mut distance: i8 = 0;
    let mut batch: Vec<Tile> = Vec::new();

    for y in 0..GRID_HEIGHT {
        match grid.get(x, y).flatten() {
            None => {
                // A new gap ends the block that fell the previous distance
                if !batch.is_empty() {
                    out.push(ShiftBatch {
                        tiles: std::mem::take(&mut batch),
                        distance,
                    });
                }
                distance += 1;
            }
            Some(symbol) if distance > 0 => {
                batch.push(Tile::new(Coord::new(x, y), symbol));
                grid.set(x, y, None);
                grid.set(x, y - distance, Some(symbol));
            }
            Some(_) => {}
        }
    }

    if !batch.is_empty() {
        out.push(ShiftBatch {
            tiles: batch,
            distance,
        });
    }
}

/// Slide every tile down until no column has a gap below a tile
pub fn collapse(grid: &mut Grid) -> Vec<ShiftBatch> {
    let mut batches = Vec::new();
    for x in 0..GRID_WIDTH {
        collapse_column(grid, x, &mut batches);
    }
    batches
}
