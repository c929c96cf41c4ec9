use crate::grid::U8Grid;
use crate::types::{GameMode, Piece, EMPTY_CHAR, GRID_HEIGHT, GRID_WIDTH};

/// Plain copy of everything an observer may render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameSnapshot {
    /// Symbol codes, `grid[y][x]`, 0 = empty, y = 0 is the bottom row
    pub grid: U8Grid,
    pub active: Option<Piece>,
    pub mode: GameMode,
    pub score: u32,
    pub round: u32,
    pub pieces_locked: u32,
    pub episode_id: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.mode == GameMode::MovingPiece
    }

    pub fn game_over(&self) -> bool {
        self.mode == GameMode::Ended
    }

    pub fn filled_count(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&code| code != 0)
            .count()
    }

    /// Render the grid top row first, the way `Grid::parse` reads it
    pub fn rows(&self) -> Vec<String> {
        (0..GRID_HEIGHT as usize)
            .rev()
            .map(|y| {
                (0..GRID_WIDTH as usize)
                    .map(|x| match self.grid[y][x] {
                        1 => 'A',
                        2 => 'B',
                        3 => 'C',
                        _ => EMPTY_CHAR,
                    })
                    .collect()
            })
            .collect()
    }
}
