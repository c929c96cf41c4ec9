//! RNG module - random piece generation
//!
//! Each piece gets a uniformly random column and three independently drawn
//! symbols. A small LCG keeps games reproducible from a seed, and scripted
//! pieces can be queued ahead of the random ones for puzzles and replays.

use std::collections::VecDeque;

use crate::types::{Coord, Piece, Symbol, GRID_HEIGHT, GRID_WIDTH, PIECE_LEN};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits have short periods; take the high half
        (self.next_u32() >> 16) % max
    }

    pub fn next_symbol(&mut self) -> Symbol {
        Symbol::ALL[self.next_range(Symbol::ALL.len() as u32) as usize]
    }

    pub fn next_column(&mut self) -> i8 {
        self.next_range(GRID_WIDTH as u32) as i8
    }
}

/// Supplies the pieces of a game
#[derive(Debug, Clone)]
pub struct PieceQueue {
    seed: u32,
    rng: SimpleRng,
    /// Pieces handed out before any random ones, front first
    scripted: VecDeque<(i8, [Symbol; PIECE_LEN])>,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: SimpleRng::new(seed),
            scripted: VecDeque::new(),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Queue a fixed piece; columns outside the grid are clamped onto it
    pub fn push_scripted(&mut self, column: i8, symbols: [Symbol; PIECE_LEN]) {
        self.scripted
            .push_back((column.clamp(0, GRID_WIDTH - 1), symbols));
    }

    pub fn scripted_len(&self) -> usize {
        self.scripted.len()
    }

    /// Draw the next piece, anchored just above the grid
    pub fn draw(&mut self) -> Piece {
        let (column, symbols) = self.scripted.pop_front().unwrap_or_else(|| {
            let column = self.rng.next_column();
            let symbols = [
                self.rng.next_symbol(),
                self.rng.next_symbol(),
                self.rng.next_symbol(),
            ];
            (column, symbols)
        });
        Piece::new(Coord::new(column, GRID_HEIGHT), symbols)
    }
}
