//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is a plain value type: the state machine in `columns-core`
//! produces them, the runtime in `columns-engine` forwards them, and any
//! rendering or input layer consumes them.
//!
//! # Grid Dimensions
//!
//! - **Width**: 8 columns (indexed 0-7, left to right)
//! - **Height**: 12 rows (indexed 0-11, bottom to top)
//! - **Spawn row**: 12, one row above the visible grid
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DESCENT_MS` | 700 | Descent interval in round 0 |
//! | `MIN_DESCENT_MS` | 100 | Floor for the descent interval |
//! | `LOCK_SETTLE_MS` | 200 | Pause between a lock and the first match pass |
//! | `SETTLE_PASS_MS` | 300 | Pause between consecutive match passes |
//! | `PIECES_PER_ROUND` | 10 | Locked pieces per difficulty round |
//!
//! # Examples
//!
//! ```
//! use columns_types::{Coord, GameCommand, Piece, Symbol, GRID_HEIGHT, GRID_WIDTH};
//!
//! // Parse a symbol
//! assert_eq!(Symbol::from_char('b'), Some(Symbol::B));
//!
//! // Rotate a piece: the bottom symbol moves to the top
//! let piece = Piece::new(Coord::new(3, GRID_HEIGHT), [Symbol::A, Symbol::B, Symbol::C]);
//! assert_eq!(piece.rotated().symbols, [Symbol::B, Symbol::C, Symbol::A]);
//!
//! // Parse a command
//! assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::MoveLeft));
//!
//! // Grid dimensions
//! assert_eq!(GRID_WIDTH, 8);
//! assert_eq!(GRID_HEIGHT, 12);
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Grid width in cells (8 columns)
pub const GRID_WIDTH: i8 = 8;

/// Grid height in cells (12 rows)
pub const GRID_HEIGHT: i8 = 12;

/// Number of symbols stacked in one piece
pub const PIECE_LEN: usize = 3;

/// Shortest run that gets cleared
pub const MIN_RUN: usize = 3;

/// Descent interval at round 0 (700ms per row)
pub const BASE_DESCENT_MS: u32 = 700;

/// Floor for the descent interval once rounds have shortened it
pub const MIN_DESCENT_MS: u32 = 100;

/// Delay between a piece locking and the first match pass
pub const LOCK_SETTLE_MS: u32 = 200;

/// Delay between consecutive match passes of one cascade
pub const SETTLE_PASS_MS: u32 = 300;

/// Locked pieces needed to advance one round
pub const PIECES_PER_ROUND: u32 = 10;

/// Per-round multiplier applied to the descent speed-up (`1 - 0.9^round`)
pub const DESCENT_DECAY: f64 = 0.9;

/// The three tile symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    A,
    B,
    C,
}

impl Symbol {
    /// All symbols, in draw order
    pub const ALL: [Symbol; 3] = [Symbol::A, Symbol::B, Symbol::C];

    /// Parse from a character (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use columns_types::Symbol;
    ///
    /// assert_eq!(Symbol::from_char('A'), Some(Symbol::A));
    /// assert_eq!(Symbol::from_char('c'), Some(Symbol::C));
    /// assert_eq!(Symbol::from_char('-'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Symbol::A),
            'B' => Some(Symbol::B),
            'C' => Some(Symbol::C),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::B => 'B',
            Symbol::C => 'C',
        }
    }

    /// Numeric code used by flat grid exports (0 is reserved for empty)
    pub fn code(&self) -> u8 {
        match self {
            Symbol::A => 1,
            Symbol::B => 2,
            Symbol::C => 3,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A grid cell: `None` is empty
pub type Cell = Option<Symbol>;

/// Text used for an empty cell
pub const EMPTY_CHAR: char = '-';

/// A grid position
///
/// `x` counts columns from the left, `y` counts rows from the bottom.
/// `y >= GRID_HEIGHT` is legal for piece cells hanging above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Whether the position lies inside the visible grid
    pub fn in_grid(&self) -> bool {
        (0..GRID_WIDTH).contains(&self.x) && (0..GRID_HEIGHT).contains(&self.y)
    }

    pub fn offset(&self, dx: i8, dy: i8) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A placed tile, as reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub coord: Coord,
    pub symbol: Symbol,
}

impl Tile {
    pub const fn new(coord: Coord, symbol: Symbol) -> Self {
        Self { coord, symbol }
    }
}

/// The falling piece: three stacked symbols above an anchor cell
///
/// `symbols[0]` sits on the anchor, `symbols[2]` is the top. Every
/// movement returns a new value; pieces are never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub anchor: Coord,
    pub symbols: [Symbol; PIECE_LEN],
}

impl Piece {
    pub const fn new(anchor: Coord, symbols: [Symbol; PIECE_LEN]) -> Self {
        Self { anchor, symbols }
    }

    pub fn x(&self) -> i8 {
        self.anchor.x
    }

    pub fn y(&self) -> i8 {
        self.anchor.y
    }

    /// Cycle the symbols upwards: the bottom symbol moves to the top
    pub fn rotated(&self) -> Self {
        let [bottom, middle, top] = self.symbols;
        Self::new(self.anchor, [middle, top, bottom])
    }

    /// Same piece, `dx` columns over
    pub fn shifted(&self, dx: i8) -> Self {
        Self::new(self.anchor.offset(dx, 0), self.symbols)
    }

    /// Same piece with its anchor moved to row `y`
    pub fn at_row(&self, y: i8) -> Self {
        Self::new(Coord::new(self.anchor.x, y), self.symbols)
    }

    /// The three tiles, bottom first
    pub fn tiles(&self) -> [Tile; PIECE_LEN] {
        let mut i = 0;
        self.symbols.map(|symbol| {
            let tile = Tile::new(self.anchor.offset(0, i), symbol);
            i += 1;
            tile
        })
    }
}

/// Commands accepted from an input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameCommand {
    /// Start a round, or toggle pause while one is running
    StartOrToggle,
    /// Abandon the current round and start a new one
    Restart,
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Cycle the piece's symbols
    Rotate,
    /// Hard drop and lock immediately
    Drop,
}

impl GameCommand {
    pub const ALL: [GameCommand; 6] = [
        GameCommand::StartOrToggle,
        GameCommand::Restart,
        GameCommand::MoveLeft,
        GameCommand::MoveRight,
        GameCommand::Rotate,
        GameCommand::Drop,
    ];

    /// Parse command from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use columns_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("rotate"), Some(GameCommand::Rotate));
    /// assert_eq!(GameCommand::from_str("startOrToggle"), Some(GameCommand::StartOrToggle));
    /// assert_eq!(GameCommand::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "startortoggle" | "playpause" => Some(GameCommand::StartOrToggle),
            "restart" => Some(GameCommand::Restart),
            "moveleft" | "left" => Some(GameCommand::MoveLeft),
            "moveright" | "right" => Some(GameCommand::MoveRight),
            "rotate" => Some(GameCommand::Rotate),
            "drop" => Some(GameCommand::Drop),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::StartOrToggle => "startOrToggle",
            GameCommand::Restart => "restart",
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::Rotate => "rotate",
            GameCommand::Drop => "drop",
        }
    }

    /// Whether the command moves the live piece
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            GameCommand::MoveLeft | GameCommand::MoveRight | GameCommand::Rotate | GameCommand::Drop
        )
    }
}

/// State machine modes
///
/// `Start -> Playing -> (MovingPiece <-> Resolving) -> Ended`, with
/// `Paused` entered from `Playing`/`MovingPiece` and left back to
/// `MovingPiece`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    /// No round has been started yet
    #[default]
    Start,
    /// A round is being set up; the first piece has not spawned
    Playing,
    /// A piece is live and accepts move commands
    MovingPiece,
    /// A piece has locked and the settle loop is running
    Resolving,
    Paused,
    /// The round is over
    Ended,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Start => "start",
            GameMode::Playing => "playing",
            GameMode::MovingPiece => "movingPiece",
            GameMode::Resolving => "resolving",
            GameMode::Paused => "paused",
            GameMode::Ended => "ended",
        }
    }
}

/// Direction a piece moved in a [`GameEvent::PieceMoved`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Motion {
    Down,
    Left,
    Right,
}

/// State-change notifications for rendering/input layers
///
/// Durations are animation targets only; the core never waits on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    /// The round ended; carries the piece whose lock ended it
    Ended { last_piece: Option<Piece> },
    ScoreChanged { score: u32 },
    /// Tiles written by a lock (cells above the grid are included)
    TilesAdded { tiles: Vec<Tile> },
    TilesRemoved { tiles: Vec<Tile> },
    /// A contiguous block of one column fell by `distance` rows.
    /// Tiles carry their coordinates from before the fall.
    TilesShifted { tiles: Vec<Tile>, distance: i8 },
    PieceSpawned { piece: Piece },
    PieceMoved {
        piece: Piece,
        motion: Motion,
        duration: Duration,
    },
    PieceRotated { piece: Piece },
    PieceDropped { piece: Piece, duration: Duration },
    PieceLocked,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Started => "started",
            GameEvent::Paused => "paused",
            GameEvent::Resumed => "resumed",
            GameEvent::Ended { .. } => "ended",
            GameEvent::ScoreChanged { .. } => "scoreChanged",
            GameEvent::TilesAdded { .. } => "tilesAdded",
            GameEvent::TilesRemoved { .. } => "tilesRemoved",
            GameEvent::TilesShifted { .. } => "tilesShifted",
            GameEvent::PieceSpawned { .. } => "pieceSpawned",
            GameEvent::PieceMoved { .. } => "pieceMoved",
            GameEvent::PieceRotated { .. } => "pieceRotated",
            GameEvent::PieceDropped { .. } => "pieceDropped",
            GameEvent::PieceLocked => "pieceLocked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(BASE_DESCENT_MS, 700);
        assert_eq!(MIN_DESCENT_MS, 100);
        assert_eq!(LOCK_SETTLE_MS, 200);
        assert_eq!(SETTLE_PASS_MS, 300);
        assert!(MIN_DESCENT_MS < BASE_DESCENT_MS);
    }

    #[test]
    fn rotation_cycles_back_after_three_turns() {
        let piece = Piece::new(Coord::new(0, 0), [Symbol::A, Symbol::B, Symbol::C]);
        assert_eq!(piece.rotated().rotated().rotated(), piece);
    }

    #[test]
    fn piece_tiles_stack_upwards() {
        let piece = Piece::new(Coord::new(2, 5), [Symbol::C, Symbol::A, Symbol::B]);
        let tiles = piece.tiles();
        assert_eq!(tiles[0], Tile::new(Coord::new(2, 5), Symbol::C));
        assert_eq!(tiles[1], Tile::new(Coord::new(2, 6), Symbol::A));
        assert_eq!(tiles[2], Tile::new(Coord::new(2, 7), Symbol::B));
    }

    #[test]
    fn command_strings_round_trip() {
        for cmd in GameCommand::ALL {
            assert_eq!(GameCommand::from_str(cmd.as_str()), Some(cmd));
        }
        assert_eq!(GameCommand::from_str("hold"), None);
    }

    #[test]
    fn only_piece_commands_are_moves() {
        let moves: Vec<_> = GameCommand::ALL.into_iter().filter(|c| c.is_move()).collect();
        assert_eq!(moves.len(), 4);
        assert!(!GameCommand::StartOrToggle.is_move());
        assert!(!GameCommand::Restart.is_move());
    }

    #[test]
    fn in_grid_bounds() {
        assert!(Coord::new(0, 0).in_grid());
        assert!(Coord::new(GRID_WIDTH - 1, GRID_HEIGHT - 1).in_grid());
        assert!(!Coord::new(0, GRID_HEIGHT).in_grid());
        assert!(!Coord::new(-1, 0).in_grid());
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = GameEvent::ScoreChanged { score: 9 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "scoreChanged");
        assert_eq!(json["score"], 9);

        let json = serde_json::to_value(GameEvent::PieceLocked).unwrap();
        assert_eq!(json["type"], "pieceLocked");
    }
}
