//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and the settle
//! loop. It has **zero dependencies** on clocks, UI, or I/O, making it:
//!
//! - **Deterministic**: Same seed and commands produce identical games
//! - **Testable**: Timers are values, so tests step them by hand
//! - **Portable**: Can be driven by a tokio task, a frame loop, or a test
//!
//! # Module Structure
//!
//! - [`grid`]: 8x12 grid of optional symbols with column heights
//! - [`matcher`]: Run detection along the four directions
//! - [`gravity`]: Column collapse, reported as shift batches
//! - [`settle`]: Clear, score, and collapse until stable
//! - [`scoring`]: Clear scoring and the per-round descent interval
//! - [`rng`]: Seeded piece generation with scripted overrides
//! - [`game_state`]: The piece controller and round state machine
//! - [`config`]: Timing and seed configuration
//!
//! # Game Rules
//!
//! - A piece is a vertical stack of three symbols that enters above a
//!   random column and falls one row per descent interval
//! - Three or more equal symbols in a line (vertical, horizontal, or
//!   diagonal) are cleared; the tiles above fall into the gap
//! - Clearing repeats until no line remains, each pass scored separately
//! - The round ends when the column a piece landed in is still full after
//!   clearing
//!
//! # Example
//!
//! ```
//! use columns_core::{GameState, Schedule};
//! use columns_core::types::{GameCommand, GameMode, Symbol};
//!
//! let mut game = GameState::with_seed(12345);
//! game.enqueue_piece(2, [Symbol::A, Symbol::A, Symbol::A]);
//! game.apply_command(GameCommand::StartOrToggle);
//!
//! // Drop locks immediately and hands back the settle timer
//! let schedule = game.apply_command(GameCommand::Drop);
//! assert!(matches!(schedule, Schedule::After(..)));
//! assert_eq!(game.mode(), GameMode::Resolving);
//!
//! // Run the settle passes without waiting for the timer
//! game.resolve();
//! assert_eq!(game.score(), 3);
//! ```

pub mod config;
pub mod game_state;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod settle;
pub mod snapshot;

pub use columns_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use game_state::{GameState, Schedule, TimerKind, Wakeup};
pub use gravity::{collapse, ShiftBatch};
pub use grid::{Grid, GridParseError, U8Grid};
pub use matcher::{find_matches, find_runs, Direction, MatchSet, Run};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{clear_score, descent_interval};
pub use settle::{settle, settle_pass, SettlePass};
pub use snapshot::GameSnapshot;
