//! Game state module - the piece controller and round state machine
//!
//! This module ties together the core components: grid, piece queue, match
//! finder, gravity, and scoring. It owns every piece of mutable game state;
//! nothing else writes the grid, the piece, or the score.
//!
//! The state machine never sleeps. Each operation returns a [`Schedule`]
//! telling the driver how to re-arm its single timer, and each timer firing
//! comes back in as a [`Wakeup`]. Observers read the resulting changes with
//! [`GameState::take_events`].

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::gravity::collapse;
use crate::grid::Grid;
use crate::rng::PieceQueue;
use crate::scoring::descent_interval;
use crate::settle::settle_pass;
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// What a pending timer will do when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Move the live piece down one row, or lock it
    Descent,
    /// Run the next settle pass
    Settle,
}

/// A timer firing, tagged with the round that armed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wakeup {
    pub kind: TimerKind,
    pub episode: u32,
}

/// How the driver should treat its timer after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Leave any pending timer as it is
    Unchanged,
    /// Drop the pending timer
    Cancel,
    /// Replace the pending timer
    After(Duration, Wakeup),
}

impl Schedule {
    pub fn wakeup(&self) -> Option<Wakeup> {
        match self {
            Schedule::After(_, wakeup) => Some(*wakeup),
            _ => None,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    grid: Grid,
    mode: GameMode,
    active: Option<Piece>,
    /// The last locked piece, kept until the settle loop finishes
    landed: Option<Piece>,
    piece_queue: PieceQueue,
    /// Monotonic round id (increments on every start/restart).
    episode_id: u32,
    score: u32,
    round: u32,
    pieces_locked: u32,
    /// Pending notifications (drained by observers).
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let piece_queue = PieceQueue::new(config.seed);
        Self {
            config,
            grid: Grid::new(),
            mode: GameMode::Start,
            active: None,
            landed: None,
            piece_queue,
            episode_id: 0,
            score: 0,
            round: 0,
            pieces_locked: 0,
            events: Vec::new(),
        }
    }

    /// Create with default timings and the given RNG seed
    pub fn with_seed(seed: u32) -> Self {
        Self::new(GameConfig::default().with_seed(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn paused(&self) -> bool {
        self.mode == GameMode::Paused
    }

    pub fn game_over(&self) -> bool {
        self.mode == GameMode::Ended
    }

    /// Whether move commands are currently accepted
    pub fn can_move(&self) -> bool {
        self.mode == GameMode::MovingPiece && self.active.is_some()
    }

    /// Take all events emitted since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current interval between automatic one-row drops
    pub fn descent_interval(&self) -> Duration {
        descent_interval(
            self.round,
            self.config.base_descent,
            self.config.min_descent,
        )
    }

    /// Script the next spawn; scripted pieces are drawn before random ones
    pub fn enqueue_piece(&mut self, column: i8, symbols: [Symbol; PIECE_LEN]) {
        self.piece_queue.push_scripted(column, symbols);
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_u8_grid(&mut out.grid);
        out.active = self.active;
        out.mode = self.mode;
        out.score = self.score;
        out.round = self.round;
        out.pieces_locked = self.pieces_locked;
        out.episode_id = self.episode_id;
        out.seed = self.piece_queue.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn after(&self, delay: Duration, kind: TimerKind) -> Schedule {
        Schedule::After(
            delay,
            Wakeup {
                kind,
                episode: self.episode_id,
            },
        )
    }

    /// The live piece, if move commands are accepted right now
    fn movable_piece(&self) -> Option<Piece> {
        if self.mode == GameMode::MovingPiece {
            self.active
        } else {
            None
        }
    }

    /// Play/pause button: start a round, or pause/resume the running one
    ///
    /// Ignored while a lock is being resolved.
    pub fn start_or_toggle(&mut self) -> Schedule {
        match self.mode {
            GameMode::Start | GameMode::Ended => self.begin_round(Grid::new()),
            GameMode::Playing | GameMode::MovingPiece => self.pause(),
            GameMode::Paused => self.resume(),
            GameMode::Resolving => Schedule::Unchanged,
        }
    }

    /// Abandon whatever is running and start a fresh round
    pub fn restart(&mut self) -> Schedule {
        self.begin_round(Grid::new())
    }

    /// Start a round on a preset grid (puzzles, replays)
    ///
    /// Floating tiles in the preset fall into place first, so every column
    /// is gap-free before the first piece spawns. Runs are left for the
    /// first lock to clear.
    pub fn start_from(&mut self, mut grid: Grid) -> Schedule {
        let shifts = collapse(&mut grid);
        if !shifts.is_empty() {
            debug!(batches = shifts.len(), "preset grid collapsed");
        }
        self.begin_round(grid)
    }

    fn begin_round(&mut self, grid: Grid) -> Schedule {
        self.grid = grid;
        self.active = None;
        self.landed = None;
        self.score = 0;
        self.round = 0;
        self.pieces_locked = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.mode = GameMode::Playing;
        debug!(episode = self.episode_id, "round started");

        self.emit(GameEvent::Started);
        self.emit(GameEvent::ScoreChanged { score: 0 });
        self.spawn_piece()
    }

    /// Spawn a new piece from the queue and arm the descent timer
    fn spawn_piece(&mut self) -> Schedule {
        let piece = self.piece_queue.draw();
        self.active = Some(piece);
        self.mode = GameMode::MovingPiece;
        trace!(x = piece.x(), symbols = ?piece.symbols, "piece spawned");

        self.emit(GameEvent::PieceSpawned { piece });
        self.after(self.descent_interval(), TimerKind::Descent)
    }

    fn pause(&mut self) -> Schedule {
        self.mode = GameMode::Paused;
        self.emit(GameEvent::Paused);
        Schedule::Cancel
    }

    fn resume(&mut self) -> Schedule {
        self.mode = GameMode::MovingPiece;
        self.emit(GameEvent::Resumed);
        self.after(self.descent_interval(), TimerKind::Descent)
    }

    pub fn move_left(&mut self) -> Schedule {
        self.shift(-1, Motion::Left)
    }

    pub fn move_right(&mut self) -> Schedule {
        self.shift(1, Motion::Right)
    }

    /// Try to move the live piece one column sideways
    fn shift(&mut self, dx: i8, motion: Motion) -> Schedule {
        let Some(piece) = self.movable_piece() else {
            return Schedule::Unchanged;
        };

        let target = piece.x() + dx;
        // Off the side, or through a built-up column
        if !(0..GRID_WIDTH).contains(&target) || self.grid.column_height(target) > piece.y() {
            return Schedule::Unchanged;
        }

        let moved = piece.shifted(dx);
        self.active = Some(moved);
        self.emit(GameEvent::PieceMoved {
            piece: moved,
            motion,
            duration: Duration::ZERO,
        });
        Schedule::Unchanged
    }

    /// Cycle the live piece's symbols (bottom moves to top)
    pub fn rotate(&mut self) -> Schedule {
        let Some(piece) = self.movable_piece() else {
            return Schedule::Unchanged;
        };

        let rotated = piece.rotated();
        self.active = Some(rotated);
        self.emit(GameEvent::PieceRotated { piece: rotated });
        Schedule::Unchanged
    }

    /// Drop the live piece onto its column and lock it immediately
    pub fn hard_drop(&mut self) -> Schedule {
        let Some(piece) = self.movable_piece() else {
            return Schedule::Unchanged;
        };

        let dropped = piece.at_row(self.grid.column_height(piece.x()));
        self.active = Some(dropped);
        self.emit(GameEvent::PieceDropped {
            piece: dropped,
            duration: self.descent_interval(),
        });
        self.lock_piece(dropped)
    }

    /// Apply a command from the input layer
    pub fn apply_command(&mut self, command: GameCommand) -> Schedule {
        if command.is_move() && !self.can_move() {
            trace!(command = command.as_str(), mode = self.mode.as_str(), "move ignored");
            return Schedule::Unchanged;
        }

        match command {
            GameCommand::StartOrToggle => self.start_or_toggle(),
            GameCommand::Restart => self.restart(),
            GameCommand::MoveLeft => self.move_left(),
            GameCommand::MoveRight => self.move_right(),
            GameCommand::Rotate => self.rotate(),
            GameCommand::Drop => self.hard_drop(),
        }
    }

    /// Handle a timer firing
    ///
    /// Wakeups from an earlier round, or that no longer fit the current
    /// mode, are ignored.
    pub fn wake(&mut self, wakeup: Wakeup) -> Schedule {
        if wakeup.episode != self.episode_id {
            trace!(stale = wakeup.episode, current = self.episode_id, "stale wakeup");
            return Schedule::Unchanged;
        }

        match (wakeup.kind, self.mode) {
            (TimerKind::Descent, GameMode::MovingPiece) => self.descend(),
            (TimerKind::Settle, GameMode::Resolving) => self.settle_step(),
            _ => Schedule::Unchanged,
        }
    }

    /// Automatic descent: move down one row, or lock when resting
    fn descend(&mut self) -> Schedule {
        let Some(piece) = self.active else {
            return Schedule::Unchanged;
        };

        if self.grid.column_height(piece.x()) >= piece.y() {
            return self.lock_piece(piece);
        }

        let moved = piece.at_row(piece.y() - 1);
        self.active = Some(moved);
        let duration = self.descent_interval();
        self.emit(GameEvent::PieceMoved {
            piece: moved,
            motion: Motion::Down,
            duration,
        });
        self.after(duration, TimerKind::Descent)
    }

    /// Convert the piece into tiles and start resolving
    fn lock_piece(&mut self, piece: Piece) -> Schedule {
        self.active = None;
        let tiles = self.grid.place_piece(&piece);
        self.emit(GameEvent::TilesAdded {
            tiles: tiles.to_vec(),
        });
        self.emit(GameEvent::PieceLocked);

        self.landed = Some(piece);
        self.pieces_locked = self.pieces_locked.saturating_add(1);
        self.round = self.pieces_locked / self.config.pieces_per_round.max(1);
        self.mode = GameMode::Resolving;
        debug!(x = piece.x(), y = piece.y(), round = self.round, "piece locked");

        self.after(self.config.lock_settle_delay, TimerKind::Settle)
    }

    /// One settle pass; finishes resolving once the grid is stable
    fn settle_step(&mut self) -> Schedule {
        let Some(pass) = settle_pass(&mut self.grid) else {
            return self.finish_resolving();
        };

        self.score = self.score.saturating_add(pass.score);
        self.emit(GameEvent::ScoreChanged { score: self.score });
        self.emit(GameEvent::TilesRemoved { tiles: pass.removed });
        for batch in pass.shifts {
            self.emit(GameEvent::TilesShifted {
                tiles: batch.tiles,
                distance: batch.distance,
            });
        }
        self.after(self.config.settle_pass_delay, TimerKind::Settle)
    }

    /// Run the remaining settle passes now, without pacing
    pub fn resolve(&mut self) -> Schedule {
        let mut schedule = Schedule::Unchanged;
        while self.mode == GameMode::Resolving {
            schedule = self.settle_step();
        }
        schedule
    }

    /// The grid is stable: end the round or bring in the next piece
    fn finish_resolving(&mut self) -> Schedule {
        let landed = self.landed.take();
        let overflowed =
            landed.is_some_and(|piece| self.grid.column_height(piece.x()) >= GRID_HEIGHT);

        if overflowed {
            self.mode = GameMode::Ended;
            debug!(score = self.score, pieces = self.pieces_locked, "round ended");
            self.emit(GameEvent::Ended { last_piece: landed });
            return Schedule::Cancel;
        }

        self.spawn_piece()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
