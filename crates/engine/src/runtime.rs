//! Engine runtime.
//!
//! Runs one `GameState` inside a tokio task and turns its `Schedule`s into a
//! single real deadline.

use std::future::pending;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::core::{GameConfig, GameSnapshot, GameState, Grid, Schedule, Wakeup};
use crate::types::{GameCommand, GameEvent, Symbol, PIECE_LEN};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Command channel bound; senders wait when it is full.
    pub max_pending_commands: usize,
    /// Events buffered per subscriber before it starts lagging.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            max_pending_commands: 32,
            event_capacity: 256,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        use std::env;

        let max_pending_commands = env::var("COLUMNS_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(32);

        let event_capacity = env::var("COLUMNS_EVENT_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256);

        Self {
            game: GameConfig::from_env(),
            max_pending_commands,
            event_capacity,
        }
    }
}

/// Request delivered to the control loop.
#[derive(Debug)]
enum Request {
    Command(GameCommand),
    Enqueue {
        column: i8,
        symbols: [Symbol; PIECE_LEN],
    },
    StartFrom(Grid),
    Snapshot(oneshot::Sender<GameSnapshot>),
    Shutdown,
}

/// Handle to a running game task.
pub struct GameHandle {
    tx: mpsc::Sender<Request>,
    events: broadcast::Sender<GameEvent>,
    task: JoinHandle<GameState>,
}

impl GameHandle {
    /// Spawn a fresh game onto the current tokio runtime.
    pub fn spawn(config: RuntimeConfig) -> Self {
        let state = GameState::new(config.game.clone());
        Self::spawn_with_state(state, config)
    }

    /// Spawn around an existing state (scripted pieces, a game in progress).
    pub fn spawn_with_state(state: GameState, config: RuntimeConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.max_pending_commands.max(1));
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        info!(
            seed = state.config().seed,
            max_pending = config.max_pending_commands,
            "game task starting"
        );
        let task = tokio::spawn(control_loop(state, rx, events.clone()));

        Self { tx, events, task }
    }

    async fn request(&self, request: Request) -> Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| anyhow!("game task has stopped"))
    }

    pub async fn send(&self, command: GameCommand) -> Result<()> {
        self.request(Request::Command(command)).await
    }

    pub async fn start_or_toggle(&self) -> Result<()> {
        self.send(GameCommand::StartOrToggle).await
    }

    pub async fn restart(&self) -> Result<()> {
        self.send(GameCommand::Restart).await
    }

    pub async fn move_left(&self) -> Result<()> {
        self.send(GameCommand::MoveLeft).await
    }

    pub async fn move_right(&self) -> Result<()> {
        self.send(GameCommand::MoveRight).await
    }

    pub async fn rotate(&self) -> Result<()> {
        self.send(GameCommand::Rotate).await
    }

    pub async fn drop_piece(&self) -> Result<()> {
        self.send(GameCommand::Drop).await
    }

    pub async fn enqueue_piece(&self, column: i8, symbols: [Symbol; PIECE_LEN]) -> Result<()> {
        self.request(Request::Enqueue { column, symbols }).await
    }

    pub async fn start_from(&self, grid: Grid) -> Result<()> {
        self.request(Request::StartFrom(grid)).await
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Snapshot(reply)).await?;
        rx.await.context("game task dropped the snapshot request")
    }

    /// Stop the task and return the final state.
    pub async fn shutdown(self) -> Result<GameState> {
        // A stopped task is not an error here; the join below reports it.
        let _ = self.tx.send(Request::Shutdown).await;
        self.task.await.context("game task panicked")
    }
}

/// Next event from a subscription, skipping over lag.
///
/// Returns `None` once the game task has stopped.
pub async fn recv_event(rx: &mut broadcast::Receiver<GameEvent>) -> Option<GameEvent> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

async fn sleep_to(deadline: Option<(Instant, Wakeup)>) -> Wakeup {
    match deadline {
        Some((at, wakeup)) => {
            sleep_until(at).await;
            wakeup
        }
        None => pending().await,
    }
}

async fn control_loop(
    mut state: GameState,
    mut rx: mpsc::Receiver<Request>,
    events: broadcast::Sender<GameEvent>,
) -> GameState {
    let mut deadline: Option<(Instant, Wakeup)> = None;

    loop {
        let schedule = tokio::select! {
            request = rx.recv() => match request {
                None | Some(Request::Shutdown) => break,
                Some(Request::Command(command)) => {
                    debug!(command = command.as_str(), mode = state.mode().as_str(), "command");
                    state.apply_command(command)
                }
                Some(Request::Enqueue { column, symbols }) => {
                    state.enqueue_piece(column, symbols);
                    Schedule::Unchanged
                }
                Some(Request::StartFrom(grid)) => state.start_from(grid),
                Some(Request::Snapshot(reply)) => {
                    let _ = reply.send(state.snapshot());
                    Schedule::Unchanged
                }
            },
            wakeup = sleep_to(deadline) => {
                deadline = None;
                state.wake(wakeup)
            }
        };

        match schedule {
            Schedule::Unchanged => {}
            Schedule::Cancel => deadline = None,
            Schedule::After(delay, wakeup) => deadline = Some((Instant::now() + delay, wakeup)),
        }

        for event in state.take_events() {
            // No subscribers is fine.
            let _ = events.send(event);
        }
    }

    info!(
        score = state.score(),
        pieces = state.pieces_locked(),
        "game task stopped"
    );
    state
}
