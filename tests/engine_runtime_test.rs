//! Engine runtime tests on a paused tokio clock.
//!
//! With `start_paused`, tokio advances time only when every task is idle, so
//! timers fire in a deterministic order and sleeps cost nothing.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{timeout, Instant};

use columns::core::{GameState, Grid};
use columns::engine::{recv_event, GameHandle, RuntimeConfig};
use columns::types::{GameEvent, GameMode, Motion, Symbol, GRID_HEIGHT};

use Symbol::{A, B, C};

fn scripted(pieces: &[(i8, [Symbol; 3])]) -> GameHandle {
    let mut state = GameState::with_seed(7);
    for &(column, symbols) in pieces {
        state.enqueue_piece(column, symbols);
    }
    GameHandle::spawn_with_state(state, RuntimeConfig::default())
}

/// Wait for the first event matching `pred`, returning it with its arrival time.
async fn wait_for(
    rx: &mut broadcast::Receiver<GameEvent>,
    pred: impl Fn(&GameEvent) -> bool,
) -> (GameEvent, Instant) {
    timeout(Duration::from_secs(120), async {
        loop {
            let event = recv_event(rx).await.expect("game task stopped");
            if pred(&event) {
                return (event, Instant::now());
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test(start_paused = true)]
async fn descent_timer_moves_piece_down() {
    let handle = scripted(&[(4, [A, B, C])]);
    let mut events = handle.subscribe();

    let started = Instant::now();
    handle.start_or_toggle().await.unwrap();
    let (event, at) = wait_for(&mut events, |e| matches!(e, GameEvent::PieceMoved { .. })).await;

    match event {
        GameEvent::PieceMoved { piece, motion, .. } => {
            assert_eq!(motion, Motion::Down);
            assert_eq!(piece.y(), GRID_HEIGHT - 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(at - started >= Duration::from_millis(700));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_cancels_descent() {
    let handle = scripted(&[(4, [A, B, C])]);
    let mut events = handle.subscribe();

    handle.start_or_toggle().await.unwrap();
    wait_for(&mut events, |e| matches!(e, GameEvent::PieceSpawned { .. })).await;
    handle.start_or_toggle().await.unwrap();
    wait_for(&mut events, |e| *e == GameEvent::Paused).await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.mode, GameMode::Paused);
    assert_eq!(snap.active.map(|p| p.y()), Some(GRID_HEIGHT));
    assert!(events.try_recv().is_err(), "no events while paused");

    // Resuming re-arms the timer instead of ticking at once
    let resumed = Instant::now();
    handle.start_or_toggle().await.unwrap();
    let (_, at) = wait_for(&mut events, |e| matches!(e, GameEvent::PieceMoved { .. })).await;
    assert!(at - resumed >= Duration::from_millis(700));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn drop_settles_after_lock_delay() {
    let handle = scripted(&[(2, [A, A, A]), (5, [A, B, C])]);
    let mut events = handle.subscribe();

    handle.start_or_toggle().await.unwrap();
    wait_for(&mut events, |e| matches!(e, GameEvent::PieceSpawned { .. })).await;
    handle.drop_piece().await.unwrap();

    let (_, locked_at) = wait_for(&mut events, |e| *e == GameEvent::PieceLocked).await;
    let (_, removed_at) =
        wait_for(&mut events, |e| matches!(e, GameEvent::TilesRemoved { .. })).await;
    assert!(removed_at - locked_at >= Duration::from_millis(200));

    let (event, _) =
        wait_for(&mut events, |e| matches!(e, GameEvent::PieceSpawned { .. })).await;
    assert!(matches!(event, GameEvent::PieceSpawned { piece } if piece.x() == 5));

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.score, 3);
    assert_eq!(snap.filled_count(), 0);

    let state = handle.shutdown().await.unwrap();
    assert_eq!(state.pieces_locked(), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_discards_pending_settle() {
    let handle = scripted(&[(2, [A, B, C]), (6, [C, B, A])]);
    let mut events = handle.subscribe();

    handle.start_or_toggle().await.unwrap();
    handle.drop_piece().await.unwrap();
    wait_for(&mut events, |e| *e == GameEvent::PieceLocked).await;
    handle.restart().await.unwrap();

    let (event, _) =
        wait_for(&mut events, |e| matches!(e, GameEvent::PieceSpawned { .. })).await;
    assert!(matches!(event, GameEvent::PieceSpawned { piece } if piece.x() == 6));

    // Well past the old settle delay, short of the first descent
    tokio::time::sleep(Duration::from_millis(500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.mode, GameMode::MovingPiece);
    assert_eq!(snap.episode_id, 2);
    assert_eq!(snap.filled_count(), 0);
    assert_eq!(snap.active.map(|p| p.y()), Some(GRID_HEIGHT));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn start_from_preset_grid() {
    let handle = scripted(&[(0, [A, B, C])]);
    let mut events = handle.subscribe();

    handle
        .start_from(Grid::parse(&["A-------", "A-------"]).unwrap())
        .await
        .unwrap();
    wait_for(&mut events, |e| matches!(e, GameEvent::PieceSpawned { .. })).await;
    handle.drop_piece().await.unwrap();
    wait_for(&mut events, |e| *e == GameEvent::ScoreChanged { score: 3 }).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.grid[0][0], 2);
    assert_eq!(snap.grid[1][0], 3);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn event_stream_closes_after_shutdown() {
    let handle = GameHandle::spawn(RuntimeConfig::default());
    let mut events = handle.subscribe();
    let state = handle.shutdown().await.unwrap();
    assert_eq!(state.mode(), GameMode::Start);

    // Every event sender went away with the task and the handle
    assert!(recv_event(&mut events).await.is_none());
}
