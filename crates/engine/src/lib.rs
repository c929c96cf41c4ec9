//! Engine module - drives a game in real time
//!
//! The core state machine never sleeps; it hands back a `Schedule` after each
//! operation. This crate owns the clock: a single tokio task holds the
//! `GameState`, at most one pending deadline, a bounded command channel, and
//! a broadcast channel of events.
//!
//! ```no_run
//! use columns_engine::{recv_event, GameHandle, RuntimeConfig};
//! use columns_engine::types::GameEvent;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let handle = GameHandle::spawn(RuntimeConfig::from_env());
//! let mut events = handle.subscribe();
//! handle.start_or_toggle().await?;
//!
//! while let Some(event) = recv_event(&mut events).await {
//!     if let GameEvent::Ended { .. } = event {
//!         break;
//!     }
//!     handle.drop_piece().await?;
//! }
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod runtime;

pub use columns_core as core;
pub use columns_types as types;

pub use runtime::{recv_event, GameHandle, RuntimeConfig};
