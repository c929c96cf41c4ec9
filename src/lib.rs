//! Columns (workspace facade crate).
//!
//! Re-exports the workspace crates as `columns::{core,engine,types}` so the
//! binary, the integration tests, and the benches share one import path.

pub use columns_core as core;
pub use columns_engine as engine;
pub use columns_types as types;
