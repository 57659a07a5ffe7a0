//! Gameplay data collection
//!
//! Records rollouts as JSON lines for later training or replay, and draws
//! episode seeds from a fixed pool.

pub mod recorder;
pub mod seed_pool;

pub use recorder::{RunRecord, RunRecorder, TickRecord, read_runs};
pub use seed_pool::SeedPool;
