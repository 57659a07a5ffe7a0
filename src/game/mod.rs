//! Core game logic module for Snake
//!
//! This module contains the game simulation without any I/O or rendering.
//! The [`Engine`] trait is the seam the RL environment talks through;
//! [`GridEngine`] is the built-in implementation.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{ACTION_COUNT, Axis, Direction, InvalidAction, InvalidDirection, RelativeAction};
pub use config::{GameConfig, RewardConfig};
pub use engine::{Engine, EngineError, GridEngine, OutcomeReason, StepOutcome};
pub use state::{Grid, Position, Snake, cell};
