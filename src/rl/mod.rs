//! Reinforcement learning environment for Snake game
//!
//! Provides:
//! - Relative 3-action interface over the absolute-direction engine
//! - 12-element egocentric observations, exportable as Burn tensors
//! - Shaped rewards and per-step diagnostics

pub mod environment;
pub mod error;
pub mod observation;
pub mod reward;

pub use environment::{Session, SnakeEnv, Transition};
pub use error::EnvError;
pub use observation::{OBSERVATION_SIZE, Observation, create_observation};
pub use reward::{StepInfo, compute_reward};
