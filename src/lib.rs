//! Turn Snake - a Snake environment for reinforcement learning
//!
//! This library provides:
//! - Core game logic and the grid engine (game module)
//! - The RL environment with relative actions and compact observations (rl module)
//! - Episode statistics (metrics module)
//! - Gameplay recording and seed pools (collection module)
//! - Baseline policies and rollout mode (modes module)

pub mod collection;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod rl;
