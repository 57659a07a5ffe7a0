pub mod policy;
pub mod rollout;

pub use policy::{GreedyPolicy, Policy, RandomPolicy};
pub use rollout::{EpisodeSummary, RolloutConfig, RolloutMode};
