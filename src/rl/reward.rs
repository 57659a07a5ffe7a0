use serde::Serialize;

use super::error::EnvError;
use crate::game::{OutcomeReason, Position, RewardConfig, StepOutcome};

/// Score one transition
///
/// Terminal outcomes take priority over food, food takes priority over the
/// distance shaping. `previous_head` is the head before this tick.
pub fn compute_reward(
    rewards: &RewardConfig,
    outcome: &StepOutcome,
    previous_head: Position,
    head: Position,
    food: Position,
) -> Result<f32, EnvError> {
    if outcome.terminated {
        return match outcome.reason {
            OutcomeReason::Wall | OutcomeReason::Body => Ok(rewards.collision),
            OutcomeReason::Victory => Ok(rewards.victory),
            reason => Err(EnvError::UnrecognizedOutcome(reason)),
        };
    }

    if outcome.food_eaten {
        return Ok(rewards.food);
    }

    if head.squared_distance_to(food) < previous_head.squared_distance_to(food) {
        Ok(rewards.approach)
    } else {
        Ok(rewards.retreat)
    }
}

/// Diagnostics returned alongside every step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInfo {
    /// Euclidean distance from head to food after the step
    pub distance: f64,
    pub reward: f32,
    pub steps_without_food: u64,
    pub food_eaten: bool,
}
