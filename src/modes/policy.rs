use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::RelativeAction;
use crate::rl::Observation;

/// Chooses a relative action from an observation
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> RelativeAction;
}

/// Uniformly random actions from a seeded generator
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> RelativeAction {
        RelativeAction::ALL[self.rng.gen_range(0..RelativeAction::ALL.len())]
    }
}

/// Heads for the food while steering around flagged obstacles
///
/// Uses nothing but the observation bits, so it is a baseline for what a
/// learned policy can do with the same inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn act(&mut self, observation: &Observation) -> RelativeAction {
        let Some(heading) = observation.heading() else {
            return RelativeAction::Straight;
        };

        let candidates = [
            RelativeAction::Straight,
            RelativeAction::TurnLeft,
            RelativeAction::TurnRight,
        ];
        let safe = |action: &&RelativeAction| !observation.obstacle(heading.turn(**action));

        candidates
            .iter()
            .filter(safe)
            .find(|action| observation.food_towards(heading.turn(**action)))
            .or_else(|| candidates.iter().find(safe))
            .copied()
            .unwrap_or(RelativeAction::Straight)
    }
}
