use tracing::{debug, trace};

use super::error::EnvError;
use super::observation::{Observation, create_observation};
use super::reward::{StepInfo, compute_reward};
use crate::game::{
    Direction, Engine, GameConfig, GridEngine, OutcomeReason, Position, RelativeAction,
    RewardConfig,
};

/// Per-episode state cached by the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Absolute heading, changed only by the turn rule and by reset
    pub direction: Direction,
    pub head_pos: Position,
    /// Head position before the latest step
    pub last_head_pos: Position,
    pub food_pos: Position,
    /// Steps since the episode started, terminal step included
    pub steps_without_food: u64,
}

/// What a single step hands back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    /// Engine's reason for the tick, `Alive` unless terminated
    pub reason: OutcomeReason,
    pub info: StepInfo,
}

/// Snake environment for reinforcement learning
///
/// Wraps an [`Engine`] and provides:
/// - a 3-action relative action space (turn left, straight, turn right)
/// - the 12-element egocentric [`Observation`]
/// - shaped rewards and the standard reset/step lifecycle
pub struct SnakeEnv<E: Engine = GridEngine> {
    engine: E,
    session: Session,
    starting_direction: Direction,
    rewards: RewardConfig,
}

impl SnakeEnv<GridEngine> {
    /// Create a new Snake environment backed by the built-in engine
    pub fn new(config: GameConfig) -> Result<Self, EnvError> {
        let rewards = config.rewards.clone();
        let starting_direction = config.starting_direction;
        let engine = GridEngine::new(config)?;
        Ok(Self::with_engine(engine, starting_direction).with_rewards(rewards))
    }
}

impl<E: Engine> SnakeEnv<E> {
    /// Wrap an existing engine whose snake currently heads `starting_direction`
    pub fn with_engine(engine: E, starting_direction: Direction) -> Self {
        let head_pos = engine.head_position();
        let session = Session {
            direction: starting_direction,
            head_pos,
            last_head_pos: head_pos,
            food_pos: engine.food_position(),
            steps_without_food: 0,
        };
        Self {
            engine,
            session,
            starting_direction,
            rewards: RewardConfig::default(),
        }
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    /// Step the environment with a discrete action index
    ///
    /// Actions:
    /// - 0: turn left
    /// - 1: keep heading
    /// - 2: turn right
    ///
    /// Any other index is rejected before the session is touched.
    pub fn step(&mut self, action: usize) -> Result<Transition, EnvError> {
        let action = RelativeAction::try_from(action)?;
        self.step_action(action)
    }

    pub fn step_action(&mut self, action: RelativeAction) -> Result<Transition, EnvError> {
        self.session.steps_without_food += 1;
        self.session.direction = self.session.direction.turn(action);

        let outcome = self.engine.step(self.session.direction)?;
        self.refresh_positions();

        let reward = compute_reward(
            &self.rewards,
            &outcome,
            self.session.last_head_pos,
            self.session.head_pos,
            self.session.food_pos,
        )?;
        let observation = self.observation();
        let info = self.info(reward, outcome.food_eaten);

        trace!(
            ?action,
            direction = ?self.session.direction,
            head = ?self.session.head_pos,
            reward,
            "step"
        );
        if outcome.terminated {
            debug!(
                reason = %outcome.reason,
                steps = self.session.steps_without_food,
                reward,
                "episode terminated"
            );
        }

        Ok(Transition {
            observation,
            reward,
            terminated: outcome.terminated,
            reason: outcome.reason,
            info,
        })
    }

    /// Reset the environment and return the initial observation
    ///
    /// The seed is handed to the engine; `None` lets the engine choose.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<Observation, EnvError> {
        if seed.is_some() && !self.engine.supports_seeding() {
            return Err(EnvError::SeedingUnsupported);
        }

        self.session.steps_without_food = 0;
        self.engine.reset(seed)?;
        self.session.direction = self.starting_direction;
        self.refresh_positions();
        self.session.last_head_pos = self.session.head_pos;

        debug!(
            ?seed,
            head = ?self.session.head_pos,
            food = ?self.session.food_pos,
            "environment reset"
        );
        Ok(self.observation())
    }

    /// Current observation without stepping
    pub fn observation(&self) -> Observation {
        create_observation(
            self.engine.world(),
            self.session.head_pos,
            self.session.food_pos,
            self.session.direction,
        )
    }

    /// Diagnostics for the current session
    pub fn info(&self, reward: f32, food_eaten: bool) -> StepInfo {
        StepInfo {
            distance: self.session.head_pos.distance_to(self.session.food_pos),
            reward,
            steps_without_food: self.session.steps_without_food,
            food_eaten,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn refresh_positions(&mut self) {
        self.session.last_head_pos = self.session.head_pos;
        self.session.food_pos = self.engine.food_position();
        self.session.head_pos = self.engine.head_position();
    }
}
