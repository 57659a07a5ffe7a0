//! Rollout mode
//!
//! Runs a policy through a sequence of episodes in the Snake environment and
//! collects episode statistics. Useful as a smoke test for the environment
//! and as a baseline for learned policies.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::policy::Policy;
use crate::collection::{RunRecorder, SeedPool};
use crate::game::{Engine, GameConfig, OutcomeReason};
use crate::metrics::EpisodeStats;
use crate::rl::SnakeEnv;

/// Configuration for rollout mode
#[derive(Debug, Clone)]
pub struct RolloutConfig {
    /// Number of episodes to run
    pub num_episodes: usize,

    /// Episodes still running after this many steps are cut off
    pub max_steps: usize,

    /// Seed of the first episode; episode `i` uses `seed + i` unless a
    /// seed pool supplies it
    pub seed: Option<u64>,

    /// Log progress every N episodes
    pub log_frequency: usize,

    /// Game configuration (grid size, start, rewards)
    pub game_config: GameConfig,
}

impl RolloutConfig {
    pub fn new(num_episodes: usize, game_config: GameConfig) -> Self {
        Self {
            num_episodes,
            max_steps: 1000,
            seed: None,
            log_frequency: 1,
            game_config,
        }
    }
}

/// Summary of a single finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f32,
    pub length: usize,
    pub score: u32,
    /// `None` when the step cap ended the episode
    pub ending: Option<OutcomeReason>,
}

pub struct RolloutMode<P: Policy> {
    env: SnakeEnv,
    policy: P,
    stats: EpisodeStats,
    config: RolloutConfig,
    recorder: Option<RunRecorder>,
    seed_pool: Option<SeedPool>,
}

impl<P: Policy> RolloutMode<P> {
    pub fn new(config: RolloutConfig, policy: P) -> Result<Self> {
        let env = SnakeEnv::new(config.game_config.clone())
            .context("Failed to create snake environment")?;
        Ok(Self {
            env,
            policy,
            stats: EpisodeStats::new(100),
            config,
            recorder: None,
            seed_pool: None,
        })
    }

    /// Record every episode through `recorder`
    pub fn with_recorder(mut self, recorder: RunRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Draw episode seeds from `pool` until it runs dry
    pub fn with_seed_pool(mut self, pool: SeedPool) -> Self {
        self.seed_pool = Some(pool);
        self
    }

    /// Run all configured episodes
    pub fn run(&mut self) -> Result<&EpisodeStats> {
        for episode in 0..self.config.num_episodes {
            let seed = self.episode_seed(episode);
            let summary = self
                .run_episode(seed)
                .with_context(|| format!("Episode {} failed", episode))?;

            self.stats.record_episode(
                summary.reward,
                summary.length,
                summary.score,
                summary.ending,
            );

            if self.config.log_frequency > 0 && (episode + 1) % self.config.log_frequency == 0 {
                info!(
                    episode = episode + 1,
                    ?seed,
                    reward = summary.reward,
                    length = summary.length,
                    score = summary.score,
                    ending = summary.ending.map_or("step cap", OutcomeReason::as_str),
                    "episode finished"
                );
            }
        }

        Ok(&self.stats)
    }

    fn episode_seed(&mut self, episode: usize) -> Option<u64> {
        let fallback = self.config.seed.map(|seed| seed.wrapping_add(episode as u64));
        match self.seed_pool.as_mut() {
            Some(pool) => pool.draw().or_else(|| {
                warn!(episode, "seed pool is empty, falling back to generated seeds");
                fallback
            }),
            None => fallback,
        }
    }

    /// Play one episode until termination or the step cap
    pub fn run_episode(&mut self, seed: Option<u64>) -> Result<EpisodeSummary> {
        let mut observation = self.env.reset(seed)?;
        if let Some(recorder) = self.recorder.as_mut() {
            let episode = self.stats.total_episodes();
            recorder.begin_run(episode, self.env.engine().seed(), self.env.engine().world());
        }
        let mut summary = EpisodeSummary {
            reward: 0.0,
            length: 0,
            score: 0,
            ending: None,
        };

        while summary.length < self.config.max_steps {
            let action = self.policy.act(&observation);
            let transition = self.env.step_action(action)?;
            if let Some(recorder) = self.recorder.as_mut() {
                recorder.record_tick(action, &transition, self.env.engine().world());
            }

            summary.reward += transition.reward;
            summary.length += 1;
            if transition.info.food_eaten {
                summary.score += 1;
            }
            observation = transition.observation;

            if transition.terminated {
                summary.ending = Some(transition.reason);
                break;
            }
        }

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.finish_run(summary.ending)?;
        }
        Ok(summary)
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn env(&self) -> &SnakeEnv {
        &self.env
    }
}
