//! Episode statistics for rollouts
//!
//! Tracks episode rewards, lengths and scores with rolling windows, plus
//! running counts of how episodes ended.

use std::collections::VecDeque;

use crate::game::OutcomeReason;

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use turn_snake::game::OutcomeReason;
/// use turn_snake::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(15.5, 150, 5, Some(OutcomeReason::Wall));
///
/// assert_eq!(stats.total_episodes(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Food eaten per episode (rolling window)
    episode_scores: VecDeque<u32>,

    total_episodes: usize,
    total_steps: usize,
    best_score: u32,

    wall_collisions: usize,
    body_collisions: usize,
    victories: usize,
    /// Episodes cut off by the step cap
    truncated: usize,

    window_size: usize,
}

impl EpisodeStats {
    /// Create a tracker keeping the last `window_size` episodes for averages
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            wall_collisions: 0,
            body_collisions: 0,
            victories: 0,
            truncated: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    ///
    /// `ending` is `None` when the episode hit the step cap.
    pub fn record_episode(
        &mut self,
        reward: f32,
        length: usize,
        score: u32,
        ending: Option<OutcomeReason>,
    ) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);

        match ending {
            Some(OutcomeReason::Wall) => self.wall_collisions += 1,
            Some(OutcomeReason::Body) => self.body_collisions += 1,
            Some(OutcomeReason::Victory) => self.victories += 1,
            Some(OutcomeReason::Alive) | None => self.truncated += 1,
        }
    }

    /// Mean episode reward over the rolling window, 0.0 when empty
    pub fn mean_episode_reward(&self) -> f32 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
        }
    }

    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    pub fn mean_episode_score(&self) -> f32 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_scores.len() as f32
        }
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Highest score over all recorded episodes
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn wall_collisions(&self) -> usize {
        self.wall_collisions
    }

    pub fn body_collisions(&self) -> usize {
        self.body_collisions
    }

    pub fn victories(&self) -> usize {
        self.victories
    }

    pub fn truncated(&self) -> usize {
        self.truncated
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Wall: {} | Body: {} | Victory: {} | Truncated: {}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            self.wall_collisions,
            self.body_collisions,
            self.victories,
            self.truncated,
        )
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
