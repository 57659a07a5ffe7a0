use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    action::Direction,
    config::GameConfig,
    state::{Grid, Position, Snake, cell},
};

/// Why a tick ended the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeReason {
    /// Snake is still moving
    Alive,
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    Body,
    /// Snake fills the whole grid
    Victory,
}

impl OutcomeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeReason::Alive => "alive",
            OutcomeReason::Wall => "wall",
            OutcomeReason::Body => "body",
            OutcomeReason::Victory => "victory",
        }
    }
}

impl std::fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the episode has ended
    pub terminated: bool,
    /// Whether the snake ate food this tick
    pub food_eaten: bool,
    pub reason: OutcomeReason,
}

impl StepOutcome {
    pub fn alive(food_eaten: bool) -> Self {
        Self {
            terminated: false,
            food_eaten,
            reason: OutcomeReason::Alive,
        }
    }

    pub fn ended(reason: OutcomeReason, food_eaten: bool) -> Self {
        Self {
            terminated: true,
            food_eaten,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
    #[error("the episode is over, reset before stepping again")]
    EpisodeOver,
}

/// The game simulation the environment drives
///
/// Implementations own the grid, the snake and the food. The environment
/// only ever talks to the game through these calls.
pub trait Engine {
    /// Advance one tick with the snake heading in `direction`
    fn step(&mut self, direction: Direction) -> Result<StepOutcome, EngineError>;

    /// Restart the episode; `None` lets the engine pick its own seed
    fn reset(&mut self, seed: Option<u64>) -> Result<(), EngineError>;

    /// Current world snapshot
    fn world(&self) -> &Grid;

    fn food_position(&self) -> Position;

    fn head_position(&self) -> Position;

    /// Whether `reset(Some(seed))` reproduces an episode
    fn supports_seeding(&self) -> bool {
        true
    }
}

/// The built-in snake game
pub struct GridEngine {
    config: GameConfig,
    /// Head cell at the start of every episode
    start: Position,
    grid: Grid,
    snake: Snake,
    food: Position,
    /// Cells holding neither snake nor food
    free_cells: Vec<Position>,
    rng: StdRng,
    seed: u64,
    score: u32,
    terminated: bool,
}

impl GridEngine {
    /// Create a new game engine with the given configuration
    ///
    /// The first episode is seeded from OS entropy; call `reset` with a seed
    /// for a reproducible start.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let start = config.start_position()?;
        let seed = OsRng.next_u64();
        let snake = Snake::new(start, config.starting_direction, config.initial_snake_length);
        let mut engine = Self {
            start,
            grid: Grid::new(config.grid_height, config.grid_width),
            snake,
            food: start,
            free_cells: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            score: 0,
            terminated: false,
            config,
        };
        engine.start_episode(seed);
        Ok(engine)
    }

    /// Seed of the current episode
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Food eaten this episode
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake_length(&self) -> usize {
        self.snake.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn start_episode(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.snake = Snake::new(
            self.start,
            self.config.starting_direction,
            self.config.initial_snake_length,
        );
        self.score = 0;
        self.terminated = false;

        self.grid = Grid::new(self.config.grid_height, self.config.grid_width);
        for (i, &segment) in self.snake.body.iter().enumerate() {
            let value = if i == 0 { cell::HEAD } else { cell::BODY };
            self.grid.set(segment, value);
        }

        let width = self.config.grid_width as i32;
        self.free_cells = (0..self.config.grid_height as i32)
            .flat_map(|row| (0..width).map(move |col| Position::new(row, col)))
            .filter(|pos| !self.snake.body.contains(pos))
            .collect();

        self.spawn_food();
        debug!(seed, head = ?self.snake.head(), food = ?self.food, "episode started");
    }

    /// Place food on a uniformly chosen free cell
    fn spawn_food(&mut self) -> bool {
        if self.free_cells.is_empty() {
            return false;
        }
        let index = self.rng.gen_range(0..self.free_cells.len());
        self.food = self.free_cells.swap_remove(index);
        self.grid.set(self.food, cell::FOOD);
        true
    }

    fn collision_at(&self, pos: Position, ate_food: bool) -> Option<OutcomeReason> {
        if !self.grid.is_in_bounds(pos) {
            return Some(OutcomeReason::Wall);
        }

        // The tail moves out of the way unless the snake is growing
        let segments = self.snake.body_segments();
        let blocking = if ate_food {
            segments
        } else {
            &segments[..segments.len().saturating_sub(1)]
        };
        if blocking.contains(&pos) {
            return Some(OutcomeReason::Body);
        }

        None
    }
}

impl Engine for GridEngine {
    fn step(&mut self, direction: Direction) -> Result<StepOutcome, EngineError> {
        if self.terminated {
            return Err(EngineError::EpisodeOver);
        }

        self.snake.direction = direction;
        let old_head = self.snake.head();
        let new_head = old_head.moved_in_direction(direction);
        let ate_food = new_head == self.food;

        if let Some(reason) = self.collision_at(new_head, ate_food) {
            self.terminated = true;
            // The head is reported at the collision cell, the grid keeps the last valid frame
            self.snake.body.insert(0, new_head);
            self.snake.body.pop();
            debug!(?reason, head = ?new_head, score = self.score, "collision");
            return Ok(StepOutcome::ended(reason, false));
        }

        self.snake.body.insert(0, new_head);
        self.grid.set(old_head, cell::BODY);

        if ate_food {
            self.score += 1;
            self.grid.set(new_head, cell::HEAD);
            if !self.spawn_food() {
                self.terminated = true;
                debug!(score = self.score, "grid filled");
                return Ok(StepOutcome::ended(OutcomeReason::Victory, true));
            }
            return Ok(StepOutcome::alive(true));
        }

        let tail = self.snake.tail();
        self.snake.body.pop();
        self.grid.set(tail, cell::EMPTY);
        self.free_cells.push(tail);
        self.free_cells.retain(|pos| *pos != new_head);
        self.grid.set(new_head, cell::HEAD);

        Ok(StepOutcome::alive(false))
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(), EngineError> {
        let seed = seed.unwrap_or_else(|| OsRng.next_u64());
        self.start_episode(seed);
        Ok(())
    }

    fn world(&self) -> &Grid {
        &self.grid
    }

    fn food_position(&self) -> Position {
        self.food
    }

    fn head_position(&self) -> Position {
        self.snake.head()
    }
}
