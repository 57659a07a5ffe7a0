use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::action::Direction;
use super::engine::EngineError;
use super::state::Position;

/// Reward values handed out by the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Hitting a wall or the snake's own body
    pub collision: f32,
    /// Filling the whole grid
    pub victory: f32,
    /// Eating food
    pub food: f32,
    /// Moving strictly closer to the food
    pub approach: f32,
    /// Any other move
    pub retreat: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            collision: -100.0,
            victory: 100.0,
            food: 10.0,
            approach: 1.0,
            retreat: -1.0,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rows in the game grid
    pub grid_height: usize,
    /// Number of columns in the game grid
    pub grid_width: usize,
    /// Row of the snake head at the start of every episode
    pub start_row: usize,
    /// Column of the snake head at the start of every episode
    pub start_col: usize,
    /// Heading at the start of every episode
    pub starting_direction: Direction,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    pub rewards: RewardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_height: 20,
            grid_width: 20,
            start_row: 10,
            start_col: 10,
            starting_direction: Direction::Up,
            initial_snake_length: 3,
            rewards: RewardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size, head centred
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            grid_height: height,
            grid_width: width,
            start_row: height / 2,
            start_col: width / 2,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_start(mut self, row: usize, col: usize, direction: Direction) -> Self {
        self.start_row = row;
        self.start_col = col;
        self.starting_direction = direction;
        self
    }

    /// Starting head cell in signed grid coordinates
    pub fn start_position(&self) -> Result<Position, EngineError> {
        let row = i32::try_from(self.start_row).map_err(|_| {
            EngineError::InvalidConfig(format!("start row {} is out of range", self.start_row))
        })?;
        let col = i32::try_from(self.start_col).map_err(|_| {
            EngineError::InvalidConfig(format!("start column {} is out of range", self.start_col))
        })?;
        Ok(Position::new(row, col))
    }

    /// Check that the grid is non-empty and the starting snake fits on it
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.grid_height == 0 || self.grid_width == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_height, self.grid_width
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(EngineError::InvalidConfig(
                "initial snake length must be at least 1".to_string(),
            ));
        }
        let max_side = i32::MAX as usize;
        if self.grid_height > max_side || self.grid_width > max_side {
            return Err(EngineError::InvalidConfig(format!(
                "grid sides must not exceed {}, got {}x{}",
                max_side, self.grid_height, self.grid_width
            )));
        }
        let cells = self
            .grid_height
            .checked_mul(self.grid_width)
            .ok_or_else(|| {
                EngineError::InvalidConfig(format!(
                    "a {}x{} grid has too many cells",
                    self.grid_height, self.grid_width
                ))
            })?;
        if self.initial_snake_length >= cells {
            return Err(EngineError::InvalidConfig(format!(
                "a snake of length {} leaves no room for food on a {}x{} grid",
                self.initial_snake_length, self.grid_height, self.grid_width
            )));
        }

        if self.start_row >= self.grid_height || self.start_col >= self.grid_width {
            return Err(EngineError::InvalidConfig(format!(
                "start cell ({}, {}) is outside the {}x{} grid",
                self.start_row, self.start_col, self.grid_height, self.grid_width
            )));
        }

        // The starting body is a straight line behind the head, so checking the tail suffices
        let head = self.start_position()?;
        let (dr, dc) = self.starting_direction.delta();
        let trail = self.initial_snake_length as i64 - 1;
        let tail_row = i64::from(head.row) - i64::from(dr) * trail;
        let tail_col = i64::from(head.col) - i64::from(dc) * trail;
        let tail_in_bounds = (0..self.grid_height as i64).contains(&tail_row)
            && (0..self.grid_width as i64).contains(&tail_col);
        if !tail_in_bounds {
            return Err(EngineError::InvalidConfig(format!(
                "starting snake at ({}, {}) heading {:?} has a segment outside the grid at ({}, {})",
                self.start_row, self.start_col, self.starting_direction, tail_row, tail_col
            )));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.rewards.collision, -100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 9);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.grid_width, 9);
        assert_eq!(config.start_position(), Ok(Position::new(7, 4)));
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let config = GameConfig::new(0, 10);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_body_off_grid() {
        // Heading right from column 1 puts the tail at column -1
        let config = GameConfig::new(5, 5).with_start(2, 1, Direction::Right);
        assert!(config.validate().is_err());

        let config = GameConfig::new(5, 5).with_start(2, 2, Direction::Right);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_sides() {
        let config = GameConfig::new(i32::MAX as usize + 1, 2);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_huge_grid_without_panicking() {
        let config = GameConfig::new(usize::MAX, 2);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = GameConfig::new(usize::MAX, usize::MAX);
        config.initial_snake_length = usize::MAX;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_start_outside_grid() {
        // Heading up puts the body below the head, so only the head is off the grid
        let config = GameConfig::new(5, 5).with_start(7, 2, Direction::Up);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_position_out_of_range() {
        let config = GameConfig::new(10, 10).with_start(i32::MAX as usize + 5, 3, Direction::Up);
        assert!(matches!(config.start_position(), Err(EngineError::InvalidConfig(_))));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"grid_height": 6, "starting_direction": "down"}"#).unwrap();
        assert_eq!(config.grid_height, 6);
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.starting_direction, Direction::Down);
        assert_eq!(config.rewards, RewardConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("configs").join("snake.json");

        let mut config = GameConfig::new(8, 12).with_start(4, 6, Direction::Left);
        config.rewards.food = 25.0;
        config.save(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(GameConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
