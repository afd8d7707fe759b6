use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Width and height of the (square) playing field in cells
pub const GRID_SIZE: i32 = 20;

/// Key under which the high score is persisted
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Milliseconds between two simulation steps
    pub tick_interval_ms: u64,
    /// Points awarded for each food eaten
    pub food_score: u32,
    /// Key used with the persistence store for the high score
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 150,
            food_score: 10,
            high_score_key: HIGH_SCORE_KEY.to_string(),
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom tick interval
    pub fn with_tick_interval(tick_interval_ms: u64) -> Self {
        Self {
            tick_interval_ms,
            ..Default::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
