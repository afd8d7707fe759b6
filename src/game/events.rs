use super::state::{GameOverReason, GameStatus, Point};

/// Capacity of the event channel; slow subscribers skip the oldest events
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notifications emitted by the engine after each mutation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Snake, direction, score and food were reinitialised
    Reset,
    StatusChanged { from: GameStatus, to: GameStatus },
    /// The snake advanced one cell
    Stepped { head: Point, grew: bool },
    FoodEaten { at: Point, score: u32 },
    HighScoreRaised { high_score: u32 },
    GameOver { reason: GameOverReason, score: u32 },
}
