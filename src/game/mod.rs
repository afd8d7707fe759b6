//! Core game logic module for Snake
//!
//! This module contains all the game rules and the lifecycle state machine
//! without any I/O or rendering dependencies. A host drives it by calling
//! `tick` while its schedule is active and forwarding player commands.

pub mod action;
pub mod config;
pub mod engine;
pub mod events;
pub mod food;
pub mod schedule;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{GRID_SIZE, GameConfig, HIGH_SCORE_KEY};
pub use engine::GameEngine;
pub use events::GameEvent;
pub use schedule::{ScheduleId, TickSchedule};
pub use state::{GameOverReason, GameSnapshot, GameStatus, Point, Snake};
