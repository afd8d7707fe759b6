//! Grid Snake - the classic snake game on a fixed 20x20 grid
//!
//! This library provides:
//! - Core game rules and lifecycle (game module)
//! - High score persistence (storage module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - The interactive host that ties them together (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod storage;
