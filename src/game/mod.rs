//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The autopilot and the terminal front end both drive it one tick at a time.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, Food, GameSnapshot, GameState, GameStats, Position, Snake};
