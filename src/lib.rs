//! Ham Snake - a Snake console whose autopilot never gets stuck
//!
//! This library provides:
//! - Core game logic (game module)
//! - Hamiltonian cycle generation and the shortcut-taking autopilot (ai module)
//! - TUI rendering and keypad input (render, input modules)
//! - The console state machine plus interactive and headless runners (modes module)

pub mod ai;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
