use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Reasons a [`GameConfig`] cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 2x2, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },

    #[error("grid dimensions must be even, got {width}x{height}")]
    OddDimensions { width: usize, height: usize },

    #[error("grid is too large ({width}x{height}), cells must fit in i32 coordinates")]
    GridTooLarge { width: usize, height: usize },

    #[error("{name} must be at least 1 Hz")]
    ZeroRate { name: &'static str },

    #[error("food_colors must be at least 1")]
    NoFoodColors,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    /// Game ticks per second while the autopilot plays
    pub ai_tick_rate_hz: u32,
    /// Game ticks per second while a human plays
    pub manual_tick_rate_hz: u32,
    /// Keypad samples per second
    pub input_rate_hz: u32,
    /// Frames per second
    pub render_rate_hz: u32,

    /// Number of colors the food rotates through
    pub food_colors: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 8,
            grid_height: 8,
            ai_tick_rate_hz: 15,
            manual_tick_rate_hz: 5,
            input_rate_hz: 30,
            render_rate_hz: 60,
            food_colors: 7,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Number of cells on the board, which is also the longest possible snake
    pub fn max_length(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Shortcuts are only considered while the snake is shorter than this
    pub fn shortcut_threshold(&self) -> usize {
        self.max_length() / 2
    }

    pub fn ai_tick_interval(&self) -> Duration {
        rate_to_interval(self.ai_tick_rate_hz)
    }

    pub fn manual_tick_interval(&self) -> Duration {
        rate_to_interval(self.manual_tick_rate_hz)
    }

    pub fn input_interval(&self) -> Duration {
        rate_to_interval(self.input_rate_hz)
    }

    pub fn render_interval(&self) -> Duration {
        rate_to_interval(self.render_rate_hz)
    }

    /// Validate configuration parameters
    ///
    /// The cycle generator doubles a coarse grid, so both dimensions have to
    /// be even.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.grid_width, self.grid_height);

        if width < 2 || height < 2 {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        if width % 2 != 0 || height % 2 != 0 {
            return Err(ConfigError::OddDimensions { width, height });
        }

        if i32::try_from(width).is_err()
            || i32::try_from(height).is_err()
            || width.checked_mul(height).is_none()
        {
            return Err(ConfigError::GridTooLarge { width, height });
        }

        let rates = [
            ("ai_tick_rate_hz", self.ai_tick_rate_hz),
            ("manual_tick_rate_hz", self.manual_tick_rate_hz),
            ("input_rate_hz", self.input_rate_hz),
            ("render_rate_hz", self.render_rate_hz),
        ];
        if let Some((name, _)) = rates.iter().find(|(_, rate)| *rate == 0) {
            return Err(ConfigError::ZeroRate { name });
        }

        if self.food_colors == 0 {
            return Err(ConfigError::NoFoodColors);
        }

        Ok(())
    }
}

fn rate_to_interval(rate_hz: u32) -> Duration {
    Duration::from_secs(1) / rate_hz.max(1)
}
