use std::time::{Duration, Instant};

use crate::ai::DecisionKind;

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_length: usize,
    pub games_finished: u32,
    pub games_won: u32,
    pub shortcuts: u64,
    pub follows: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_length: 0,
            games_finished: 0,
            games_won: 0,
            shortcuts: 0,
            follows: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_length: usize) {
        self.games_finished += 1;
        self.observe_length(final_length);
    }

    pub fn on_win(&mut self, length: usize) {
        self.games_won += 1;
        self.on_game_over(length);
    }

    pub fn observe_length(&mut self, length: usize) {
        self.best_length = self.best_length.max(length);
    }

    pub fn record_decision(&mut self, kind: DecisionKind) {
        match kind {
            DecisionKind::Shortcut => self.shortcuts += 1,
            DecisionKind::Follow => self.follows += 1,
        }
    }

    /// Share of autopilot moves that left the cycle
    pub fn shortcut_ratio(&self) -> f64 {
        let total = self.shortcuts + self.follows;
        if total == 0 {
            0.0
        } else {
            self.shortcuts as f64 / total as f64
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
