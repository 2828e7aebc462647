use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::game::{CollisionType, GameConfig};

use super::controller::{AppController, PlayMode};

/// Settings for a headless autopilot run
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    pub games: u32,
    /// Games still running after this many ticks are abandoned
    pub max_ticks: u32,
    pub seed: Option<u64>,
    pub report_path: Option<PathBuf>,
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            games: 100,
            max_ticks: 20_000,
            seed: None,
            report_path: None,
        }
    }
}

/// How a single simulated game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Won,
    Died(CollisionType),
    TimedOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub length: usize,
    pub ticks: u32,
}

/// Aggregate results written to the JSON report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationReport {
    pub grid_width: usize,
    pub grid_height: usize,
    pub seed: Option<u64>,
    pub games: u32,
    pub wins: u32,
    pub deaths: u32,
    pub timeouts: u32,
    pub best_length: usize,
    pub mean_length: f64,
    pub total_ticks: u64,
    pub shortcuts: u64,
    pub follows: u64,
    /// Share of autopilot moves that left the cycle
    pub shortcut_ratio: f64,
    pub elapsed_secs: f64,
    pub records: Vec<GameRecord>,
}

impl SimulationReport {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }

    fn push(&mut self, record: GameRecord) {
        self.games += 1;
        match record.outcome {
            GameOutcome::Won => self.wins += 1,
            GameOutcome::Died(_) => self.deaths += 1,
            GameOutcome::TimedOut => self.timeouts += 1,
        }
        self.best_length = self.best_length.max(record.length);
        self.total_ticks += u64::from(record.ticks);
        self.records.push(record);
    }

    fn finish(&mut self) {
        if !self.records.is_empty() {
            let total: usize = self.records.iter().map(|r| r.length).sum();
            self.mean_length = total as f64 / self.records.len() as f64;
        }
    }
}

/// Runs the autopilot without a terminal and reports how it did
pub struct SimulateMode {
    game_config: GameConfig,
    config: SimulateConfig,
}

impl SimulateMode {
    pub fn new(game_config: GameConfig, config: SimulateConfig) -> Self {
        Self {
            game_config,
            config,
        }
    }

    pub fn run(&self) -> Result<SimulationReport> {
        let mut controller = match self.config.seed {
            Some(seed) => AppController::with_seed(self.game_config.clone(), PlayMode::Ai, seed),
            None => AppController::new(self.game_config.clone(), PlayMode::Ai),
        }
        .context("Invalid game configuration")?;

        let mut report = SimulationReport {
            grid_width: self.game_config.grid_width,
            grid_height: self.game_config.grid_height,
            seed: self.config.seed,
            ..Default::default()
        };

        info!(
            games = self.config.games,
            width = self.game_config.grid_width,
            height = self.game_config.grid_height,
            "starting simulation"
        );
        let started = Instant::now();

        for game in 1..=self.config.games {
            let record = self.play_one(&mut controller);
            debug!(game, outcome = ?record.outcome, length = record.length, ticks = record.ticks, "game finished");
            if record.outcome == GameOutcome::TimedOut {
                warn!(game, ticks = record.ticks, "game abandoned at tick limit");
            }
            report.push(record);
        }

        let metrics = controller.metrics();
        report.shortcuts = metrics.shortcuts;
        report.follows = metrics.follows;
        report.shortcut_ratio = metrics.shortcut_ratio();
        report.elapsed_secs = started.elapsed().as_secs_f64();
        report.finish();

        info!(
            games = report.games,
            wins = report.wins,
            deaths = report.deaths,
            best = report.best_length,
            mean = report.mean_length,
            shortcut_ratio = report.shortcut_ratio,
            "simulation finished"
        );

        if let Some(path) = &self.config.report_path {
            write_report(&report, path)?;
            info!(path = %path.display(), "report written");
        }

        Ok(report)
    }

    /// Play until the board fills, the snake dies or the tick limit is hit
    fn play_one(&self, controller: &mut AppController) -> GameRecord {
        let mut ticks = 0;

        while ticks < self.config.max_ticks {
            let length = controller.state().snake.len();
            let Some(result) = controller.update() else {
                break;
            };
            ticks += 1;

            if result.won {
                return GameRecord {
                    outcome: GameOutcome::Won,
                    length: self.game_config.max_length(),
                    ticks,
                };
            }
            if result.terminated {
                let collision = result.info.collision_type.unwrap_or(CollisionType::Wall);
                controller.restart();
                return GameRecord {
                    outcome: GameOutcome::Died(collision),
                    length,
                    ticks,
                };
            }
        }

        let length = controller.state().snake.len();
        controller.restart();
        GameRecord {
            outcome: GameOutcome::TimedOut,
            length,
            ticks,
        }
    }
}

pub fn write_report(report: &SimulationReport, path: &std::path::Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).context("Failed to serialize report")?;
    writer.flush().context("Failed to write report")?;
    Ok(())
}

/// One-paragraph summary printed at the end of a run
pub fn summarize(report: &SimulationReport) -> String {
    format!(
        "{} games on {}x{}: {} won ({:.1}%), {} died, {} timed out\n\
         best length {}, mean length {:.1}, {} ticks, {} shortcuts / {} cycle moves ({:.1}% shortcuts)",
        report.games,
        report.grid_width,
        report.grid_height,
        report.wins,
        report.win_rate() * 100.0,
        report.deaths,
        report.timeouts,
        report.best_length,
        report.mean_length,
        report.total_ticks,
        report.shortcuts,
        report.follows,
        report.shortcut_ratio * 100.0,
    )
}
