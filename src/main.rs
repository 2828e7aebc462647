use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ham_snake::game::GameConfig;
use ham_snake::modes::{simulate, InteractiveMode, PlayMode, SimulateConfig, SimulateMode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

#[derive(Parser)]
#[command(name = "ham_snake")]
#[command(version, about = "Snake console with a Hamiltonian-cycle autopilot")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Grid width (even, at least 2)
    #[arg(long, default_value = "8")]
    width: usize,

    /// Grid height (even, at least 2)
    #[arg(long, default_value = "8")]
    height: usize,

    /// Who steers when the console starts
    #[arg(long, default_value = "ai")]
    play_mode: Control,

    /// Seed for food placement and cycle generation
    #[arg(long)]
    seed: Option<u64>,

    /// Restart immediately after a game over
    #[arg(long)]
    auto_restart: bool,

    /// Number of games to simulate
    #[arg(long, default_value = "100")]
    games: u32,

    /// Abandon a simulated game after this many ticks
    #[arg(long, default_value = "20000")]
    max_ticks: u32,

    /// Write the simulation report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Log to this file (the terminal UI only logs when set)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Terminal console with keyboard controls
    Play,
    /// Run the autopilot headless and report statistics
    Simulate,
}

#[derive(Clone, Copy, ValueEnum)]
enum Control {
    Ai,
    Manual,
}

impl From<Control> for PlayMode {
    fn from(control: Control) -> Self {
        match control {
            Control::Ai => PlayMode::Ai,
            Control::Manual => PlayMode::Manual,
        }
    }
}

fn init_logging(level: Level, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // stderr belongs to the terminal UI
        None if interactive => {}
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level, cli.log_file.as_deref(), cli.mode == Mode::Play)?;

    let config = GameConfig::new(cli.width, cli.height);
    config.validate().context("Invalid game configuration")?;

    match cli.mode {
        Mode::Play => {
            let mut console = InteractiveMode::from_config(config, cli.play_mode.into(), cli.seed)?;
            console.controller_mut().set_auto_restart(cli.auto_restart);
            console.run().await?;
        }
        Mode::Simulate => {
            let sim_config = SimulateConfig {
                games: cli.games,
                max_ticks: cli.max_ticks,
                seed: cli.seed,
                report_path: cli.report,
            };
            let report = SimulateMode::new(config, sim_config).run()?;
            println!("{}", simulate::summarize(&report));
        }
    }

    Ok(())
}
