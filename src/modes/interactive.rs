use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{Action, GameConfig};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

use super::controller::{AppController, PlayMode};

/// Terminal front end for the console
pub struct InteractiveMode {
    controller: AppController,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Latest keypad press, consumed at the input sampling rate
    pending_action: Action,
}

impl InteractiveMode {
    pub fn new(controller: AppController) -> Self {
        Self {
            controller,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_action: Action::None,
        }
    }

    pub fn from_config(config: GameConfig, play_mode: PlayMode, seed: Option<u64>) -> Result<Self> {
        let controller = match seed {
            Some(seed) => AppController::with_seed(config, play_mode, seed),
            None => AppController::new(config, play_mode),
        }
        .context("Invalid game configuration")?;
        Ok(Self::new(controller))
    }

    pub fn controller_mut(&mut self) -> &mut AppController {
        &mut self.controller
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();
        let config = self.controller.config().clone();

        let mut current_tick = self.controller.tick_interval();
        let mut tick_timer = timer(current_tick);
        let mut input_timer = timer(config.input_interval());
        let mut render_timer = timer(config.render_interval());

        info!(mode = self.controller.play_mode().as_str(), "console started");

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = input_timer.tick() => {
                    let action = std::mem::take(&mut self.pending_action);
                    self.controller.process_action(action);

                    // play mode may have changed in the menu
                    let wanted = self.controller.tick_interval();
                    if wanted != current_tick {
                        debug!(?wanted, "tick interval changed");
                        current_tick = wanted;
                        tick_timer = timer(current_tick);
                    }
                }

                _ = tick_timer.tick() => {
                    self.controller.update();
                }

                _ = render_timer.tick() => {
                    self.controller.metrics_mut().update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.controller);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        let state = self.controller.state();
        info!(
            games = state.games_played,
            wins = state.games_won,
            best = self.controller.metrics().best_length,
            "console stopped"
        );

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(action) => self.pending_action = action,
            KeyAction::ToggleOverlay => self.renderer.toggle_cycle_overlay(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn timer(period: std::time::Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
