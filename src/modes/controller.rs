//! Top-level state machine of the console
//!
//! Routes keypad actions to the game or the settings menu, runs the autopilot
//! at tick rate and handles game over / restart.
//!
//! ```text
//! Playing --Confirm--> Menu --Confirm--> (previous state)
//! Playing --collision--> GameOver --any key--> Playing
//! GameOver --Confirm--> Menu
//! Menu: Up/Down toggles between autopilot and manual control
//! ```

use tracing::info;

use crate::ai::{Decision, HamiltonianAgent};
use crate::game::{
    Action, ConfigError, GameConfig, GameEngine, GameSnapshot, GameState, StepResult,
};
use crate::metrics::GameMetrics;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Game running, input goes to the game
    Playing,
    /// Settings menu open, game frozen
    Menu,
    /// Game ended, waiting for a key to restart
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// The autopilot steers
    Ai,
    /// A human steers
    Manual,
}

impl PlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::Ai => "AI",
            PlayMode::Manual => "MANUAL",
        }
    }
}

pub struct AppController {
    config: GameConfig,
    engine: GameEngine,
    state: GameState,
    agent: HamiltonianAgent,
    metrics: GameMetrics,
    app_state: AppState,
    previous_state: AppState,
    play_mode: PlayMode,
    /// Restart straight away instead of waiting in GameOver
    auto_restart: bool,
    last_decision: Option<Decision>,
}

impl AppController {
    pub fn new(config: GameConfig, play_mode: PlayMode) -> Result<Self, ConfigError> {
        let agent = HamiltonianAgent::new(&config)?;
        let engine = GameEngine::new(config.clone());
        Ok(Self::assemble(config, engine, agent, play_mode))
    }

    /// Controller whose games and cycles are reproducible
    pub fn with_seed(config: GameConfig, play_mode: PlayMode, seed: u64) -> Result<Self, ConfigError> {
        let agent = HamiltonianAgent::with_seed(&config, seed.wrapping_add(1))?;
        let engine = GameEngine::with_seed(config.clone(), seed);
        Ok(Self::assemble(config, engine, agent, play_mode))
    }

    fn assemble(
        config: GameConfig,
        mut engine: GameEngine,
        agent: HamiltonianAgent,
        play_mode: PlayMode,
    ) -> Self {
        let mut state = engine.new_game();
        state.tick_rate_hz = tick_rate(&config, play_mode);

        info!(mode = play_mode.as_str(), "controller initialized in Playing state");

        Self {
            config,
            engine,
            state,
            agent,
            metrics: GameMetrics::new(),
            app_state: AppState::Playing,
            previous_state: AppState::Playing,
            play_mode,
            auto_restart: false,
            last_decision: None,
        }
    }

    pub fn set_auto_restart(&mut self, auto_restart: bool) {
        self.auto_restart = auto_restart;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn agent(&self) -> &HamiltonianAgent {
        &self.agent
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    /// Time between game ticks in the current play mode
    pub fn tick_interval(&self) -> Duration {
        match self.play_mode {
            PlayMode::Ai => self.config.ai_tick_interval(),
            PlayMode::Manual => self.config.manual_tick_interval(),
        }
    }

    /// Route one sampled keypad action
    pub fn process_action(&mut self, action: Action) {
        if action == Action::None {
            return;
        }

        match self.app_state {
            AppState::Playing => {
                if action == Action::Confirm {
                    self.previous_state = AppState::Playing;
                    self.transition_to(AppState::Menu);
                } else if self.play_mode == PlayMode::Manual {
                    self.engine.apply_action(&mut self.state, action);
                }
                // directional keys are ignored while the autopilot steers
            }
            AppState::Menu => match action {
                Action::Up | Action::Down => self.toggle_play_mode(),
                Action::Confirm => self.transition_to(self.previous_state),
                _ => {}
            },
            AppState::GameOver => {
                if action == Action::Confirm {
                    self.previous_state = AppState::GameOver;
                    self.transition_to(AppState::Menu);
                } else {
                    self.restart();
                }
            }
        }
    }

    /// Advance one game tick. Returns `None` unless a game is running.
    pub fn update(&mut self) -> Option<StepResult> {
        if self.app_state != AppState::Playing {
            return None;
        }

        if self.play_mode == PlayMode::Ai {
            let decision = self.agent.plan(&self.state);
            self.metrics.record_decision(decision.kind);
            self.engine
                .apply_action(&mut self.state, decision.direction.into());
            self.last_decision = Some(decision);
        }

        let length_before = self.state.snake.len();
        let result = self.engine.tick(&mut self.state);

        if result.won {
            // the engine has already started the next game
            let length = self.config.max_length();
            self.metrics.on_win(length);
            self.metrics.on_game_start();
            self.agent.reset();
            self.last_decision = None;
            info!(
                wins = self.state.games_won,
                game = self.state.games_played,
                "board filled, starting next game"
            );
        } else if result.terminated {
            let length = length_before + usize::from(result.info.ate_food);
            self.metrics.on_game_over(length);
            info!(
                game = self.state.games_played,
                length,
                collision = ?result.info.collision_type,
                "game over"
            );

            if self.auto_restart {
                self.restart();
            } else {
                self.transition_to(AppState::GameOver);
            }
        } else {
            self.metrics.observe_length(self.state.snake.len());
        }

        Some(result)
    }

    /// Start the next game with a fresh cycle
    pub fn restart(&mut self) {
        self.engine.reset(&mut self.state);
        self.agent.reset();
        self.metrics.on_game_start();
        self.last_decision = None;
        self.transition_to(AppState::Playing);
    }

    /// Switch between autopilot and manual control
    pub fn toggle_play_mode(&mut self) {
        self.play_mode = match self.play_mode {
            PlayMode::Manual => PlayMode::Ai,
            PlayMode::Ai => PlayMode::Manual,
        };
        self.state.tick_rate_hz = tick_rate(&self.config, self.play_mode);

        if self.play_mode == PlayMode::Ai {
            self.agent.reset();
        }
        self.last_decision = None;

        info!(
            mode = self.play_mode.as_str(),
            tick_rate_hz = self.state.tick_rate_hz,
            "switched play mode"
        );
    }

    fn transition_to(&mut self, new_state: AppState) {
        if self.app_state == new_state {
            return;
        }
        info!(from = ?self.app_state, to = ?new_state, "state transition");
        self.app_state = new_state;
    }
}

fn tick_rate(config: &GameConfig, play_mode: PlayMode) -> u32 {
    match play_mode {
        PlayMode::Ai => config.ai_tick_rate_hz,
        PlayMode::Manual => config.manual_tick_rate_hz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake};

    fn controller(play_mode: PlayMode) -> AppController {
        AppController::with_seed(GameConfig::default(), play_mode, 3).unwrap()
    }

    /// Point the snake at the nearest wall so the next tick ends the game
    fn aim_at_wall(controller: &mut AppController) {
        controller.state.snake = Snake::from_body(vec![Position::new(0, 3)], Some(Direction::Left));
        controller.state.food.position = Position::new(5, 5);
    }

    #[test]
    fn test_initial_state() {
        let controller = controller(PlayMode::Ai);
        assert_eq!(controller.app_state(), AppState::Playing);
        assert_eq!(controller.play_mode(), PlayMode::Ai);
        assert_eq!(controller.state().games_played, 1);
        assert_eq!(controller.state().tick_rate_hz, 15);
        assert_eq!(controller.tick_interval(), GameConfig::default().ai_tick_interval());
    }

    #[test]
    fn test_confirm_opens_and_closes_menu() {
        let mut controller = controller(PlayMode::Manual);

        controller.process_action(Action::Confirm);
        assert_eq!(controller.app_state(), AppState::Menu);
        assert!(controller.update().is_none());

        controller.process_action(Action::Confirm);
        assert_eq!(controller.app_state(), AppState::Playing);
    }

    #[test]
    fn test_menu_toggles_play_mode() {
        let mut controller = controller(PlayMode::Manual);
        controller.process_action(Action::Confirm);

        controller.process_action(Action::Up);
        assert_eq!(controller.play_mode(), PlayMode::Ai);
        assert_eq!(controller.state().tick_rate_hz, 15);

        controller.process_action(Action::Down);
        assert_eq!(controller.play_mode(), PlayMode::Manual);
        assert_eq!(controller.state().tick_rate_hz, 5);

        // Left/Right do nothing in the menu
        controller.process_action(Action::Left);
        assert_eq!(controller.play_mode(), PlayMode::Manual);
        assert_eq!(controller.app_state(), AppState::Menu);
    }

    #[test]
    fn test_manual_input_steers() {
        let mut controller = controller(PlayMode::Manual);
        controller.process_action(Action::Down);
        assert_eq!(controller.state().snake.direction, Some(Direction::Down));
    }

    #[test]
    fn test_ai_ignores_directional_input() {
        let mut controller = controller(PlayMode::Ai);
        controller.process_action(Action::Down);
        assert_eq!(controller.state().snake.direction, None);
    }

    #[test]
    fn test_ai_update_moves_snake() {
        let mut controller = controller(PlayMode::Ai);
        let head = controller.state().snake.head();

        let result = controller.update().unwrap();

        assert!(result.info.moved);
        assert_ne!(controller.state().snake.head(), head);
        assert!(controller.last_decision().is_some());
        let counted = controller.metrics().shortcuts + controller.metrics().follows;
        assert_eq!(counted, 1);
    }

    #[test]
    fn test_collision_goes_to_game_over_and_any_key_restarts() {
        let mut controller = controller(PlayMode::Manual);
        aim_at_wall(&mut controller);

        let result = controller.update().unwrap();
        assert!(result.terminated);
        assert_eq!(controller.app_state(), AppState::GameOver);
        assert_eq!(controller.metrics().games_finished, 1);

        controller.process_action(Action::None);
        assert_eq!(controller.app_state(), AppState::GameOver);

        controller.process_action(Action::Right);
        assert_eq!(controller.app_state(), AppState::Playing);
        assert_eq!(controller.state().snake.len(), 1);
        assert_eq!(controller.state().games_played, 2);
        assert!(!controller.state().game_over);
    }

    #[test]
    fn test_menu_from_game_over_returns_to_game_over() {
        let mut controller = controller(PlayMode::Manual);
        aim_at_wall(&mut controller);
        controller.update();

        controller.process_action(Action::Confirm);
        assert_eq!(controller.app_state(), AppState::Menu);
        controller.process_action(Action::Confirm);
        assert_eq!(controller.app_state(), AppState::GameOver);
    }

    #[test]
    fn test_auto_restart() {
        let mut controller = controller(PlayMode::Manual);
        controller.set_auto_restart(true);
        aim_at_wall(&mut controller);

        let result = controller.update().unwrap();

        assert!(result.terminated);
        assert_eq!(controller.app_state(), AppState::Playing);
        assert_eq!(controller.state().games_played, 2);
        assert_eq!(controller.state().snake.len(), 1);
    }

    #[test]
    fn test_restart_regenerates_cycle() {
        let mut controller = controller(PlayMode::Ai);
        let before = controller.agent().cycle().clone();

        controller.restart();

        assert_ne!(controller.agent().cycle(), &before);
        assert!(controller.agent().cycle().validate().is_ok());
        assert_eq!(controller.app_state(), AppState::Playing);
    }
}
