use super::{
    action::Action,
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake moved at all (it waits until it has a direction)
    pub moved: bool,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game ended in a collision
    pub terminated: bool,
    /// Whether the snake filled the board; the session has already been reset
    pub won: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn idle(terminated: bool) -> Self {
        Self {
            terminated,
            won: false,
            info: StepInfo {
                moved: false,
                ate_food: false,
                collision_type: None,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose spawns are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start the first game of a session
    pub fn new_game(&mut self) -> GameState {
        let mut state = GameState::new(
            Snake::new(Position::new(0, 0)),
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        state.tick_rate_hz = self.config.ai_tick_rate_hz;
        self.reset(&mut state);
        state
    }

    /// Start the next game, keeping the session counters
    pub fn reset(&mut self, state: &mut GameState) {
        let head = self.random_cell();
        state.snake = Snake::new(head);
        state.score = 0;
        state.steps = 0;
        state.game_over = false;
        state.games_played += 1;
        state.food.position = self.spawn_food_avoid_snake(&state.snake);

        debug!(
            game = state.games_played,
            head = ?head,
            food = ?state.food.position,
            "game reset"
        );
    }

    /// Update the intended direction.
    ///
    /// 180° turns and non-directional actions are ignored.
    pub fn apply_action(&self, state: &mut GameState, action: Action) {
        let Some(new_direction) = action.direction() else {
            return;
        };

        match state.snake.direction {
            Some(current) if current.is_opposite(new_direction) => {}
            _ => state.snake.direction = Some(new_direction),
        }
    }

    /// Apply an action and advance one tick
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        self.apply_action(state, action);
        self.tick(state)
    }

    /// Advance the game by exactly one tick
    pub fn tick(&mut self, state: &mut GameState) -> StepResult {
        if state.game_over {
            return StepResult::idle(true);
        }

        let Some(direction) = state.snake.direction else {
            return StepResult::idle(false);
        };

        let old_tail = state.snake.advance(direction);
        state.steps += 1;
        let head = state.snake.head();

        if let Some(collision_type) = self.check_collision(state, head) {
            state.game_over = true;
            debug!(
                game = state.games_played,
                length = state.snake.len(),
                ?collision_type,
                "game over"
            );

            return StepResult {
                terminated: true,
                won: false,
                info: StepInfo {
                    moved: true,
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        let ate_food = head == state.food.position;
        let mut won = false;

        if ate_food {
            state.snake.grow(old_tail);
            state.score += 1;

            if state.is_board_full() {
                state.games_won += 1;
                debug!(game = state.games_played, wins = state.games_won, "board filled");
                self.reset(state);
                won = true;
            } else {
                state.food.position = self.spawn_food_avoid_snake(&state.snake);
                state.food.color = (state.food.color + 1) % self.config.food_colors.max(1);
            }
        }

        StepResult {
            terminated: false,
            won,
            info: StepInfo {
                moved: true,
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check if the head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Check self-collision
        if state.snake.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn random_cell(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x, y)
    }

    /// Spawn food at a random empty position.
    ///
    /// Terminates because a full board is handled as a win before this runs.
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Position {
        debug_assert!(snake.len() < self.config.max_length());
        loop {
            let pos = self.random_cell();

            if !snake.occupies(pos) {
                return pos;
            }
        }
    }
}
