use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction of the single step from self to other, if they are neighbours
    pub fn direction_to(&self, other: Position) -> Option<Direction> {
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    pub body: Vec<Position>,
    /// Current direction of movement, `None` until the first move
    pub direction: Option<Direction>,
}

impl Snake {
    /// Create a one-segment snake that has not started moving
    pub fn new(head: Position) -> Self {
        Self {
            body: vec![head],
            direction: None,
        }
    }

    /// Create a snake from explicit segments, head first
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn from_body(body: Vec<Position>, direction: Option<Direction>) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Shift every segment onto its predecessor and move the head one cell.
    ///
    /// Returns the cell the tail vacated so the caller can grow back into it.
    pub fn advance(&mut self, direction: Direction) -> Position {
        let old_tail = self.tail();
        let new_head = self.head().moved_in_direction(direction);
        self.body.rotate_right(1);
        self.body[0] = new_head;
        old_tail
    }

    /// Append a segment at the tail
    pub fn grow(&mut self, tail: Position) {
        self.body.push(tail);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The food pellet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    /// Rotating palette index, only used for drawing
    pub color: u8,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Counters shown on the stats display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub games_played: u32,
    pub games_won: u32,
    pub length: usize,
    pub score: u32,
}

/// What a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub body: Vec<Position>,
    pub food: Position,
    pub food_color: u8,
    pub game_over: bool,
    pub stats: GameStats,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Food eaten in the current game
    pub score: u32,
    /// Ticks in the current game
    pub steps: u32,
    pub game_over: bool,
    /// Games started since power-on
    pub games_played: u32,
    /// Games that ended with the snake filling the board
    pub games_won: u32,
    /// Current game tick rate
    pub tick_rate_hz: u32,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food: Food {
                position: food,
                color: 0,
            },
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            game_over: false,
            games_played: 0,
            games_won: 0,
            tick_rate_hz: 0,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// True once the snake covers every cell
    pub fn is_board_full(&self) -> bool {
        self.snake.len() >= self.cell_count()
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            games_played: self.games_played,
            games_won: self.games_won,
            length: self.snake.len(),
            score: self.score,
        }
    }

    /// Copy out what the renderer and stats display read each frame
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            body: self.snake.body.clone(),
            food: self.food.position,
            food_color: self.food.color,
            game_over: self.game_over,
            stats: self.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_snake(head: Position, direction: Direction, length: usize) -> Snake {
        let back = direction.opposite();
        let mut body = vec![head];
        for i in 1..length {
            body.push(body[i - 1].moved_in_direction(back));
        }
        Snake::from_body(body, Some(direction))
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_direction_to() {
        let pos = Position::new(3, 3);
        assert_eq!(pos.direction_to(Position::new(3, 2)), Some(Direction::Up));
        assert_eq!(pos.direction_to(Position::new(4, 3)), Some(Direction::Right));
        assert_eq!(pos.direction_to(Position::new(4, 4)), None);
        assert_eq!(pos.direction_to(pos), None);
        assert_eq!(pos.distance(Position::new(0, 7)), 7);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(2, 2));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
        assert_eq!(snake.direction, None);

        let snake = line_snake(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = line_snake(Position::new(5, 5), Direction::Right, 3);

        let vacated = snake.advance(Direction::Right);
        assert_eq!(vacated, Position::new(3, 5));
        assert_eq!(
            snake.body,
            vec![Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );

        let vacated = snake.advance(Direction::Down);
        snake.grow(vacated);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(6, 6));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_single_segment_advance() {
        let mut snake = Snake::new(Position::new(0, 0));
        let vacated = snake.advance(Direction::Down);
        assert_eq!(vacated, Position::new(0, 0));
        assert_eq!(snake.body, vec![Position::new(0, 1)]);
    }

    #[test]
    fn test_collision_detection() {
        let snake = line_snake(Position::new(5, 5), Direction::Right, 3);
        assert!(!snake.collides_with_body(Position::new(5, 5))); // head
        assert!(snake.collides_with_body(Position::new(4, 5))); // body
        assert!(!snake.collides_with_body(Position::new(10, 10))); // empty
        assert!(snake.occupies(Position::new(5, 5)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5)),
            Position::new(1, 1),
            8,
            8,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(7, 7)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(8, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 8)));
    }

    #[test]
    fn test_snapshot() {
        let mut state = GameState::new(
            line_snake(Position::new(3, 3), Direction::Up, 2),
            Position::new(6, 6),
            8,
            8,
        );
        state.games_played = 4;
        state.games_won = 1;
        state.food.color = 3;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.body, state.snake.body);
        assert_eq!(snapshot.food, Position::new(6, 6));
        assert_eq!(snapshot.food_color, 3);
        assert_eq!(
            snapshot.stats,
            GameStats {
                games_played: 4,
                games_won: 1,
                length: 2,
                score: 0
            }
        );
        assert!(!state.is_board_full());
    }
}
