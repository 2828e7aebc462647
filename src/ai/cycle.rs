//! Hamiltonian cycle generation
//!
//! A random spanning tree is carved over a half-resolution "super-grid" with
//! a recursive backtracker, then every super-cell is expanded into the four
//! cells it covers on the real board. Walking the board while keeping the
//! tree's walls on one side visits every cell exactly once and returns to the
//! start.
//!
//! ```text
//!   super-cell          quadrant  escape   otherwise
//!   +----+----+         TL        up       right (to TR)
//!   | TL | TR |         TR        right    down  (to BR)
//!   +----+----+         BR        down     left  (to BL)
//!   | BL | BR |         BL        left     up    (to TL)
//!   +----+----+
//! ```

use rand::{seq::SliceRandom, Rng};
use std::collections::HashSet;
use thiserror::Error;

use crate::game::{ConfigError, Direction, Position};

/// Ways a cell sequence can fail to be a Hamiltonian cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("cycle has {actual} cells, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("cell {0:?} lies outside the grid")]
    OffGrid(Position),

    #[error("cell {0:?} appears more than once")]
    Duplicate(Position),

    #[error("step {index} from {from:?} to {to:?} does not join neighbouring cells")]
    NotAdjacent {
        index: usize,
        from: Position,
        to: Position,
    },
}

/// A closed tour over every cell of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HamiltonianCycle {
    cells: Vec<Position>,
    width: usize,
    height: usize,
}

impl HamiltonianCycle {
    /// Wrap an explicit cell sequence, checking that it is a closed tour
    pub fn from_cells(
        cells: Vec<Position>,
        width: usize,
        height: usize,
    ) -> Result<Self, CycleError> {
        let cycle = Self {
            cells,
            width,
            height,
        };
        cycle.validate()?;
        Ok(cycle)
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `index`, wrapping around the end of the tour
    pub fn get(&self, index: usize) -> Position {
        self.cells[index % self.cells.len()]
    }

    /// Cell that follows `index` on the tour
    pub fn successor(&self, index: usize) -> Position {
        self.get(index + 1)
    }

    /// Steps needed to go from `from` to `to` moving only forward on the tour
    pub fn forward_distance(&self, from: usize, to: usize) -> usize {
        if to >= from {
            to - from
        } else {
            self.cells.len() - from + to
        }
    }

    /// Check coverage, uniqueness and adjacency (including the wrap step)
    pub fn validate(&self) -> Result<(), CycleError> {
        let expected = self.width * self.height;
        if self.cells.len() != expected {
            return Err(CycleError::WrongLength {
                expected,
                actual: self.cells.len(),
            });
        }

        let mut seen = HashSet::with_capacity(expected);
        for &cell in &self.cells {
            let on_grid = cell.x >= 0
                && cell.y >= 0
                && (cell.x as usize) < self.width
                && (cell.y as usize) < self.height;
            if !on_grid {
                return Err(CycleError::OffGrid(cell));
            }
            if !seen.insert(cell) {
                return Err(CycleError::Duplicate(cell));
            }
        }

        for index in 0..self.cells.len() {
            let from = self.get(index);
            let to = self.successor(index);
            if from.distance(to) != 1 {
                return Err(CycleError::NotAdjacent { index, from, to });
            }
        }

        Ok(())
    }
}

fn wall_slot(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SuperCell {
    open: [bool; 4],
    visited: bool,
}

/// Which corner of its 2x2 block a board cell occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Quadrant {
    fn of(cell: Position) -> Self {
        match (cell.x % 2 == 0, cell.y % 2 == 0) {
            (true, true) => Quadrant::TopLeft,
            (false, true) => Quadrant::TopRight,
            (false, false) => Quadrant::BottomRight,
            (true, false) => Quadrant::BottomLeft,
        }
    }

    /// Leaves the block through this side when the tree allows it
    fn escape(self) -> Direction {
        match self {
            Quadrant::TopLeft => Direction::Up,
            Quadrant::TopRight => Direction::Right,
            Quadrant::BottomRight => Direction::Down,
            Quadrant::BottomLeft => Direction::Left,
        }
    }

    /// Step to the next quadrant of the same block (TL→TR→BR→BL→TL)
    fn rotation(self) -> Direction {
        match self {
            Quadrant::TopLeft => Direction::Right,
            Quadrant::TopRight => Direction::Down,
            Quadrant::BottomRight => Direction::Left,
            Quadrant::BottomLeft => Direction::Up,
        }
    }
}

/// Stack frame of the backtracker: a cell and the directions it still has to try
struct CarveFrame {
    x: usize,
    y: usize,
    directions: [Direction; 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(x: usize, y: usize, rng: &mut R) -> Self {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            x,
            y,
            directions,
            next: 0,
        }
    }
}

/// Perfect maze over the super-grid; open walls are the tree's edges
#[derive(Debug, Clone)]
pub struct SpanningTree {
    width: usize,
    height: usize,
    cells: Vec<SuperCell>,
}

impl SpanningTree {
    /// Super-grid with every wall closed
    pub fn closed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![SuperCell::default(); width * height],
        }
    }

    /// Carve a random spanning tree with a depth-first backtracker from (0, 0)
    pub fn carve<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let mut tree = Self::closed(width, height);
        if tree.cells.is_empty() {
            return tree;
        }

        tree.cells[0].visited = true;
        let mut stack = vec![CarveFrame::new(0, 0, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }

            let direction = frame.directions[frame.next];
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            let Some((nx, ny)) = tree.neighbor(x, y, direction) else {
                continue;
            };
            if tree.cells[tree.slot(nx, ny)].visited {
                continue;
            }

            tree.open_wall(x, y, direction);
            let slot = tree.slot(nx, ny);
            tree.cells[slot].visited = true;
            stack.push(CarveFrame::new(nx, ny, rng));
        }

        tree
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn slot(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn neighbor(&self, x: usize, y: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.delta();
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// Open the wall on `direction` side of (x, y) and the matching wall of
    /// its neighbour. Returns false when there is no neighbour that way.
    pub fn open_wall(&mut self, x: usize, y: usize, direction: Direction) -> bool {
        let Some((nx, ny)) = self.neighbor(x, y, direction) else {
            return false;
        };
        let here = self.slot(x, y);
        let there = self.slot(nx, ny);
        self.cells[here].open[wall_slot(direction)] = true;
        self.cells[there].open[wall_slot(direction.opposite())] = true;
        true
    }

    pub fn is_open(&self, x: usize, y: usize, direction: Direction) -> bool {
        x < self.width
            && y < self.height
            && self.cells[self.slot(x, y)].open[wall_slot(direction)]
    }

    /// Number of tree edges (each open wall counted once)
    pub fn edge_count(&self) -> usize {
        let doubled: usize = self
            .cells
            .iter()
            .map(|cell| cell.open.iter().filter(|open| **open).count())
            .sum();
        doubled / 2
    }

    /// True when every super-cell is reachable and there are no loops
    pub fn is_spanning_tree(&self) -> bool {
        let total = self.width * self.height;
        if total == 0 || self.edge_count() != total - 1 {
            return false;
        }

        let mut reached = vec![false; total];
        let mut stack = vec![(0usize, 0usize)];
        reached[0] = true;
        let mut count = 1;

        while let Some((x, y)) = stack.pop() {
            for direction in Direction::ALL {
                if !self.is_open(x, y, direction) {
                    continue;
                }
                if let Some((nx, ny)) = self.neighbor(x, y, direction) {
                    let slot = self.slot(nx, ny);
                    if !reached[slot] {
                        reached[slot] = true;
                        count += 1;
                        stack.push((nx, ny));
                    }
                }
            }
        }

        count == total
    }

    /// Expand into a tour of the doubled-resolution board starting at (0, 0)
    ///
    /// # Panics
    ///
    /// Panics if the tree does not reach every super-cell.
    pub fn expand(&self) -> HamiltonianCycle {
        assert!(
            self.is_spanning_tree(),
            "tree does not span the {}x{} super-grid",
            self.width,
            self.height
        );
        let width = self.width * 2;
        let height = self.height * 2;
        let mut cells = Vec::with_capacity(width * height);
        let mut current = Position::new(0, 0);

        for _ in 0..width * height {
            cells.push(current);
            let quadrant = Quadrant::of(current);
            let (sx, sy) = (current.x as usize / 2, current.y as usize / 2);
            let step = if self.is_open(sx, sy, quadrant.escape()) {
                quadrant.escape()
            } else {
                quadrant.rotation()
            };
            current = current.moved_in_direction(step);
        }
        debug_assert_eq!(cells.first(), Some(&current), "tour does not close");

        HamiltonianCycle {
            cells,
            width,
            height,
        }
    }
}

/// Builds a fresh random cycle for a board of fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleGenerator {
    grid_width: usize,
    grid_height: usize,
}

impl CycleGenerator {
    /// Both dimensions must be even and at least 2
    pub fn new(grid_width: usize, grid_height: usize) -> Result<Self, ConfigError> {
        if grid_width < 2 || grid_height < 2 {
            return Err(ConfigError::GridTooSmall {
                width: grid_width,
                height: grid_height,
            });
        }
        if grid_width % 2 != 0 || grid_height % 2 != 0 {
            return Err(ConfigError::OddDimensions {
                width: grid_width,
                height: grid_height,
            });
        }
        Ok(Self {
            grid_width,
            grid_height,
        })
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Carve a new tree and expand it. Deterministic for a given RNG state.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> HamiltonianCycle {
        SpanningTree::carve(self.grid_width / 2, self.grid_height / 2, rng).expand()
    }
}
