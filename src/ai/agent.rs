//! Autopilot that follows a Hamiltonian cycle and cuts corners when it is safe
//!
//! Each tick the agent either takes a shortcut toward the food or steps to
//! the next cell of its cycle. A shortcut is only allowed while the snake is
//! shorter than half the board, and only if the stretch of cycle between the
//! new head and the current tail is free of body segments. The tail is
//! treated as stationary for that check.

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace};

use crate::game::{ConfigError, Direction, GameConfig, GameState, Position};

use super::{
    cycle::{CycleGenerator, HamiltonianCycle},
    index::CycleIndex,
};

/// How a move was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// Left the cycle to get closer to the food
    Shortcut,
    /// Stepped to the next cell of the cycle
    Follow,
}

/// A move together with where it leads on the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub kind: DecisionKind,
    /// Cycle index of the cell the head moves to
    pub target_index: usize,
}

pub struct HamiltonianAgent {
    generator: CycleGenerator,
    cycle: HamiltonianCycle,
    index: CycleIndex,
    shortcut_threshold: usize,
    rng: StdRng,
}

impl HamiltonianAgent {
    /// Create an agent with a freshly generated cycle
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create an agent whose cycles are reproducible
    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: &GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = CycleGenerator::new(config.grid_width, config.grid_height)?;
        let cycle = generator.generate(&mut rng);
        let index = CycleIndex::build(&cycle);

        Ok(Self {
            generator,
            cycle,
            index,
            shortcut_threshold: config.shortcut_threshold(),
            rng,
        })
    }

    /// Use a specific cycle instead of a generated one
    ///
    /// # Panics
    ///
    /// Panics if the cycle does not match the configured board or is not a
    /// closed tour of it.
    pub fn with_cycle(config: &GameConfig, cycle: HamiltonianCycle) -> Result<Self, ConfigError> {
        let mut agent = Self::with_seed(config, 0)?;
        assert_eq!(
            (cycle.width(), cycle.height()),
            (config.grid_width, config.grid_height),
            "cycle size does not match the board"
        );
        if let Err(err) = cycle.validate() {
            panic!("not a hamiltonian cycle: {err}");
        }
        agent.index = CycleIndex::build(&cycle);
        agent.cycle = cycle;
        Ok(agent)
    }

    /// Throw away the current cycle and generate a new one
    pub fn reset(&mut self) {
        self.cycle = self.generator.generate(&mut self.rng);
        self.index = CycleIndex::build(&self.cycle);
        debug!(
            width = self.generator.grid_width(),
            height = self.generator.grid_height(),
            "generated new hamiltonian cycle"
        );
    }

    pub fn cycle(&self) -> &HamiltonianCycle {
        &self.cycle
    }

    pub fn index(&self) -> &CycleIndex {
        &self.index
    }

    pub fn shortcut_threshold(&self) -> usize {
        self.shortcut_threshold
    }

    /// Direction for the next tick
    pub fn decide(&self, state: &GameState) -> Direction {
        self.plan(state).direction
    }

    /// Choose the next move and report how it was chosen
    pub fn plan(&self, state: &GameState) -> Decision {
        let snake = &state.snake;
        let head_index = self.index.lookup(snake.head());

        let decision = if snake.len() < self.shortcut_threshold {
            self.best_shortcut(state)
                .unwrap_or_else(|| self.follow(snake.head(), head_index))
        } else {
            self.follow(snake.head(), head_index)
        };

        trace!(
            head = head_index,
            target = decision.target_index,
            kind = ?decision.kind,
            direction = ?decision.direction,
            "autopilot decision"
        );
        decision
    }

    /// Step to the next cell of the cycle
    fn follow(&self, head: Position, head_index: usize) -> Decision {
        let next = self.cycle.successor(head_index);
        let direction = head.direction_to(next).unwrap_or_else(|| {
            panic!("cycle step from {head:?} to {next:?} does not join neighbouring cells")
        });

        Decision {
            direction,
            kind: DecisionKind::Follow,
            target_index: (head_index + 1) % self.cycle.len(),
        }
    }

    /// Safe neighbour closest to the food in forward cycle distance
    fn best_shortcut(&self, state: &GameState) -> Option<Decision> {
        let snake = &state.snake;
        let head = snake.head();
        let tail_index = self.index.lookup(snake.tail());
        let food_index = self.index.lookup(state.food.position);
        let occupied = self.occupancy(state);

        let mut best: Option<(usize, Decision)> = None;

        for direction in Direction::ALL {
            if snake
                .direction
                .is_some_and(|current| current.is_opposite(direction))
            {
                continue;
            }

            let candidate = head.moved_in_direction(direction);
            let Some(candidate_index) = self.index.get(candidate) else {
                continue;
            };
            if occupied[candidate_index] {
                continue;
            }
            if !self.path_is_clear(&occupied, candidate_index, tail_index) {
                continue;
            }

            let distance = self.cycle.forward_distance(candidate_index, food_index);
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((
                    distance,
                    Decision {
                        direction,
                        kind: DecisionKind::Shortcut,
                        target_index: candidate_index,
                    },
                ));
            }
        }

        best.map(|(_, decision)| decision)
    }

    /// Body occupancy keyed by cycle index
    fn occupancy(&self, state: &GameState) -> Vec<bool> {
        let mut occupied = vec![false; self.cycle.len()];
        for segment in &state.snake.body {
            if let Some(index) = self.index.get(*segment) {
                occupied[index] = true;
            }
        }
        occupied
    }

    /// True if no body segment lies on the cycle from `from` up to, but not
    /// including, `to`
    fn path_is_clear(&self, occupied: &[bool], from: usize, to: usize) -> bool {
        let len = self.cycle.len();
        let mut index = from;
        while index != to {
            if occupied[index] {
                return false;
            }
            index = (index + 1) % len;
        }
        true
    }
}
