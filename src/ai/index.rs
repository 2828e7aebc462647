use crate::game::Position;

use super::cycle::HamiltonianCycle;

/// Inverse of a [`HamiltonianCycle`]: board cell to its position on the tour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleIndex {
    width: usize,
    height: usize,
    slots: Vec<Option<usize>>,
}

impl CycleIndex {
    pub fn build(cycle: &HamiltonianCycle) -> Self {
        let (width, height) = (cycle.width(), cycle.height());
        let mut slots = vec![None; width * height];
        for (index, cell) in cycle.cells().iter().enumerate() {
            slots[cell.y as usize * width + cell.x as usize] = Some(index);
        }
        Self {
            width,
            height,
            slots,
        }
    }

    /// Position of `cell` on the tour, or `None` if it is off the board
    pub fn get(&self, cell: Position) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.slots[y * self.width + x]
    }

    /// Position of `cell` on the tour
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not on the tour. The tour covers the whole board,
    /// so this only happens for off-board cells.
    pub fn lookup(&self, cell: Position) -> usize {
        self.get(cell).unwrap_or_else(|| {
            panic!(
                "cell {cell:?} is not on the {}x{} cycle",
                self.width, self.height
            )
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::CycleGenerator;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_lookup_inverts_cycle() {
        let generator = CycleGenerator::new(8, 8).unwrap();
        for seed in 0..100 {
            let cycle = generator.generate(&mut StdRng::seed_from_u64(seed));
            let index = CycleIndex::build(&cycle);

            assert_eq!(index.len(), 64);
            for (i, cell) in cycle.cells().iter().enumerate() {
                assert_eq!(index.lookup(*cell), i);
            }
        }
    }

    #[test]
    fn test_rectangular_board() {
        let generator = CycleGenerator::new(6, 4).unwrap();
        let cycle = generator.generate(&mut StdRng::seed_from_u64(3));
        let index = CycleIndex::build(&cycle);

        for i in 0..cycle.len() {
            assert_eq!(index.get(cycle.get(i)), Some(i));
        }
        assert!(index.get(Position::new(5, 3)).is_some());
        assert_eq!(index.get(Position::new(3, 5)), None);
    }

    #[test]
    fn test_off_board_cells() {
        let generator = CycleGenerator::new(8, 8).unwrap();
        let index = CycleIndex::build(&generator.generate(&mut StdRng::seed_from_u64(0)));

        assert_eq!(index.get(Position::new(-1, 0)), None);
        assert_eq!(index.get(Position::new(0, -1)), None);
        assert_eq!(index.get(Position::new(8, 0)), None);
        assert_eq!(index.get(Position::new(0, 8)), None);
    }

    #[test]
    #[should_panic(expected = "is not on the 8x8 cycle")]
    fn test_lookup_off_board_panics() {
        let generator = CycleGenerator::new(8, 8).unwrap();
        let index = CycleIndex::build(&generator.generate(&mut StdRng::seed_from_u64(0)));
        index.lookup(Position::new(8, 8));
    }
}
