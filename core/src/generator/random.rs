use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Generation strategy that can optionally keep the start cell safe or empty around it, but is
/// otherwise purely random. The resulting level is fully covered.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLevelGenerator {
    seed: u64,
    start: Coord2,
    start_cell: StartCell,
}

impl RandomLevelGenerator {
    pub fn new(seed: u64, start: Coord2, start_cell: StartCell) -> Self {
        Self {
            seed,
            start,
            start_cell,
        }
    }
}

impl LevelGenerator for RandomLevelGenerator {
    fn generate(self, size: Coord2, bombs: CellCount) -> LevelData {
        use StartCell::{AlwaysZero, Random, SimpleSafe};
        use rand::prelude::*;

        let total_cells = mult(size.0, size.1);
        let bombs = if bombs > total_cells {
            log::warn!(
                "Field too small, requested {} bombs but only fits {}",
                bombs,
                total_cells
            );
            total_cells
        } else {
            bombs
        };

        let start_in_bounds = self.start.0 < size.0 && self.start.1 < size.1;
        let block_cells = NeighborIter::block(self.start, size).count() as CellCount;
        let actual_start_cell = match self.start_cell {
            Random => Random,
            SimpleSafe | AlwaysZero if !start_in_bounds => {
                log::warn!(
                    "Start cell {:?} is outside the field, fallback to random",
                    self.start
                );
                Random
            }
            SimpleSafe | AlwaysZero if bombs + 1 > total_cells => {
                log::warn!("Cannot make start cell safe, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if bombs + block_cells > total_cells => {
                log::warn!("Cannot make start cell zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        // cells that are taken, either by a bomb or because they must stay free
        let mut taken: Array2<bool> = Array2::default(size.to_nd_index());
        let mut free_cells = match actual_start_cell {
            Random => total_cells,
            SimpleSafe => {
                taken[self.start.to_nd_index()] = true;
                total_cells - 1
            }
            AlwaysZero => {
                for coords in NeighborIter::block(self.start, size) {
                    taken[coords.to_nd_index()] = true;
                }
                total_cells - block_cells
            }
        };

        let width = usize::from(size.0);
        let mut placed = Vec::with_capacity(bombs as usize);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        while placed.len() < bombs as usize && free_cells > 0 {
            let place = rng.random_range(0..free_cells) as usize;
            let picked = taken
                .iter_mut()
                .enumerate()
                .filter(|(_, is_taken)| !**is_taken)
                .nth(place);

            if let Some((offset, is_taken)) = picked {
                *is_taken = true;
                free_cells -= 1;
                // offsets fit in `Coord` since they come from a field of `Coord2` size
                placed.push(((offset % width) as Coord, (offset / width) as Coord));
            }
        }

        if placed.len() != bombs as usize {
            log::warn!(
                "Generated level count mismatch, actual: {}, requested: {}",
                placed.len(),
                bombs
            );
        }

        LevelData::fully_covered(size, placed)
    }
}
