use crate::*;
pub use random::*;

mod random;

pub trait LevelGenerator {
    fn generate(self, size: Coord2, bombs: CellCount) -> LevelData;
}

/// What the generator guarantees about the first cell the player is expected to open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartCell {
    Random,
    SimpleSafe,
    AlwaysZero,
}
