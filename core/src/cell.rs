use bitflags::bitflags;
use core::fmt;
use serde::{Deserialize, Serialize};

bitflags! {
    /// State bits stored in the high nibble of a [`Cell`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CellFlags: u8 {
        const COVERED       = 0x10;
        const CONTAINS_BOMB = 0x20;
        const FLAGGED       = 0x40;
    }
}

const NEARBY_MASK: u8 = 0x0F;

/// Packed per-cell state: flag bits in the high nibble, nearby bomb count in the low one.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Cell(u8);

impl Cell {
    /// Largest count the nibble can hold.
    pub const MAX_NEARBY: u8 = NEARBY_MASK;

    pub const fn flags(self) -> CellFlags {
        CellFlags::from_bits_truncate(self.0)
    }

    pub const fn is_covered(self) -> bool {
        self.0 & CellFlags::COVERED.bits() != 0
    }

    pub const fn is_flagged(self) -> bool {
        self.0 & CellFlags::FLAGGED.bits() != 0
    }

    pub const fn contains_bomb(self) -> bool {
        self.0 & CellFlags::CONTAINS_BOMB.bits() != 0
    }

    pub const fn nearby_bomb_count(self) -> u8 {
        self.0 & NEARBY_MASK
    }

    pub const fn is_covered_and_unflagged(self) -> bool {
        let mask = CellFlags::COVERED.bits() | CellFlags::FLAGGED.bits();
        self.0 & mask == CellFlags::COVERED.bits()
    }

    /// Covered, not flagged and without bombs around: a cell the flood fill may spread through.
    pub const fn is_open_candidate(self) -> bool {
        let mask = CellFlags::COVERED.bits() | CellFlags::FLAGGED.bits() | NEARBY_MASK;
        self.0 & mask == CellFlags::COVERED.bits()
    }

    pub(crate) fn insert(&mut self, flags: CellFlags) {
        self.0 |= flags.bits();
    }

    pub(crate) fn remove(&mut self, flags: CellFlags) {
        self.0 &= !flags.bits();
    }

    pub(crate) fn toggle(&mut self, flags: CellFlags) {
        self.0 ^= flags.bits();
    }

    /// Returns the new count, or `None` if it would leave the nibble.
    pub(crate) fn adjust_nearby(&mut self, delta: i8) -> Option<u8> {
        let count = self.nearby_bomb_count().checked_add_signed(delta)?;
        if count > NEARBY_MASK {
            return None;
        }
        self.0 = (self.0 & !NEARBY_MASK) | count;
        Some(count)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("flags", &self.flags())
            .field("nearby", &self.nearby_bomb_count())
            .finish()
    }
}
