use serde::{Deserialize, Serialize};

/// Single coordinate axis used for field width, height, and positions.
pub type Coord = u16;

/// Count type used for bomb counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(col, row)`.
pub type Coord2 = (Coord, Coord);

/// Linear cell offset, `col + row * width`.
pub type CellIndex = usize;

/// Opaque identifier of a bomb, handed back to the presentation layer on detonation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(pub u32);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Cells are stored row-major, so `(col, row)` maps to `[row, col]`.
impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const BLOCK_DISPLACEMENTS: [(isize, isize); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates a fixed stencil of displacements around `center`, skipping cells outside `bounds`.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    stencil: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    /// The 8 surrounding cells.
    pub fn neighbors(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            stencil: &DISPLACEMENTS,
            index: 0,
        }
    }

    /// The 3×3 block including `center` itself.
    pub fn block(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            stencil: &BLOCK_DISPLACEMENTS,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.stencil.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn neighbors_are_clipped_at_corners() {
        let found: Vec<_> = NeighborIter::neighbors((0, 0), (3, 3)).collect();
        assert_eq!(found, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn block_includes_center() {
        let found: Vec<_> = NeighborIter::block((2, 1), (3, 2)).collect();
        assert_eq!(found, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn interior_has_full_neighborhood() {
        assert_eq!(NeighborIter::neighbors((1, 1), (3, 3)).count(), 8);
        assert_eq!(NeighborIter::block((1, 1), (3, 3)).count(), 9);
    }

    #[test]
    fn nd_index_is_row_major() {
        assert_eq!((4, 2).to_nd_index(), [2, 4]);
    }
}
