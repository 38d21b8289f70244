use core::fmt::{self, Write};
use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// New nearby-bomb count of a single cell after a bomb was placed or removed next to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountChange {
    pub coords: Coord2,
    pub count: u8,
}

/// All count transitions caused by one placement or removal, at most 8.
pub type CountChanges = SmallVec<[CountChange; 8]>;

/// Fixed-size field of packed cells plus the bomb identifiers of live bombs.
///
/// Every query and mutation validates its coordinates and fails with
/// [`FieldError::OutOfBounds`] instead of clamping.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: Coord2,
    cells: Array2<Cell>,
    bombs: HashMap<CellIndex, BombId>,
}

impl Grid {
    pub fn new(size: Coord2) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(FieldError::InvalidSize(size));
        }

        Ok(Self {
            size,
            cells: Array2::default(size.to_nd_index()),
            bombs: HashMap::new(),
        })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn in_bounds(&self, (col, row): Coord2) -> bool {
        col < self.size.0 && row < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(FieldError::OutOfBounds(coords))
        }
    }

    pub fn index_of(&self, coords: Coord2) -> Result<CellIndex> {
        let coords = self.validate_coords(coords)?;
        Ok(self.index_unchecked(coords))
    }

    pub fn coords_of(&self, index: CellIndex) -> Option<Coord2> {
        let width = usize::from(self.size.0);
        let col: Coord = (index % width).try_into().ok()?;
        let row: Coord = (index / width).try_into().ok()?;
        self.in_bounds((col, row)).then_some((col, row))
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cell_at(coords))
    }

    pub fn is_covered(&self, coords: Coord2) -> Result<bool> {
        self.cell(coords).map(Cell::is_covered)
    }

    pub fn is_flagged(&self, coords: Coord2) -> Result<bool> {
        self.cell(coords).map(Cell::is_flagged)
    }

    pub fn contains_bomb(&self, coords: Coord2) -> Result<bool> {
        self.cell(coords).map(Cell::contains_bomb)
    }

    pub fn nearby_bomb_count(&self, coords: Coord2) -> Result<u8> {
        self.cell(coords).map(Cell::nearby_bomb_count)
    }

    pub fn bomb_id(&self, coords: Coord2) -> Result<Option<BombId>> {
        let index = self.index_of(coords)?;
        Ok(self.bombs.get(&index).copied())
    }

    pub fn bomb_count(&self) -> usize {
        self.bombs.len()
    }

    pub fn bombs(&self) -> impl Iterator<Item = (CellIndex, BombId)> + '_ {
        self.bombs.iter().map(|(&index, &id)| (index, id))
    }

    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_covered()).count()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::neighbors(coords, self.size)
    }

    pub fn iter_block(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::block(coords, self.size)
    }

    /// Arms a bomb and bumps the count of every neighbor.
    pub fn place_bomb(&mut self, coords: Coord2, id: BombId) -> Result<CountChanges> {
        let coords = self.validate_coords(coords)?;
        if self.cell_at(coords).contains_bomb() {
            return Err(FieldError::DuplicateBomb(coords));
        }

        let changes = self.adjust_area(coords, 1)?;
        self.cell_mut(coords).insert(CellFlags::CONTAINS_BOMB);
        self.bombs.insert(self.index_unchecked(coords), id);
        Ok(changes)
    }

    /// Disarms a bomb, returning its identifier and the neighbor count transitions.
    pub fn remove_bomb(&mut self, coords: Coord2) -> Result<(BombId, CountChanges)> {
        let coords = self.validate_coords(coords)?;
        let index = self.index_unchecked(coords);
        let id = match self.bombs.get(&index) {
            Some(&id) if self.cell_at(coords).contains_bomb() => id,
            _ => return Err(FieldError::NoBombPresent(coords)),
        };

        let changes = self.adjust_area(coords, -1)?;
        self.cell_mut(coords).remove(CellFlags::CONTAINS_BOMB);
        self.bombs.remove(&index);
        Ok((id, changes))
    }

    pub fn place_cover(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if self.cell_at(coords).is_covered() {
            return Err(FieldError::DuplicateCover(coords));
        }

        self.cell_mut(coords).insert(CellFlags::COVERED);
        Ok(())
    }

    /// Lifts the cover, returning `false` when there was none.
    pub fn uncover(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cell_mut(coords);
        if !cell.is_covered() {
            return Ok(false);
        }

        cell.remove(CellFlags::COVERED);
        Ok(true)
    }

    /// Flips the flag and returns the new state. Whether the cell may be flagged is up to the
    /// caller.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cell_mut(coords);
        cell.toggle(CellFlags::FLAGGED);
        Ok(cell.is_flagged())
    }

    /// Drops the flag, returning whether one was set.
    pub fn clear_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cell_mut(coords);
        let was_flagged = cell.is_flagged();
        cell.remove(CellFlags::FLAGGED);
        Ok(was_flagged)
    }

    /// Recounts every neighborhood from scratch and reports the first cell out of sync.
    pub fn check_nearby_counts(&self) -> Result<()> {
        let (width, height) = self.size;
        for row in 0..height {
            for col in 0..width {
                let coords = (col, row);
                let expected = self
                    .iter_neighbors(coords)
                    .filter(|&pos| self.cell_at(pos).contains_bomb())
                    .count();

                if usize::from(self.cell_at(coords).nearby_bomb_count()) != expected {
                    return Err(FieldError::CountMismatch(coords));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub(crate) fn index_unchecked(&self, (col, row): Coord2) -> CellIndex {
        usize::from(col) + usize::from(row) * usize::from(self.size.0)
    }

    fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Applies `delta` to all neighbor counts, or to none of them if any would overflow.
    fn adjust_area(&mut self, coords: Coord2, delta: i8) -> Result<CountChanges> {
        let overflow = self
            .iter_neighbors(coords)
            .find(|&pos| self.cell_at(pos).adjust_nearby(delta).is_none());
        if let Some(pos) = overflow {
            return Err(FieldError::CountOverflow(pos));
        }

        let mut changes = CountChanges::new();
        for pos in self.iter_neighbors(coords) {
            let count = self
                .cell_mut(pos)
                .adjust_nearby(delta)
                .ok_or(FieldError::CountOverflow(pos))?;
            changes.push(CountChange { coords: pos, count });
        }
        Ok(changes)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.cells.outer_iter().enumerate() {
            if row_index > 0 {
                f.write_char('\n')?;
            }

            for &cell in row.iter() {
                let symbol = if cell.is_flagged() {
                    'F'
                } else if cell.is_covered() {
                    '#'
                } else if cell.contains_bomb() {
                    '*'
                } else {
                    match cell.nearby_bomb_count() {
                        0 => '.',
                        count => char::from_digit(count.into(), 16).unwrap_or('?'),
                    }
                };
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn counts(grid: &Grid) -> Vec<u8> {
        let (width, height) = grid.size();
        (0..height)
            .flat_map(|row| (0..width).map(move |col| (col, row)))
            .map(|coords| grid.nearby_bomb_count(coords).unwrap())
            .collect()
    }

    #[test]
    fn rejects_empty_size() {
        assert_eq!(Grid::new((0, 3)), Err(FieldError::InvalidSize((0, 3))));
        assert_eq!(Grid::new((3, 0)), Err(FieldError::InvalidSize((3, 0))));
    }

    #[test]
    fn index_is_col_plus_row_times_width() {
        let grid = Grid::new((4, 3)).unwrap();

        assert_eq!(grid.index_of((3, 2)), Ok(11));
        assert_eq!(grid.coords_of(11), Some((3, 2)));
        assert_eq!(grid.coords_of(12), None);
        assert_eq!(grid.index_of((4, 0)), Err(FieldError::OutOfBounds((4, 0))));
    }

    #[test]
    fn out_of_bounds_is_never_clamped() {
        let mut grid = Grid::new((2, 2)).unwrap();

        assert!(!grid.in_bounds((2, 0)));
        assert_eq!(grid.is_covered((0, 2)), Err(FieldError::OutOfBounds((0, 2))));
        assert_eq!(
            grid.place_bomb((2, 2), BombId(0)),
            Err(FieldError::OutOfBounds((2, 2)))
        );
        assert_eq!(grid.place_cover((5, 0)), Err(FieldError::OutOfBounds((5, 0))));
        assert_eq!(grid.bomb_count(), 0);
    }

    #[test]
    fn place_bomb_updates_clipped_neighborhood() {
        let mut grid = Grid::new((3, 3)).unwrap();

        let changes = grid.place_bomb((0, 0), BombId(7)).unwrap();

        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|change| change.count == 1));
        assert_eq!(counts(&grid), [0, 1, 0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(grid.contains_bomb((0, 0)), Ok(true));
        assert_eq!(grid.bomb_id((0, 0)), Ok(Some(BombId(7))));
        assert!(grid.check_nearby_counts().is_ok());
    }

    #[test]
    fn bomb_does_not_count_itself() {
        let mut grid = Grid::new((3, 3)).unwrap();
        grid.place_bomb((1, 1), BombId(0)).unwrap();
        grid.place_bomb((2, 1), BombId(1)).unwrap();

        assert_eq!(grid.nearby_bomb_count((1, 1)), Ok(1));
        assert_eq!(grid.nearby_bomb_count((2, 1)), Ok(1));
        assert_eq!(grid.nearby_bomb_count((2, 0)), Ok(2));
        assert_eq!(grid.nearby_bomb_count((0, 0)), Ok(1));
    }

    #[test]
    fn duplicate_placements_fail() {
        let mut grid = Grid::new((2, 2)).unwrap();
        grid.place_bomb((1, 1), BombId(0)).unwrap();
        grid.place_cover((1, 1)).unwrap();

        assert_eq!(
            grid.place_bomb((1, 1), BombId(1)),
            Err(FieldError::DuplicateBomb((1, 1)))
        );
        assert_eq!(grid.place_cover((1, 1)), Err(FieldError::DuplicateCover((1, 1))));
        assert_eq!(grid.nearby_bomb_count((0, 0)), Ok(1));
        assert_eq!(grid.bomb_id((1, 1)), Ok(Some(BombId(0))));
    }

    #[test]
    fn place_then_remove_restores_counts() {
        let mut grid = Grid::new((4, 4)).unwrap();
        grid.place_bomb((1, 1), BombId(0)).unwrap();
        grid.place_bomb((3, 3), BombId(1)).unwrap();
        let before = counts(&grid);

        grid.place_bomb((2, 2), BombId(2)).unwrap();
        assert_ne!(counts(&grid), before);
        let (id, changes) = grid.remove_bomb((2, 2)).unwrap();

        assert_eq!(id, BombId(2));
        assert_eq!(changes.len(), 8);
        assert_eq!(counts(&grid), before);
        assert_eq!(grid.bomb_id((2, 2)), Ok(None));
        assert_eq!(grid.bomb_count(), 2);
    }

    #[test]
    fn remove_without_bomb_fails() {
        let mut grid = Grid::new((2, 2)).unwrap();

        assert_eq!(grid.remove_bomb((0, 1)), Err(FieldError::NoBombPresent((0, 1))));
        assert_eq!(counts(&grid), [0, 0, 0, 0]);
    }

    #[test]
    fn uncover_reports_change_once() {
        let mut grid = Grid::new((2, 1)).unwrap();
        grid.place_cover((0, 0)).unwrap();

        assert_eq!(grid.uncover((0, 0)), Ok(true));
        assert_eq!(grid.is_covered((0, 0)), Ok(false));
        assert_eq!(grid.uncover((0, 0)), Ok(false));
        assert_eq!(grid.uncover((1, 0)), Ok(false));
    }

    #[test]
    fn flags_toggle_and_clear() {
        let mut grid = Grid::new((1, 1)).unwrap();
        grid.place_cover((0, 0)).unwrap();

        assert_eq!(grid.toggle_flag((0, 0)), Ok(true));
        assert_eq!(grid.is_flagged((0, 0)), Ok(true));
        assert_eq!(grid.toggle_flag((0, 0)), Ok(false));
        grid.toggle_flag((0, 0)).unwrap();
        assert_eq!(grid.clear_flag((0, 0)), Ok(true));
        assert_eq!(grid.clear_flag((0, 0)), Ok(false));
        assert_eq!(grid.is_covered((0, 0)), Ok(true));
    }

    #[test]
    fn check_nearby_counts_spots_a_stale_cell() {
        let mut grid = Grid::new((3, 3)).unwrap();
        grid.place_bomb((1, 1), BombId(0)).unwrap();
        assert!(grid.check_nearby_counts().is_ok());

        grid.cell_mut((0, 2)).adjust_nearby(1);

        assert_eq!(
            grid.check_nearby_counts(),
            Err(FieldError::CountMismatch((0, 2)))
        );
    }

    #[test]
    fn display_draws_rows() {
        let mut grid = Grid::new((3, 2)).unwrap();
        grid.place_bomb((0, 0), BombId(0)).unwrap();
        grid.place_cover((2, 0)).unwrap();
        grid.place_cover((2, 1)).unwrap();
        grid.toggle_flag((2, 1)).unwrap();

        assert_eq!(grid.to_string(), "*1#\n11F");
    }
}
