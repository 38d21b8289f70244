use crate::*;

use super::RevealEngine;

impl<O: FieldObserver> RevealEngine<O> {
    /// Row-scan flood fill starting from a covered cell with no bombs around.
    ///
    /// Each seed is first walked left over covered zero cells, then the row is uncovered going
    /// right. The walk stops at flags, at uncovered cells and after the first numbered cell, so
    /// the region never grows past its ring of numbers. Rows above and below are seeded once per
    /// run of zero cells; numbers found there are uncovered directly.
    pub(super) fn scan_fill(&mut self, start: Coord2) -> Result<()> {
        let (width, height) = self.grid.size();
        self.seeds.clear();
        self.seeds.push_back(start);

        while let Some((seed_col, row)) = self.seeds.pop_front() {
            log::trace!("Scan-fill seed at {:?}", (seed_col, row));

            let mut col = seed_col;
            while col > 0 {
                let left = (col - 1, row);
                let cell = self.grid.cell_at(left);

                if cell.is_flagged() {
                    break;
                }

                if cell.nearby_bomb_count() > 0 {
                    if cell.is_covered() {
                        self.uncover(left)?;
                    }
                    self.uncover_corners(left)?;
                    break;
                }

                if !cell.is_covered() {
                    break;
                }

                col -= 1;
            }

            let mut above_run = false;
            let mut below_run = false;

            while col < width && self.grid.cell_at((col, row)).is_covered_and_unflagged() {
                self.uncover((col, row))?;

                if row > 0 {
                    above_run = self.visit_adjacent((col, row - 1), above_run)?;
                }

                if row + 1 < height {
                    below_run = self.visit_adjacent((col, row + 1), below_run)?;
                }

                if self.grid.cell_at((col, row)).nearby_bomb_count() > 0 {
                    break;
                }

                col += 1;
            }
        }

        Ok(())
    }

    /// Checks one cell above or below the scan row. Returns whether a run of zero cells
    /// continues there, in which case it was already seeded.
    fn visit_adjacent(&mut self, coords: Coord2, in_run: bool) -> Result<bool> {
        let cell = self.grid.cell_at(coords);

        if in_run {
            return Ok(cell.is_open_candidate());
        }

        if !cell.is_covered_and_unflagged() {
            return Ok(false);
        }

        if cell.nearby_bomb_count() > 0 {
            self.uncover(coords)?;
            Ok(false)
        } else {
            self.seeds.push_back(coords);
            Ok(true)
        }
    }

    /// `number` is where the left walk stopped; the zero cell it came from sits at its right.
    /// The diagonals of that zero cell in the column of `number` are never visited by the
    /// row scan when the cell beside them is itself a number.
    fn uncover_corners(&mut self, number: Coord2) -> Result<()> {
        let (col, row) = number;

        if row > 0 {
            self.uncover_corner((col, row - 1), (col + 1, row - 1))?;
        }

        if row + 1 < self.grid.height() {
            self.uncover_corner((col, row + 1), (col + 1, row + 1))?;
        }

        Ok(())
    }

    fn uncover_corner(&mut self, corner: Coord2, beside: Coord2) -> Result<()> {
        if self.grid.cell_at(beside).nearby_bomb_count() == 0 {
            return Ok(());
        }

        let cell = self.grid.cell_at(corner);
        if !cell.is_covered_and_unflagged() {
            return Ok(());
        }

        if cell.nearby_bomb_count() > 0 {
            self.uncover(corner)?;
        } else {
            self.seeds.push_back(corner);
        }

        Ok(())
    }
}
