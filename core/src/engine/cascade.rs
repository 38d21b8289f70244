use crate::*;

use super::RevealEngine;

impl<O: FieldObserver> RevealEngine<O> {
    /// Sets off the bomb at `origin` and every bomb caught in the blasts that follow, returning
    /// how many were removed.
    ///
    /// A bomb leaves the grid, and its neighbors lose it from their counts, before its blast is
    /// applied, so no bomb can be queued twice. Blasts cover the clipped 3×3 block around the
    /// bomb: covered cells there are uncovered whatever they hold, and bombs there join the
    /// next wave.
    pub(super) fn detonate(&mut self, origin: Coord2) -> Result<usize> {
        self.fuses.clear();
        self.disarm(origin, 0)?;
        let mut bombs = 1;

        while let Some((center, wave)) = self.fuses.pop_front() {
            log::trace!("Blast at {:?}, wave {}", center, wave);

            for pos in self.grid.iter_block(center) {
                let cell = self.grid.cell_at(pos);

                if cell.contains_bomb() {
                    self.disarm(pos, wave.saturating_add(1))?;
                    bombs += 1;
                }

                if cell.is_covered() {
                    if self.grid.clear_flag(pos)? {
                        self.observer
                            .notify_flag_changed(self.grid.index_unchecked(pos), false);
                    }
                    self.uncover(pos)?;
                }
            }
        }

        Ok(bombs)
    }

    fn disarm(&mut self, coords: Coord2, wave: u16) -> Result<()> {
        let index = self.grid.index_unchecked(coords);
        let (bomb, changes) = self.grid.remove_bomb(coords)?;

        self.observer.notify_bomb_detonated(index, bomb, wave);
        for change in changes {
            self.observer
                .notify_nearby_count_changed(change.coords, change.count);
        }

        self.fuses.push_back((coords, wave));
        Ok(())
    }
}
