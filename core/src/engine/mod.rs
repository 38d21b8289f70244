use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::*;

mod cascade;
mod scanfill;

/// Drives uncovering, flagging and chain reactions on a [`Grid`].
///
/// Every top-level operation runs to completion and then flushes the covers it lifted to the
/// observer in one batch. The work queues are reused between calls and never carry state from
/// one operation to the next.
#[derive(Clone, Debug)]
pub struct RevealEngine<O = EventQueue> {
    grid: Grid,
    observer: O,
    /// Covers lifted by the current operation, flushed at its end.
    pending: Vec<CellIndex>,
    /// Flood-fill seeds.
    seeds: VecDeque<Coord2>,
    /// Bombs already removed from the grid whose blast has yet to be applied, with their wave.
    fuses: VecDeque<(Coord2, u16)>,
}

impl<O: FieldObserver> RevealEngine<O> {
    pub fn new(grid: Grid, observer: O) -> Self {
        Self {
            grid,
            observer,
            pending: Vec::with_capacity(32),
            seeds: VecDeque::with_capacity(32),
            fuses: VecDeque::new(),
        }
    }

    /// Builds the grid from level data. Bombs get `BombId(n)` by their position in the level's
    /// bomb list; any invalid placement aborts the whole setup.
    pub fn setup(level: &LevelData, mut observer: O) -> Result<Self> {
        let mut grid = Grid::new(level.size)?;

        for (n, &coords) in level.bombs.iter().enumerate() {
            let id = BombId(n.try_into().map_err(|_| FieldError::MalformedLevel)?);
            for change in grid.place_bomb(coords, id)? {
                observer.notify_nearby_count_changed(change.coords, change.count);
            }
        }

        for &coords in &level.covers {
            grid.place_cover(coords)?;
        }

        log::debug!(
            "Field {:?} set up with {} bombs and {} covers",
            level.size,
            grid.bomb_count(),
            level.covers.len()
        );
        Ok(Self::new(grid, observer))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_parts(self) -> (Grid, O) {
        (self.grid, self.observer)
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        self.grid.in_bounds(coords)
    }

    pub fn is_covered(&self, coords: Coord2) -> Result<bool> {
        self.grid.is_covered(coords)
    }

    pub fn is_flagged(&self, coords: Coord2) -> Result<bool> {
        self.grid.is_flagged(coords)
    }

    pub fn contains_bomb(&self, coords: Coord2) -> Result<bool> {
        self.grid.contains_bomb(coords)
    }

    pub fn nearby_bomb_count(&self, coords: Coord2) -> Result<u8> {
        self.grid.nearby_bomb_count(coords)
    }

    /// Primary action on a cell: reveal it, unless it is flagged.
    pub fn on_left_click(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.reveal(coords)
    }

    /// Secondary action on a cell: toggle its flag, only while it is covered.
    pub fn on_right_click(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.toggle_flag(coords)
    }

    /// Uncovers a cell, flood-filling from it when it has no bombs around and detonating it when
    /// it holds one. Flagged and already uncovered cells are left alone.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        let cell = self.grid.cell_at(coords);

        if !cell.is_covered_and_unflagged() {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.contains_bomb() {
            return self.explode_bomb_at(coords);
        }

        let result = if cell.nearby_bomb_count() > 0 {
            self.uncover(coords).map(|_| ())
        } else {
            self.scan_fill(coords)
        };
        let cells = self.flush();
        result?;

        log::debug!("Revealed {} cells from {:?}", cells, coords);
        Ok(RevealOutcome::Revealed { cells })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if !self.grid.cell_at(coords).is_covered() {
            return Ok(MarkOutcome::NoChange);
        }

        let flagged = self.grid.toggle_flag(coords)?;
        self.observer
            .notify_flag_changed(self.grid.index_unchecked(coords), flagged);

        Ok(if flagged {
            MarkOutcome::Flagged
        } else {
            MarkOutcome::Unflagged
        })
    }

    /// Detonates the bomb at `coords` and everything it sets off. A cell without a live bomb,
    /// including one whose bomb already went off, is a no-op.
    pub fn explode_bomb_at(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if !self.grid.cell_at(coords).contains_bomb() {
            return Ok(RevealOutcome::NoChange);
        }

        let result = self.detonate(coords);
        let cells = self.flush();
        let bombs = result?;

        log::debug!(
            "Detonation at {:?} removed {} bombs and {} covers",
            coords,
            bombs,
            cells
        );
        Ok(RevealOutcome::Detonated { bombs, cells })
    }

    /// Lifts the cover and queues it for the next flush.
    fn uncover(&mut self, coords: Coord2) -> Result<bool> {
        let changed = self.grid.uncover(coords)?;
        if changed {
            self.pending.push(self.grid.index_unchecked(coords));
        }
        Ok(changed)
    }

    fn flush(&mut self) -> usize {
        let flushed = self.pending.len();
        for index in self.pending.drain(..) {
            self.observer.notify_cover_removed(index);
        }
        flushed
    }
}
