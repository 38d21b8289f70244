use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Presentation-side listener. Every method defaults to doing nothing, so implementors only
/// override what they render.
pub trait FieldObserver {
    /// A cover was lifted; called once per cell when the reveal batch is flushed.
    fn notify_cover_removed(&mut self, index: CellIndex) {
        let _ = index;
    }

    /// A bomb was removed from the field by a blast. `wave` is 0 for the bomb that started the
    /// chain and grows by one for every bomb set off by the previous wave.
    fn notify_bomb_detonated(&mut self, index: CellIndex, bomb: BombId, wave: u16) {
        let _ = (index, bomb, wave);
    }

    fn notify_nearby_count_changed(&mut self, coords: Coord2, count: u8) {
        let _ = (coords, count);
    }

    fn notify_flag_changed(&mut self, index: CellIndex, flagged: bool) {
        let _ = (index, flagged);
    }
}

impl FieldObserver for () {}

impl<O: FieldObserver + ?Sized> FieldObserver for &mut O {
    fn notify_cover_removed(&mut self, index: CellIndex) {
        (**self).notify_cover_removed(index)
    }

    fn notify_bomb_detonated(&mut self, index: CellIndex, bomb: BombId, wave: u16) {
        (**self).notify_bomb_detonated(index, bomb, wave)
    }

    fn notify_nearby_count_changed(&mut self, coords: Coord2, count: u8) {
        (**self).notify_nearby_count_changed(coords, count)
    }

    fn notify_flag_changed(&mut self, index: CellIndex, flagged: bool) {
        (**self).notify_flag_changed(index, flagged)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldEvent {
    CoverRemoved(CellIndex),
    BombDetonated {
        index: CellIndex,
        bomb: BombId,
        wave: u16,
    },
    NearbyCountChanged {
        coords: Coord2,
        count: u8,
    },
    FlagChanged {
        index: CellIndex,
        flagged: bool,
    },
}

/// Observer that records events for the caller to drain after each operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQueue {
    events: Vec<FieldEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[FieldEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> impl Iterator<Item = FieldEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FieldObserver for EventQueue {
    fn notify_cover_removed(&mut self, index: CellIndex) {
        self.events.push(FieldEvent::CoverRemoved(index));
    }

    fn notify_bomb_detonated(&mut self, index: CellIndex, bomb: BombId, wave: u16) {
        self.events.push(FieldEvent::BombDetonated { index, bomb, wave });
    }

    fn notify_nearby_count_changed(&mut self, coords: Coord2, count: u8) {
        self.events.push(FieldEvent::NearbyCountChanged { coords, count });
    }

    fn notify_flag_changed(&mut self, index: CellIndex, flagged: bool) {
        self.events.push(FieldEvent::FlagChanged { index, flagged });
    }
}
