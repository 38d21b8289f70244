#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use grid::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod events;
mod generator;
mod grid;
mod types;

/// Board description handed to [`RevealEngine::setup`]: field size plus where the bombs and
/// covers go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub size: Coord2,
    #[serde(default)]
    pub bombs: Vec<Coord2>,
    #[serde(default)]
    pub covers: Vec<Coord2>,
}

impl LevelData {
    pub const fn new(size: Coord2, bombs: Vec<Coord2>, covers: Vec<Coord2>) -> Self {
        Self {
            size,
            bombs,
            covers,
        }
    }

    /// Every cell gets a cover.
    pub fn fully_covered(size: Coord2, bombs: Vec<Coord2>) -> Self {
        let covers = (0..size.1)
            .flat_map(|row| (0..size.0).map(move |col| (col, row)))
            .collect();
        Self::new(size, bombs, covers)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let level: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected level data: {}", err);
            FieldError::MalformedLevel
        })?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            log::warn!("Could not serialize level data: {}", err);
            FieldError::MalformedLevel
        })
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Same checks a [`Grid`] would apply during setup, without building one.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidSize(self.size));
        }

        let in_bounds = |coords: Coord2| {
            if coords.0 < width && coords.1 < height {
                Ok(coords)
            } else {
                Err(FieldError::OutOfBounds(coords))
            }
        };

        let mut seen = HashSet::with_capacity(self.bombs.len());
        for &coords in &self.bombs {
            if !seen.insert(in_bounds(coords)?) {
                return Err(FieldError::DuplicateBomb(coords));
            }
        }

        seen.clear();
        for &coords in &self.covers {
            if !seen.insert(in_bounds(coords)?) {
                return Err(FieldError::DuplicateCover(coords));
            }
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Flagged => true,
            Self::Unflagged => true,
        }
    }
}

/// Result of a reveal or detonation; `cells` is how many covers were flushed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed { cells: usize },
    Detonated { bombs: usize, cells: usize },
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed { .. } => true,
            Detonated { .. } => true,
        }
    }

    pub const fn cells(self) -> usize {
        use RevealOutcome::*;
        match self {
            NoChange => 0,
            Revealed { cells } => cells,
            Detonated { cells, .. } => cells,
        }
    }
}
