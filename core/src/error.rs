use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Coordinates {0:?} are outside the field")]
    OutOfBounds(Coord2),
    #[error("Field size {0:?} must be at least 1x1")]
    InvalidSize(Coord2),
    #[error("A bomb was already placed at {0:?}")]
    DuplicateBomb(Coord2),
    #[error("A cover was already placed at {0:?}")]
    DuplicateCover(Coord2),
    #[error("No bomb to remove at {0:?}")]
    NoBombPresent(Coord2),
    #[error("Nearby bomb count at {0:?} left its valid range")]
    CountOverflow(Coord2),
    #[error("Nearby bomb count at {0:?} does not match its neighborhood")]
    CountMismatch(Coord2),
    #[error("Malformed level data")]
    MalformedLevel,
}

pub type Result<T> = core::result::Result<T, FieldError>;
