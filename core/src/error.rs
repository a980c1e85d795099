use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board size {0:?}, both dimensions must be positive")]
    InvalidSize(Coord2),
    #[error("Too many mines, requested {requested} but only {capacity} cells fit")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Cell size must be finite and positive on both axes")]
    InvalidCellSize,
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Board has no zero cell to start from")]
    NoSafeStart,
    #[error("Session already started, the start region can only be opened once")]
    AlreadyStarted,
}

impl GameError {
    /// Whether this error rejects the board or mapper configuration itself.
    pub const fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::InvalidSize(_) | Self::TooManyMines { .. } | Self::InvalidCellSize
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
