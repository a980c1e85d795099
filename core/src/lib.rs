use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use mapper::*;
pub use start::*;
pub use state::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod mapper;
mod start;
mod state;
mod types;

/// Board dimensions and mine count, fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub const fn beginner() -> Self {
        Self::new((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new((30, 16), 99)
    }

    pub fn total_cells(&self) -> Option<CellCount> {
        area(self.size)
    }

    pub fn validate(&self) -> Result<()> {
        let capacity = self.total_cells().ok_or(GameError::InvalidSize(self.size))?;
        if self.mines > capacity {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                capacity,
            });
        }
        Ok(())
    }
}

/// The chase arena: a dense 16x16 floor.
impl Default for GameConfig {
    fn default() -> Self {
        Self::new((16, 16), 102)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
