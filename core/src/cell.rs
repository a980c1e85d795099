use serde::Serialize;

use crate::Coord2;

/// Semantic state of a single floor cell.
///
/// Presentation layers derive visuals from these fields; the engine never stores anything visual here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub coords: Coord2,
    pub is_mine: bool,
    /// Mines in the Moore neighborhood, always 0 on mine cells.
    pub neighbor_mines: u8,
    pub is_flagged: bool,
    pub is_covered: bool,
}

impl Cell {
    pub const fn new(coords: Coord2) -> Self {
        Self {
            coords,
            is_mine: false,
            neighbor_mines: 0,
            is_flagged: false,
            is_covered: true,
        }
    }

    pub const fn is_safe(self) -> bool {
        !self.is_mine
    }

    /// A safe cell with no adjacent mines, the only kind the flood fill expands through.
    pub const fn is_zero(self) -> bool {
        !self.is_mine && self.neighbor_mines == 0
    }

    /// Whether an open command would act on this cell.
    pub const fn can_open(self) -> bool {
        self.is_covered && !self.is_flagged
    }
}
