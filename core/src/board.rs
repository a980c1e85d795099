use core::ops::Index;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// Fixed-size grid of cells plus the counters the win check relies on.
///
/// Only serialized for inspection, a board is always built through a generator or [`Board::from_mine_coords`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    opened_safe: CellCount,
    flagged: CellCount,
}

impl Board {
    /// All cells covered, unflagged and without mines.
    pub(crate) fn empty(size: Coord2) -> Result<Self> {
        area(size).ok_or(GameError::InvalidSize(size))?;
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(x, z)| {
            Cell::new((x as Coord, z as Coord))
        });
        Ok(Self {
            cells,
            mine_count: 0,
            opened_safe: 0,
            flagged: 0,
        })
    }

    /// Builds a board with mines exactly at `mine_coords`, duplicates collapsed.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::empty(size)?;
        if mine_coords.iter().any(|&coords| !within(coords, size)) {
            return Err(GameError::OutOfBounds);
        }
        board.place_mines(mine_coords.iter().copied());
        Ok(board)
    }

    /// Marks the given cells as mines and computes every neighbor count.
    ///
    /// Only valid on a freshly created board, counts are never recomputed afterwards.
    pub(crate) fn place_mines(&mut self, mine_coords: impl IntoIterator<Item = Coord2>) {
        for coords in mine_coords {
            let cell = &mut self.cells[coords.to_nd_index()];
            if !cell.is_mine {
                cell.is_mine = true;
                self.mine_count += 1;
            }
        }

        let size = self.size();
        for coords in iter_coords(size) {
            let count = if self[coords].is_mine {
                0
            } else {
                self.adjacent_mine_count(coords)
            };
            self.cells[coords.to_nd_index()].neighbor_mines = count;
        }
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.cells.dim();
        (width as Coord, height as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    /// Non-mine cells that are no longer covered.
    pub fn opened_safe_count(&self) -> CellCount {
        self.opened_safe
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.mine_count) - i64::from(self.flagged)
    }

    /// Every safe cell has been opened.
    pub fn is_cleared(&self) -> bool {
        self.opened_safe == self.safe_cell_count()
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        within(coords, self.size())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.in_bounds(coords).then(|| self[coords])
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count() as u8
    }

    /// All cells in row-major `(x, z)` order.
    pub fn iter_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        iter_coords(self.size()).map(|coords| self[coords])
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_cells()
            .filter(|cell| cell.is_mine)
            .map(|cell| cell.coords)
    }

    /// Coordinates of every uncovered cell.
    pub fn opened_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_cells()
            .filter(|cell| !cell.is_covered)
            .map(|cell| cell.coords)
    }

    /// Uncovers a cell, returning whether it was covered before.
    pub(crate) fn uncover(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.is_covered {
            return false;
        }
        cell.is_covered = false;
        if !cell.is_mine {
            self.opened_safe += 1;
        }
        true
    }

    /// Inverts the flag of a covered cell, returning whether anything changed.
    pub(crate) fn toggle_flag(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.is_covered {
            return false;
        }
        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flagged += 1;
        } else {
            self.flagged -= 1;
        }
        true
    }

    /// Uncovers every mine regardless of flags, returning how many were still covered.
    pub(crate) fn reveal_mines(&mut self) -> CellCount {
        let mut revealed = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
            if cell.is_covered {
                cell.is_covered = false;
                revealed += 1;
            }
        }
        revealed
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Every coordinate of a board of `size`, z-major like the cell layout of the world floor.
pub(crate) fn iter_coords((width, height): Coord2) -> impl Iterator<Item = Coord2> {
    (0..height).flat_map(move |z| (0..width).map(move |x| (x, z)))
}
