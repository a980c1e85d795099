/// Single grid axis used for board width, height, and positions.
///
/// Signed so that noisy external input (negative world offsets, stale indices) can be represented and rejected
/// as out of bounds instead of wrapping.
pub type Coord = i32;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional grid coordinates `(x, z)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Callers must have bounds-checked `self` first.
    fn to_nd_index(self) -> Self::Output {
        [self.0 as usize, self.1 as usize]
    }
}

/// Whether `coords` lies inside a board of `size`.
pub const fn within(coords: Coord2, size: Coord2) -> bool {
    coords.0 >= 0 && coords.0 < size.0 && coords.1 >= 0 && coords.1 < size.1
}

/// Total number of cells of a board of `size`, `None` on non-positive dimensions or overflow.
pub fn area((width, height): Coord2) -> Option<CellCount> {
    if width <= 0 || height <= 0 {
        return None;
    }
    CellCount::try_from(width)
        .ok()?
        .checked_mul(CellCount::try_from(height).ok()?)
}

const DISPLACEMENTS: [Coord2; 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterates the in-bounds Moore neighborhood of a cell.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dx, dz)) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            let next = (self.center.0 + dx, self.center.1 + dz);
            if within(next, self.bounds) {
                return Some(next);
            }
        }
        None
    }
}
