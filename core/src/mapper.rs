use serde::{Deserialize, Serialize};

use crate::*;

/// Continuous position in the world, the board lies on the XZ plane at height `y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPos {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Where the board sits in the world and how large each cell is.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Corner of cell `(0, 0)`; `y` is the floor level.
    pub origin: WorldPos,
    /// Cell extent along the x and z axes.
    pub cell_size: (f64, f64),
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            origin: WorldPos::default(),
            cell_size: (1.0, 1.0),
        }
    }
}

/// Converts between grid indices and world positions for one board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateMapper {
    config: MapperConfig,
    size: Coord2,
}

impl CoordinateMapper {
    pub fn new(config: MapperConfig, size: Coord2) -> Result<Self> {
        let (sx, sz) = config.cell_size;
        if !(sx.is_finite() && sz.is_finite() && sx > 0.0 && sz > 0.0) {
            return Err(GameError::InvalidCellSize);
        }
        area(size).ok_or(GameError::InvalidSize(size))?;
        Ok(Self { config, size })
    }

    pub fn config(&self) -> MapperConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        within(coords, self.size)
    }

    /// Center of the cell at `(x, z)`; coordinates outside the board extrapolate linearly.
    pub fn grid_to_world(&self, (x, z): Coord2) -> WorldPos {
        let MapperConfig { origin, cell_size } = self.config;
        WorldPos {
            x: origin.x + (x as f64 + 0.5) * cell_size.0,
            y: origin.y,
            z: origin.z + (z as f64 + 0.5) * cell_size.1,
        }
    }

    /// Cell containing `pos`, ignoring its height.
    pub fn world_to_grid(&self, pos: WorldPos) -> Result<Coord2> {
        let MapperConfig { origin, cell_size } = self.config;
        let x = ((pos.x - origin.x) / cell_size.0).floor();
        let z = ((pos.z - origin.z) / cell_size.1).floor();
        // `as` saturates and turns NaN into 0, so finiteness is checked separately
        let coords = (x as Coord, z as Coord);
        if x.is_finite() && z.is_finite() && self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// Minimum and maximum corners of the board footprint.
    pub fn world_bounds(&self) -> (WorldPos, WorldPos) {
        let MapperConfig { origin, cell_size } = self.config;
        let max = WorldPos {
            x: origin.x + self.size.0 as f64 * cell_size.0,
            y: origin.y,
            z: origin.z + self.size.1 as f64 * cell_size.1,
        };
        (origin, max)
    }
}
