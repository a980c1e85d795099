use rand::prelude::*;

use crate::*;

/// Random probes tried before falling back to a full scan.
pub const DEFAULT_START_PROBES: u32 = 200;

/// Height above the floor the player is spawned at.
pub const SPAWN_HEIGHT: f64 = 0.5;

/// Result of pre-opening the starting region of a session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SafeStart {
    pub coords: Coord2,
    /// Player spawn point above the center of `coords`.
    pub spawn: WorldPos,
    pub outcome: RevealOutcome,
}

/// Picks a zero cell to start from.
///
/// Probes up to `max_probes` uniformly random cells first, then scans the whole board and picks uniformly among
/// every zero cell. Dense boards may have none at all, that is reported as [`GameError::NoSafeStart`].
pub fn find_safe_start(board: &Board, rng: &mut SmallRng, max_probes: u32) -> Result<Coord2> {
    let (width, height) = board.size();

    for _ in 0..max_probes {
        let coords = (rng.random_range(0..width), rng.random_range(0..height));
        if board[coords].is_zero() {
            log::debug!("Safe start found by probing at {:?}", coords);
            return Ok(coords);
        }
    }

    log::warn!(
        "No zero cell after {} probes, scanning the whole board",
        max_probes
    );
    let zeros: Vec<Coord2> = board
        .iter_cells()
        .filter(|cell| cell.is_zero())
        .map(|cell| cell.coords)
        .collect();
    zeros.choose(rng).copied().ok_or(GameError::NoSafeStart)
}
