use rand::prelude::*;

use super::*;
use crate::board::iter_coords;

/// Uniform placement: shuffle every coordinate and mine the first `mines` of them.
///
/// A full-list shuffle guarantees the exact count and no duplicates in `O(width * height)`, and the seed alone
/// determines the resulting board.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleGenerator {
    seed: u64,
}

impl ShuffleGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for ShuffleGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        config.validate()?;
        let mut board = Board::empty(config.size)?;

        let mut all: Vec<Coord2> = iter_coords(config.size).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        all.shuffle(&mut rng);
        board.place_mines(all.into_iter().take(config.mines as usize));

        // double check mine count
        if board.mine_count() != config.mines {
            log::warn!(
                "Generated board count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                config.mines
            );
        }
        log::info!(
            "Generated {}x{} board with {} mines (seed {})",
            config.size.0,
            config.size.1,
            board.mine_count(),
            self.seed
        );
        Ok(board)
    }
}
