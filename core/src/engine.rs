use std::collections::VecDeque;

use ndarray::Array2;
use rand::prelude::*;

use crate::*;

/// Mixed into the session seed so safe-start probes do not replay the placement shuffle.
const START_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// One game from generation to its terminal outcome.
///
/// Collaborators (input translation, presentation, pursuit and proximity detection) receive the session by
/// reference; there is no ambient global to look it up from. Commands are serialized by the caller, a host that
/// shares a session between threads must guard the whole value with a single lock.
#[derive(Debug)]
pub struct Session {
    board: Board,
    mapper: CoordinateMapper,
    state: GameState,
    rng: SmallRng,
}

impl Session {
    /// Wraps an already populated board, `seed` drives safe-start selection.
    pub fn new(board: Board, mapper: MapperConfig, seed: u64) -> Result<Self> {
        let mapper = CoordinateMapper::new(mapper, board.size())?;
        Ok(Self {
            board,
            mapper,
            state: GameState::new(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Generates a fresh board for `config`; fails fast on an invalid configuration.
    pub fn generate(config: GameConfig, mapper: MapperConfig, seed: u64) -> Result<Self> {
        let board = ShuffleGenerator::new(seed).generate(config)?;
        Self::new(board, mapper, seed.rotate_left(32) ^ START_STREAM)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn outcome(&self) -> GameOutcome {
        self.state.outcome()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        self.board.in_bounds(coords)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.cell_at(coords)
    }

    pub fn mines_left(&self) -> i64 {
        self.board.mines_left()
    }

    pub fn grid_to_world(&self, coords: Coord2) -> WorldPos {
        self.mapper.grid_to_world(coords)
    }

    pub fn world_to_grid(&self, pos: WorldPos) -> Result<Coord2> {
        self.mapper.world_to_grid(pos)
    }

    pub fn on_lost(&mut self, subscriber: impl FnMut() + Send + 'static) {
        self.state.subscribe_lost(subscriber);
    }

    pub fn on_won(&mut self, subscriber: impl FnMut() + Send + 'static) {
        self.state.subscribe_won(subscriber);
    }

    /// Picks a zero cell and opens its region before the player gets control.
    pub fn start(&mut self) -> Result<SafeStart> {
        self.start_with_probes(DEFAULT_START_PROBES)
    }

    /// Fails with [`GameError::AlreadyStarted`] once any safe cell is open or the game is over.
    pub fn start_with_probes(&mut self, max_probes: u32) -> Result<SafeStart> {
        if self.state.is_finished() || self.board.opened_safe_count() > 0 {
            return Err(GameError::AlreadyStarted);
        }
        let coords = find_safe_start(&self.board, &mut self.rng, max_probes)?;
        let outcome = self.open(coords);

        let mut spawn = self.mapper.grid_to_world(coords);
        spawn.y += SPAWN_HEIGHT;
        log::info!("Starting at {:?}, spawn {:?}", coords, spawn);
        Ok(SafeStart {
            coords,
            spawn,
            outcome,
        })
    }

    /// Opens a covered, unflagged cell.
    ///
    /// Out-of-bounds coordinates, flagged or already open cells and finished games are ignored. Opening a zero
    /// cell floods its connected zero region together with the numbered cells bordering it.
    pub fn open(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        let Ok(coords) = self.board.validate_coords(coords) else {
            log::trace!("Ignoring open outside the board at {:?}", coords);
            return NoChange;
        };
        if self.state.is_finished() || !self.board[coords].can_open() {
            return NoChange;
        }

        if self.board[coords].is_mine {
            log::debug!("Opened mine at {:?}", coords);
            return self.trip();
        }

        let opened = flood_reveal(&mut self.board, coords);
        log::debug!(
            "Open cell at {:?}, mine count: {}, uncovered {} cells",
            coords,
            self.board[coords].neighbor_mines,
            opened
        );

        if self.board.is_cleared() {
            self.state.win();
            Won
        } else {
            Revealed
        }
    }

    /// Flags or unflags a covered cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let Ok(coords) = self.board.validate_coords(coords) else {
            return MarkOutcome::NoChange;
        };
        if self.state.is_finished() || !self.board.toggle_flag(coords) {
            return MarkOutcome::NoChange;
        }

        log::debug!(
            "Flag at {:?} is now {}",
            coords,
            self.board[coords].is_flagged
        );
        MarkOutcome::Changed
    }

    /// Reveals every mine and loses the game.
    ///
    /// Shared by opening a mine, stepping on one and a hostile agent reaching the player.
    pub fn trip(&mut self) -> RevealOutcome {
        if self.state.is_finished() {
            return RevealOutcome::NoChange;
        }

        let revealed = self.board.reveal_mines();
        log::debug!("Revealed {} covered mines", revealed);
        self.state.lose();
        RevealOutcome::HitMine
    }

    /// The player body touched the floor at `pos`; an unflagged mine underneath trips.
    pub fn step_on(&mut self, pos: WorldPos) -> RevealOutcome {
        let Ok(coords) = self.mapper.world_to_grid(pos) else {
            return RevealOutcome::NoChange;
        };

        let cell = self.board[coords];
        if cell.is_mine && !cell.is_flagged {
            log::debug!("Stepped on mine at {:?}", coords);
            self.trip()
        } else {
            RevealOutcome::NoChange
        }
    }
}

/// Breadth-first reveal seeded at a safe, unflagged cell, returning how many cells got uncovered.
///
/// Every dequeued cell is uncovered, only zero cells enqueue their neighbors, so the fill stops at the ring of
/// numbered cells around the zero region. Mines and flagged cells are never enqueued.
pub(crate) fn flood_reveal(board: &mut Board, start: Coord2) -> CellCount {
    let mut visited: Array2<bool> = Array2::default(board.size().to_nd_index());
    let mut to_visit = VecDeque::from([start]);
    visited[start.to_nd_index()] = true;
    let mut opened = 0;

    while let Some(coords) = to_visit.pop_front() {
        if board.uncover(coords) {
            opened += 1;
        }

        if board[coords].neighbor_mines != 0 {
            continue;
        }

        for pos in board.iter_neighbors(coords) {
            let cell = board[pos];
            if visited[pos.to_nd_index()] || cell.is_mine || cell.is_flagged {
                continue;
            }
            visited[pos.to_nd_index()] = true;
            to_visit.push_back(pos);
        }
        log::trace!("Flood visited {:?}, {} queued", coords, to_visit.len());
    }

    opened
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> Session {
        let board = Board::from_mine_coords(size, mines).unwrap();
        Session::new(board, MapperConfig::default(), 0).unwrap()
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn covered(session: &Session) -> usize {
        session.board().iter_cells().filter(|cell| cell.is_covered).count()
    }

    #[test]
    fn flood_opens_every_safe_cell_around_corner_mine() {
        let mut session = session((5, 5), &[(4, 4)]);

        assert_eq!(session.open((0, 0)), RevealOutcome::Won);

        assert_eq!(session.board().opened_safe_count(), 24);
        assert!(session.cell_at((4, 4)).unwrap().is_covered);
        assert_eq!(session.cell_at((3, 3)).unwrap().neighbor_mines, 1);
        assert!(!session.cell_at((3, 3)).unwrap().is_covered);
    }

    #[test]
    fn flood_stops_at_numbered_ring() {
        let mut session = session((5, 1), &[(2, 0)]);

        assert_eq!(session.open((0, 0)), RevealOutcome::Revealed);

        assert!(!session.cell_at((0, 0)).unwrap().is_covered);
        assert!(!session.cell_at((1, 0)).unwrap().is_covered);
        assert!(session.cell_at((3, 0)).unwrap().is_covered);
        assert!(session.cell_at((4, 0)).unwrap().is_covered);
        assert_eq!(session.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn numbered_cell_opens_alone() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert_eq!(session.open((1, 1)), RevealOutcome::Revealed);
        assert_eq!(covered(&session), 8);
    }

    #[test]
    fn flood_skips_flagged_cells() {
        let mut session = session((4, 1), &[]);
        session.toggle_flag((2, 0));

        assert_eq!(session.open((0, 0)), RevealOutcome::Revealed);

        assert!(session.cell_at((2, 0)).unwrap().is_covered);
        assert!(session.cell_at((3, 0)).unwrap().is_covered);
        assert_eq!(session.board().opened_safe_count(), 2);
    }

    #[test]
    fn flagged_cell_rejects_open_until_unflagged() {
        let mut session = session((3, 1), &[(0, 0)]);

        assert_eq!(session.toggle_flag((2, 0)), MarkOutcome::Changed);
        assert_eq!(session.open((2, 0)), RevealOutcome::NoChange);

        assert_eq!(session.toggle_flag((2, 0)), MarkOutcome::Changed);
        assert_eq!(session.open((2, 0)), RevealOutcome::Won);
    }

    #[test]
    fn toggle_flag_is_self_inverse_and_ignores_open_cells() {
        let mut session = session((3, 3), &[(0, 0)]);

        session.toggle_flag((2, 2));
        session.toggle_flag((2, 2));
        assert!(!session.cell_at((2, 2)).unwrap().is_flagged);
        assert_eq!(session.mines_left(), 1);

        session.open((1, 1));
        assert_eq!(session.toggle_flag((1, 1)), MarkOutcome::NoChange);
        assert!(!session.cell_at((1, 1)).unwrap().is_flagged);
    }

    #[test]
    fn opening_mine_loses_and_reveals_only_mines() {
        let mut session = session((3, 3), &[(0, 0), (2, 2)]);
        let (lost, on_lost) = counter();
        session.on_lost(on_lost);
        session.toggle_flag((2, 2));

        assert_eq!(session.open((0, 0)), RevealOutcome::HitMine);

        assert_eq!(session.outcome(), GameOutcome::Lost);
        assert!(!session.cell_at((0, 0)).unwrap().is_covered);
        assert!(!session.cell_at((2, 2)).unwrap().is_covered);
        assert_eq!(covered(&session), 7);
        assert_eq!(lost.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn finished_game_ignores_commands() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.open((0, 0));

        assert_eq!(session.open((2, 2)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag((1, 1)), MarkOutcome::NoChange);
        assert_eq!(session.trip(), RevealOutcome::NoChange);
        assert_eq!(covered(&session), 8);
    }

    #[test]
    fn zero_mine_strip_wins_on_first_open() {
        let mut session = session((2, 1), &[]);
        let (won, on_won) = counter();
        session.on_won(on_won);

        assert_eq!(session.open((0, 0)), RevealOutcome::Won);
        assert_eq!(session.outcome(), GameOutcome::Won);
        assert_eq!(session.open((1, 0)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag((1, 0)), MarkOutcome::NoChange);
        assert_eq!(won.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn win_waits_for_last_safe_cell() {
        let mut session = session((3, 1), &[(1, 0)]);

        assert_eq!(session.open((0, 0)), RevealOutcome::Revealed);
        assert_eq!(session.open((0, 0)), RevealOutcome::NoChange);
        assert_eq!(session.open((2, 0)), RevealOutcome::Won);
        assert!(session.cell_at((1, 0)).unwrap().is_covered);

        assert_eq!(session.toggle_flag((1, 0)), MarkOutcome::NoChange);
        assert!(!session.cell_at((1, 0)).unwrap().is_flagged);
        assert_eq!(session.mines_left(), 1);
    }

    #[test]
    fn out_of_bounds_commands_are_ignored() {
        let mut session = session((2, 2), &[(0, 0)]);

        assert_eq!(session.open((-1, 0)), RevealOutcome::NoChange);
        assert_eq!(session.open((2, 0)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag((0, 5)), MarkOutcome::NoChange);
        assert_eq!(session.board().flagged_count(), 0);
        assert_eq!(covered(&session), 4);
    }

    #[test]
    fn trip_loses_once() {
        let mut session = session((2, 2), &[(1, 1)]);
        let (lost, on_lost) = counter();
        session.on_lost(on_lost);

        assert_eq!(session.trip(), RevealOutcome::HitMine);
        assert_eq!(session.trip(), RevealOutcome::NoChange);

        assert!(!session.cell_at((1, 1)).unwrap().is_covered);
        assert_eq!(lost.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stepping_on_unflagged_mine_loses() {
        let mut session = session((3, 3), &[(1, 1)]);

        assert_eq!(
            session.step_on(WorldPos::new(0.2, 1.0, 0.7)),
            RevealOutcome::NoChange
        );
        assert_eq!(
            session.step_on(WorldPos::new(-4.0, 0.0, 0.0)),
            RevealOutcome::NoChange
        );

        session.toggle_flag((1, 1));
        assert_eq!(
            session.step_on(WorldPos::new(1.5, 0.0, 1.5)),
            RevealOutcome::NoChange
        );

        session.toggle_flag((1, 1));
        assert_eq!(
            session.step_on(WorldPos::new(1.5, 0.0, 1.5)),
            RevealOutcome::HitMine
        );
        assert_eq!(session.outcome(), GameOutcome::Lost);
    }

    #[test]
    fn start_pre_opens_zero_region() {
        let mut session = session((6, 4), &[(5, 3)]);

        let start = session.start().unwrap();

        assert!(session.cell_at(start.coords).unwrap().is_zero());
        assert_eq!(start.outcome, RevealOutcome::Won);
        assert_eq!(start.spawn.y, SPAWN_HEIGHT);
        assert_eq!(session.world_to_grid(start.spawn), Ok(start.coords));
    }

    #[test]
    fn start_fails_without_zero_cell() {
        let mut session = session((3, 1), &[(1, 0)]);

        assert_eq!(session.start(), Err(GameError::NoSafeStart));
        assert_eq!(covered(&session), 3);
    }

    #[test]
    fn start_runs_only_once() {
        let mut session = session((7, 1), &[(3, 0)]);

        let start = session.start().unwrap();
        assert_eq!(start.outcome, RevealOutcome::Revealed);
        let opened = session.board().opened_safe_count();
        assert_eq!(opened, 3);

        assert_eq!(session.start(), Err(GameError::AlreadyStarted));
        assert_eq!(session.board().opened_safe_count(), opened);
    }

    #[test]
    fn start_refused_after_player_opened_a_cell() {
        let mut session = session((7, 1), &[(3, 0)]);
        session.open((6, 0));

        assert_eq!(session.start(), Err(GameError::AlreadyStarted));
        assert!(session.cell_at((0, 0)).unwrap().is_covered);
    }

    #[test]
    fn start_refused_after_loss() {
        let mut session = session((7, 1), &[(3, 0)]);
        session.trip();

        assert_eq!(session.start(), Err(GameError::AlreadyStarted));
        assert_eq!(session.board().opened_safe_count(), 0);
    }

    #[test]
    fn start_probes_do_not_replay_placement_stream() {
        let seed = 42;
        let mut session =
            Session::generate(GameConfig::beginner(), MapperConfig::default(), seed).unwrap();

        let placement_first: u64 = SmallRng::seed_from_u64(seed).random();
        let start_first: u64 = session.rng.random();
        assert_ne!(start_first, placement_first);
    }

    #[test]
    fn generate_rejects_bad_config() {
        let err = Session::generate(GameConfig::new((4, 4), 17), MapperConfig::default(), 1)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
