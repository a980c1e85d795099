use core::fmt;
use serde::{Deserialize, Serialize};

/// Valid transitions:
/// - InProgress -> Lost
/// - InProgress -> Won
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Lost,
    Won,
}

impl GameOutcome {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

pub type Subscriber = Box<dyn FnMut() + Send>;

/// Tracks the terminal outcome of a session and notifies subscribers of it.
///
/// Each notification fires at most once because the outcome can only leave `InProgress` once.
#[derive(Default)]
pub struct GameState {
    outcome: GameOutcome,
    on_lost: Vec<Subscriber>,
    on_won: Vec<Subscriber>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn subscribe_lost(&mut self, subscriber: impl FnMut() + Send + 'static) {
        self.on_lost.push(Box::new(subscriber));
    }

    pub fn subscribe_won(&mut self, subscriber: impl FnMut() + Send + 'static) {
        self.on_won.push(Box::new(subscriber));
    }

    /// Moves to `Lost`, returns false if the game had already ended.
    pub fn lose(&mut self) -> bool {
        self.finish(GameOutcome::Lost)
    }

    /// Moves to `Won`, returns false if the game had already ended.
    pub fn win(&mut self) -> bool {
        self.finish(GameOutcome::Won)
    }

    fn finish(&mut self, outcome: GameOutcome) -> bool {
        if self.outcome.is_finished() {
            return false;
        }

        self.outcome = outcome;
        log::info!("Game ended: {:?}", outcome);
        let subscribers = match outcome {
            GameOutcome::Lost => &mut self.on_lost,
            GameOutcome::Won => &mut self.on_won,
            GameOutcome::InProgress => return false,
        };
        for subscriber in subscribers.iter_mut() {
            subscriber();
        }
        true
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("outcome", &self.outcome)
            .field("on_lost", &self.on_lost.len())
            .field("on_won", &self.on_won.len())
            .finish()
    }
}
