use serde::{Deserialize, Serialize};
use web_time::Duration;

pub use board::*;
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use types::*;

mod board;
mod clock;
mod engine;
mod error;
mod types;

/// Per-match configuration, fixed for the lifetime of one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: PlayerCount,
    pub initial_budget: Duration,
}

impl GameConfig {
    pub const MIN_PLAYERS: PlayerCount = 2;
    pub const MAX_PLAYERS: PlayerCount = 4;
    pub const MIN_BUDGET: Duration = Duration::from_secs(1);
    pub const DEFAULT_BUDGET: Duration = Duration::from_millis(10_000);

    pub const fn new_unchecked(players: PlayerCount, initial_budget: Duration) -> Self {
        Self {
            players,
            initial_budget,
        }
    }

    pub fn new(players: PlayerCount, initial_budget: Duration) -> Self {
        let players = players.clamp(Self::MIN_PLAYERS, Self::MAX_PLAYERS);
        let initial_budget = initial_budget.max(Self::MIN_BUDGET);
        Self::new_unchecked(players, initial_budget)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::MIN_PLAYERS, Self::DEFAULT_BUDGET)
    }
}

/// Outcome of a cell click
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    NoChange,
    Placed,
    Won,
    Drawn,
}

impl MoveOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Placed => true,
            Won => true,
            Drawn => true,
        }
    }
}

/// Outcome of a clock tick
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClockOutcome {
    NoChange,
    Folded,
    Expired,
}

impl ClockOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use ClockOutcome::*;
        match self {
            NoChange => false,
            Folded => true,
            Expired => true,
        }
    }
}
