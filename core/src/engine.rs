use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::{
    Board, CellIndex, ClockOutcome, GameConfig, GameError, Line, MoveOutcome, PlayerClock, Result,
    Symbol,
};

/// Resolved outcome of a match, derived on demand from the board and the
/// move count. Never cached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won(Symbol),
    Drawn,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        use GameStatus::*;
        match self {
            InProgress => false,
            Won(_) => true,
            Drawn => true,
        }
    }

    pub const fn winner(self) -> Option<Symbol> {
        match self {
            Self::Won(symbol) => Some(symbol),
            _ => None,
        }
    }
}

/// One discrete input event, reduced into the game by [`Game::apply`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// A player selected a cell.
    CellClick { index: CellIndex, now: Instant },
    /// Periodic cadence folding elapsed time into the active clock.
    Tick { symbol: Symbol, now: Instant },
    /// Reseed every active player's clock to the configured budget.
    ResetClocks { now: Instant },
}

/// Represents a match from the first move to a win or a draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    config: GameConfig,
    board: Board,
    move_count: u8,
    clocks: Vec<PlayerClock>,
    move_started_at: Instant,
}

impl Game {
    pub fn new(config: GameConfig, now: Instant) -> Self {
        let clocks = (0..config.players)
            .map(|_| PlayerClock::new(config.initial_budget, now))
            .collect();
        Self {
            config,
            board: Board::new(),
            move_count: 0,
            clocks,
            move_started_at: now,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// How many cells have been filled so far.
    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    /// When the move currently awaiting input began.
    pub fn move_started_at(&self) -> Instant {
        self.move_started_at
    }

    /// Symbol whose turn it is; theirs is the clock that drains.
    pub fn to_move(&self) -> Symbol {
        Symbol::for_move(self.move_count, self.config.players)
    }

    fn active_index(&self) -> usize {
        (self.move_count % self.config.players) as usize
    }

    pub fn status(&self) -> GameStatus {
        match self.board.winner() {
            Some((symbol, _)) => GameStatus::Won(symbol),
            None if self.move_count as usize == Board::SIZE => GameStatus::Drawn,
            None => GameStatus::InProgress,
        }
    }

    pub fn winning_line(&self) -> Option<Line> {
        self.board.winning_line()
    }

    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    /// Live clock reading for `symbol` at `now`. `None` for symbols outside
    /// the active roster prefix. Clocks freeze once the match is decided.
    pub fn remaining(&self, symbol: Symbol, now: Instant) -> Option<Duration> {
        let index = symbol.index();
        let clock = self.clocks.get(index)?;
        let running = index == self.active_index() && !self.is_finished();
        Some(clock.remaining_at(now, running))
    }

    /// Whether `symbol`'s clock has drained to zero as of `now`.
    pub fn is_out_of_time(&self, symbol: Symbol, now: Instant) -> bool {
        self.remaining(symbol, now)
            .is_some_and(|remaining| remaining.is_zero())
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < Board::SIZE {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    /// Attempts to occupy `index` for the symbol whose turn it is.
    ///
    /// On success the mover's clock is paused (elapsed time folded in), the
    /// next player's clock starts running, and a new move period begins at
    /// `now`. Clicking an occupied cell changes nothing.
    pub fn click(&mut self, index: CellIndex, now: Instant) -> Result<MoveOutcome> {
        use MoveOutcome::*;

        let index = self.validate_index(index)?;
        self.check_not_finished()?;

        if !self.board.is_empty_at(index) {
            return Ok(NoChange);
        }

        let symbol = self.to_move();
        self.board.place(index, symbol);
        let active = self.active_index();
        self.clocks[active].fold(now);
        self.move_count += 1;
        let active = self.active_index();
        self.clocks[active].resume(now);
        self.move_started_at = now;
        log::debug!("{} takes cell {}, move {}", symbol, index, self.move_count);

        Ok(match self.status() {
            GameStatus::Won(_) => Won,
            GameStatus::Drawn => Drawn,
            GameStatus::InProgress => Placed,
        })
    }

    /// Folds elapsed time into the active player's stored value and restarts
    /// the measurement at `now`.
    ///
    /// A tick naming any other symbol changes nothing, as does a tick for a
    /// clock that has already drained to zero.
    pub fn tick(&mut self, symbol: Symbol, now: Instant) -> Result<ClockOutcome> {
        use ClockOutcome::*;

        self.check_not_finished()?;

        if symbol != self.to_move() {
            return Ok(NoChange);
        }

        let active = self.active_index();
        let clock = &mut self.clocks[active];
        if clock.is_expired() {
            return Ok(NoChange);
        }

        clock.fold(now);
        log::trace!("{} clock folded to {:?}", symbol, clock.stored());

        Ok(if clock.is_expired() { Expired } else { Folded })
    }

    /// Reseeds every active player's clock to the configured budget and
    /// restarts the move period. Used at game start, and again if the player
    /// count changes before the first move.
    pub fn reset_clocks(&mut self, now: Instant) {
        for clock in &mut self.clocks {
            *clock = PlayerClock::new(self.config.initial_budget, now);
        }
        self.move_started_at = now;
    }

    /// Total transition over the whole action space: a rejected or invalid
    /// action leaves the state untouched and reports no update.
    pub fn apply(&mut self, action: Action) -> bool {
        use Action::*;

        match action {
            CellClick { index, now } => self
                .click(index, now)
                .map_or(false, |outcome| outcome.has_update()),
            Tick { symbol, now } => self
                .tick(symbol, now)
                .map_or(false, |outcome| outcome.has_update()),
            ResetClocks { now } => {
                self.reset_clocks(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    const BUDGET: Duration = Duration::from_millis(10_000);

    fn game(players: u8, now: Instant) -> Game {
        Game::new(GameConfig::new(players, BUDGET), now)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn two_player_opening_alternates_symbols() {
        let start = Instant::now();
        let mut game = game(2, start);

        assert_eq!(game.click(0, start + ms(1000)), Ok(MoveOutcome::Placed));
        assert_eq!(game.click(4, start + ms(2000)), Ok(MoveOutcome::Placed));

        assert_eq!(game.move_count(), 2);
        assert_eq!(game.to_move(), Symbol::Cross);
        assert_eq!(game.board().cell_at(0), Some(Cell::Taken(Symbol::Cross)));
        assert_eq!(game.board().cell_at(4), Some(Cell::Taken(Symbol::Nought)));
    }

    #[test]
    fn completing_a_row_wins_and_reports_the_line() {
        let start = Instant::now();
        let mut game = game(2, start);

        // Cross: 0, 1, 2; Nought: 3, 4.
        for (index, millis) in [(0, 100), (3, 200), (1, 300), (4, 400)] {
            game.click(index, start + ms(millis)).unwrap();
        }
        let outcome = game.click(2, start + ms(500)).unwrap();

        assert_eq!(outcome, MoveOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won(Symbol::Cross));
        assert_eq!(game.winning_line(), Some([0, 1, 2]));
        assert!(game.is_finished());
    }

    #[test]
    fn full_board_without_a_line_is_a_draw_not_in_progress() {
        let start = Instant::now();
        let mut game = game(2, start);

        // A nine-move sequence that never completes a line.
        for (move_number, index) in [0, 4, 8, 1, 7, 6, 2, 5, 3].into_iter().enumerate() {
            let outcome = game
                .click(index, start + ms(move_number as u64 * 100))
                .unwrap();
            if move_number < 8 {
                assert_eq!(outcome, MoveOutcome::Placed);
            } else {
                assert_eq!(outcome, MoveOutcome::Drawn);
            }
        }

        assert_eq!(game.status(), GameStatus::Drawn);
        assert_eq!(game.status().winner(), None);
        assert!(game.board().is_full());
        // Derived twice from unchanged state, same answer.
        assert_eq!(game.status(), game.status());
    }

    #[test]
    fn four_players_cycle_through_the_whole_roster() {
        let start = Instant::now();
        let mut game = game(4, start);

        for (move_number, index) in [0, 1, 2, 3].into_iter().enumerate() {
            assert_eq!(game.to_move(), Symbol::ALL[move_number]);
            game.click(index, start + ms(move_number as u64 * 100))
                .unwrap();
        }
        assert_eq!(game.to_move(), Symbol::Cross);
    }

    #[test]
    fn click_pauses_the_mover_and_starts_the_next_clock() {
        let start = Instant::now();
        let mut game = game(2, start);
        let now = start + ms(3000);

        game.click(0, now).unwrap();

        // Cross spent 3 s thinking; their paused clock holds the difference
        // no matter how much later we ask.
        let much_later = start + ms(60_000);
        assert_eq!(game.remaining(Symbol::Cross, much_later), Some(ms(7000)));
        // Nought's clock started at the click.
        assert_eq!(game.remaining(Symbol::Nought, now), Some(ms(10_000)));
        assert_eq!(game.remaining(Symbol::Nought, now + ms(1000)), Some(ms(9000)));
        assert_eq!(game.move_started_at(), now);
    }

    #[test]
    fn tick_folds_the_active_clock_in_place() {
        let start = Instant::now();
        let mut game = game(2, start);
        let now = start + ms(3000);

        // Live read before the fold.
        assert_eq!(game.remaining(Symbol::Cross, now), Some(ms(7000)));
        assert_eq!(game.tick(Symbol::Cross, now), Ok(ClockOutcome::Folded));
        // The fold is invisible to a live read at the same instant.
        assert_eq!(game.remaining(Symbol::Cross, now), Some(ms(7000)));

        // A tick naming the paused player changes nothing.
        let before = game.clone();
        assert_eq!(game.tick(Symbol::Nought, now), Ok(ClockOutcome::NoChange));
        assert_eq!(game, before);
    }

    #[test]
    fn expired_clock_reports_once_then_goes_quiet() {
        let start = Instant::now();
        let mut game = Game::new(GameConfig::new(2, ms(1000)), start);

        assert_eq!(
            game.tick(Symbol::Cross, start + ms(5000)),
            Ok(ClockOutcome::Expired)
        );
        assert_eq!(game.remaining(Symbol::Cross, start + ms(5000)), Some(ms(0)));
        assert!(game.is_out_of_time(Symbol::Cross, start + ms(5000)));

        // Stored value is already zero; further ticks are no-ops.
        assert_eq!(
            game.tick(Symbol::Cross, start + ms(6000)),
            Ok(ClockOutcome::NoChange)
        );
        // Running out of time does not decide the match by itself.
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn occupied_cell_click_leaves_the_game_untouched() {
        let start = Instant::now();
        let mut game = game(2, start);
        game.click(4, start + ms(500)).unwrap();

        let before = game.clone();
        assert_eq!(game.click(4, start + ms(2000)), Ok(MoveOutcome::NoChange));
        assert_eq!(game, before);
    }

    #[test]
    fn out_of_range_and_post_game_clicks_are_rejected() {
        let start = Instant::now();
        let mut game = game(2, start);

        assert_eq!(game.click(9, start), Err(GameError::InvalidIndex));

        for (index, millis) in [(0, 100), (3, 200), (1, 300), (4, 400), (2, 500)] {
            game.click(index, start + ms(millis)).unwrap();
        }
        assert!(game.is_finished());
        assert_eq!(game.click(8, start + ms(600)), Err(GameError::AlreadyEnded));
        assert_eq!(
            game.tick(Symbol::Nought, start + ms(600)),
            Err(GameError::AlreadyEnded)
        );
    }

    #[test]
    fn apply_is_total_over_invalid_actions() {
        let start = Instant::now();
        let mut game = game(3, start);
        game.apply(Action::CellClick {
            index: 4,
            now: start + ms(100),
        });

        let before = game.clone();
        assert!(!game.apply(Action::CellClick {
            index: 4,
            now: start + ms(200)
        }));
        assert!(!game.apply(Action::CellClick {
            index: 42,
            now: start + ms(200)
        }));
        assert!(!game.apply(Action::Tick {
            symbol: Symbol::Triangle,
            now: start + ms(200)
        }));
        assert_eq!(game, before);
    }

    #[test]
    fn reset_clocks_round_trips_the_configured_budget() {
        let start = Instant::now();
        let mut game = game(4, start);
        game.click(0, start + ms(2500)).unwrap();

        let now = start + ms(4000);
        assert!(game.apply(Action::ResetClocks { now }));

        for symbol in &Symbol::ALL {
            assert_eq!(game.remaining(*symbol, now), Some(BUDGET));
        }
        assert_eq!(game.move_started_at(), now);
    }

    #[test]
    fn clocks_freeze_once_the_match_is_decided() {
        let start = Instant::now();
        let mut game = game(2, start);

        for (index, millis) in [(0, 100), (3, 200), (1, 300), (4, 400), (2, 500)] {
            game.click(index, start + ms(millis)).unwrap();
        }
        assert!(game.is_finished());

        // Nought would be to move, but their clock no longer drains.
        let later = start + ms(99_000);
        assert_eq!(game.remaining(Symbol::Nought, later), Some(ms(9800)));
    }
}
