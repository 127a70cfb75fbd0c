// One playthrough: board generation with a safe opening, turn handling,
// terminal detection and elapsed time

use rand::Rng;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::xtm_board::{Board, BoardError, FlagBudget, FlagOutcome, Visibility};
use crate::xtm_game::GameSettings;
use crate::xtm_scores::{Outcome, PlayerRecord, ScoreError};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("This cell is already revealed. Try again.")]
    AlreadyRevealed,
    #[error("cell ({0}, {1}) is outside the board")]
    OutOfBounds(usize, usize),
    #[error("the session is not waiting for that input")]
    WrongState,
    #[error("the game is already over")]
    Finished,
    #[error("opening cell ({0}, {1}) holds a bomb")]
    UnsafeOpening(usize, usize),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// What the player wants to do with the selected cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingTarget,
    AwaitingAction { row: usize, col: usize },
    Won,
    Lost { row: usize, col: usize }, // the bomb that went off
}

/// Result of one completed action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Flagged(FlagOutcome),
    Revealed(usize), // cells uncovered by the flood fill
    Won,
    Lost,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    settings: GameSettings,
    board: Board,
    flags: FlagBudget,
    state: SessionState,
    opening: (usize, usize),
    start_time: Instant,
    elapsed: Option<Duration>, // frozen at the terminal transition
}

impl GameSession {
    /// Generate a board around a random safe cell and uncover that cell
    pub fn start<R: Rng + ?Sized>(settings: GameSettings, rng: &mut R) -> Result<Self, SessionError> {
        let row = rng.gen_range(0..settings.size);
        let col = rng.gen_range(0..settings.size);
        let board = Board::generate(settings.size, settings.density, row, col, rng)?;
        log::info!(
            "new {} game: {}x{} with {} bombs, opening at ({}, {})",
            settings.difficulty.name(),
            settings.size,
            settings.size,
            board.bomb_count(),
            row,
            col
        );
        GameSession::with_board(settings, board, row, col)
    }

    /// Start on a prepared board, opening at `(row, col)`.
    /// The opening must be a safe cell on the board.
    pub fn with_board(settings: GameSettings, board: Board, row: usize, col: usize) -> Result<Self, SessionError> {
        if !board.in_bounds(row, col) {
            return Err(SessionError::OutOfBounds(row, col));
        }
        if board.has_bomb(row, col) {
            return Err(SessionError::UnsafeOpening(row, col));
        }
        let mut session = GameSession {
            settings,
            flags: FlagBudget::new(board.bomb_count()),
            board,
            state: SessionState::AwaitingTarget,
            opening: (row, col),
            start_time: Instant::now(),
            elapsed: None,
        };
        session.board.reveal(row, col);
        // a lucky opening can clear the whole board
        if session.board.is_won() {
            session.finish(SessionState::Won);
        }
        Ok(session)
    }

    /// Settings this game was dealt with
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Current board, player view and truth
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Flags still available to place
    pub fn flags(&self) -> &FlagBudget {
        &self.flags
    }

    /// Where the session is in the turn cycle
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The safe cell uncovered at the start
    pub fn opening(&self) -> (usize, usize) {
        self.opening
    }

    /// True once the game is won or lost
    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Won | SessionState::Lost { .. })
    }

    /// Win or loss, once finished
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::Won => Some(Outcome::Win),
            SessionState::Lost { .. } => Some(Outcome::Loss),
            _ => None,
        }
    }

    /// Whole seconds since the start, frozen once the game ends
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed
            .unwrap_or_else(|| self.start_time.elapsed())
            .as_secs()
    }

    /// Pick the cell for the next action. Hidden and flagged cells are valid targets.
    pub fn select(&mut self, row: usize, col: usize) -> Result<(), SessionError> {
        self.check_not_finished()?;
        if self.state != SessionState::AwaitingTarget {
            return Err(SessionError::WrongState);
        }
        match self.board.visibility(row, col) {
            None => Err(SessionError::OutOfBounds(row, col)),
            Some(Visibility::Revealed(_)) => Err(SessionError::AlreadyRevealed),
            Some(_) => {
                self.state = SessionState::AwaitingAction { row, col };
                Ok(())
            }
        }
    }

    /// Drop the selected target without using a turn
    pub fn cancel(&mut self) {
        if let SessionState::AwaitingAction { .. } = self.state {
            self.state = SessionState::AwaitingTarget;
        }
    }

    /// Apply an action to the selected target
    pub fn act(&mut self, action: Action) -> Result<Turn, SessionError> {
        self.check_not_finished()?;
        let SessionState::AwaitingAction { row, col } = self.state else {
            return Err(SessionError::WrongState);
        };
        self.state = SessionState::AwaitingTarget;

        match action {
            Action::Flag => Ok(Turn::Flagged(
                self.board.toggle_flag(&mut self.flags, row, col),
            )),
            Action::Reveal if self.board.has_bomb(row, col) => {
                log::debug!("bomb at ({}, {})", row, col);
                self.finish(SessionState::Lost { row, col });
                Ok(Turn::Lost)
            }
            Action::Reveal => {
                // lift a flag first so the budget gets it back
                if self.board.visibility(row, col) == Some(Visibility::Flagged) {
                    self.board.toggle_flag(&mut self.flags, row, col);
                }
                let uncovered = self.board.reveal(row, col);
                if self.board.is_won() {
                    self.finish(SessionState::Won);
                    Ok(Turn::Won)
                } else {
                    Ok(Turn::Revealed(uncovered))
                }
            }
        }
    }

    /// Score log entry for a finished game
    pub fn record(&self, name: &str) -> Option<Result<PlayerRecord, ScoreError>> {
        let outcome = self.outcome()?;
        Some(PlayerRecord::new(
            name,
            self.settings.difficulty.name(),
            self.elapsed_secs(),
            outcome,
        ))
    }

    fn finish(&mut self, state: SessionState) {
        self.state = state;
        self.elapsed = Some(self.start_time.elapsed());
        log::info!(
            "{} game over: {:?} after {}s",
            self.settings.difficulty.name(),
            state,
            self.elapsed_secs()
        );
    }

    fn check_not_finished(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            Err(SessionError::Finished)
        } else {
            Ok(())
        }
    }
}
