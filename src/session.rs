//! Active game session: rules, persistence and cursor state in one place.

use std::path::Path;

use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument, warn};

use crate::games::breakthrough::{
    Board, Coord, Direction, FirstMove, Move, RulesError, Side, Winner, apply_move,
    initial_board, legal_moves, next_index, pieces_of,
};
use crate::store::{GameSession, SaveStore, StatisticsStore, StoreError};

/// Error raised by a session operation.
#[derive(Debug, Clone, Display, Error, From)]
pub enum SessionError {
    /// The rules engine rejected malformed input.
    #[display("Rules error: {}", _0)]
    Rules(RulesError),
    /// Saving or recording statistics failed.
    #[display("{}", _0)]
    Store(StoreError),
    /// A winner was found but the player's name is blank.
    #[display("No player name recorded for {:?}", _0)]
    #[from(ignore)]
    MissingPlayers(#[error(not(source))] Side),
    /// The session already ended.
    #[display("Game is already over")]
    #[from(ignore)]
    GameOver,
}

/// What happened to a requested move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayResult {
    /// The move is not legal for the side to move. Nothing changed.
    Rejected,
    /// The move was applied and saved; the game goes on.
    Continue,
    /// The move ended the game.
    Won {
        /// Winning side.
        side: Side,
        /// Winning player's name.
        name: String,
        /// Moves played in the finished game.
        moves: u32,
    },
}

/// What the cursor is currently picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Choosing one of the mover's pieces.
    ChoosePiece,
    /// Choosing where the piece at `from` goes.
    ChooseTarget {
        /// The selected piece.
        from: Coord,
    },
}

/// A game in progress, from first save to final result.
#[derive(Debug, Clone)]
pub struct Session {
    saves: SaveStore,
    stats: StatisticsStore,
    game: GameSession,
    phase: Phase,
    cursor: usize,
    winner: Winner,
}

impl Session {
    /// Creates a fresh game and writes its first save.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the first save cannot be written.
    #[instrument(skip(saves, stats))]
    pub fn start(
        mut saves: SaveStore,
        stats: StatisticsStore,
        height: usize,
        width: usize,
        players: [String; 2],
        first_move: FirstMove,
    ) -> Result<Self, SessionError> {
        let board = initial_board(height, width);
        let game = saves.start(board, players, first_move)?.clone();
        info!(code = %game.unique_code(), "New session started");
        Ok(Self::assemble(saves, stats, game))
    }

    /// Continues a game loaded from the save directory.
    #[instrument(skip(saves_dir, stats, game), fields(code = %game.unique_code()))]
    pub fn resume(saves_dir: impl AsRef<Path>, stats: StatisticsStore, game: GameSession) -> Self {
        let saves = SaveStore::new(saves_dir).resume(game.clone());
        Self::assemble(saves, stats, game)
    }

    fn assemble(saves: SaveStore, stats: StatisticsStore, game: GameSession) -> Self {
        Self {
            saves,
            stats,
            game,
            phase: Phase::ChoosePiece,
            cursor: 0,
            winner: Winner::None,
        }
    }

    /// Returns the persisted game state.
    pub fn game(&self) -> &GameSession {
        &self.game
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Side {
        self.game.side_to_move()
    }

    /// Returns `true` once the game has a winner.
    pub fn is_finished(&self) -> bool {
        self.winner != Winner::None
    }

    /// Returns the statistics store the session reports to.
    pub fn statistics(&self) -> &StatisticsStore {
        &self.stats
    }

    /// Lists the legal destinations of the piece at `from`.
    ///
    /// Empty when `from` is not a piece of the side to move.
    #[instrument(skip(self))]
    pub fn legal_moves(&self, from: Coord) -> Vec<Coord> {
        legal_moves(self.board(), self.side_to_move(), from)
    }

    /// Plays a move for the side to move.
    ///
    /// Illegal moves are answered with [`PlayResult::Rejected`]. A winning
    /// move records the result in the statistics file before the save file
    /// is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the game is over, saving fails, or the
    /// winner has no name on record.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn play(&mut self, mv: Move) -> Result<PlayResult, SessionError> {
        if self.is_finished() {
            return Err(SessionError::GameOver);
        }

        if !self.legal_moves(mv.from).contains(&mv.to) {
            debug!(side = ?self.side_to_move(), "Move rejected");
            return Ok(PlayResult::Rejected);
        }

        let outcome = apply_move(self.board(), mv)?;
        let moves = self.game.move_count() + 1;

        let Some(side) = outcome.winner.side() else {
            self.game = self.saves.record_move(outcome.board)?.clone();
            self.reset_cursor();
            return Ok(PlayResult::Continue);
        };

        let name = self.game.player_name(side).trim().to_string();
        if name.is_empty() {
            warn!(?side, "Winner has no player name");
            return Err(SessionError::MissingPlayers(side));
        }

        self.stats.record_win(&name, moves)?;
        let mut finished = self.saves.finish()?;
        debug!(code = %finished.unique_code(), "Save file retired");
        finished.advance(outcome.board);
        self.game = finished;
        self.winner = outcome.winner;
        info!(winner = %name, ?side, moves, "Game over");
        Ok(PlayResult::Won { side, name, moves })
    }

    /// Returns the winner, or [`Winner::None`] while the game goes on.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Returns the current cursor phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cells the cursor can currently visit.
    #[instrument(skip(self))]
    pub fn candidates(&self) -> Vec<Coord> {
        match self.phase {
            Phase::ChoosePiece => pieces_of(self.board(), self.side_to_move()),
            Phase::ChooseTarget { from } => self.legal_moves(from),
        }
    }

    /// Returns the cell under the cursor.
    #[instrument(skip(self))]
    pub fn cursor(&self) -> Option<Coord> {
        self.candidates().get(self.cursor).copied()
    }

    /// Moves the cursor one step.
    #[instrument(skip(self))]
    pub fn navigate(&mut self, direction: Direction) -> Option<Coord> {
        let candidates = self.candidates();
        self.cursor = next_index(&candidates, self.cursor, direction);
        candidates.get(self.cursor).copied()
    }

    /// Acts on the cell under the cursor.
    ///
    /// While choosing a piece, a piece with legal moves is selected and a
    /// piece without any is ignored. While choosing a target, the move is
    /// played.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if playing the move fails.
    #[instrument(skip(self))]
    pub fn confirm(&mut self) -> Result<Option<PlayResult>, SessionError> {
        let Some(at) = self.cursor() else {
            return Ok(None);
        };

        match self.phase {
            Phase::ChoosePiece => {
                if self.legal_moves(at).is_empty() {
                    debug!(%at, "Selected piece has no moves");
                } else {
                    self.phase = Phase::ChooseTarget { from: at };
                    self.cursor = 0;
                }
                Ok(None)
            }
            Phase::ChooseTarget { from } => self.play(Move::new(from, at)).map(Some),
        }
    }

    /// Drops the selected piece and returns to piece selection.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        self.phase = Phase::ChoosePiece;
        self.cursor = 0;
    }
}
