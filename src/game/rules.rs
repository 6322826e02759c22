//! Match state machine: turn order, move validation, termination.

use super::types::{Board, Mark, MatchStatus};
use crate::error::GameError;
use crate::registry::ConnectionId;
use tracing::{info, instrument};

/// Unique identifier for a match, issued by the matchmaker.
pub type MatchId = u64;

/// One tic-tac-toe match between exactly two connections.
///
/// Mutated only through [`Match::apply_move`] and [`Match::abandon`].
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    player_x: ConnectionId,
    player_o: ConnectionId,
    board: Board,
    turn: Mark,
    status: MatchStatus,
}

impl Match {
    /// Creates a fresh match. The first-dequeued connection takes X
    /// and therefore moves first.
    #[instrument]
    pub fn new(id: MatchId, player_x: ConnectionId, player_o: ConnectionId) -> Self {
        info!(match_id = id, %player_x, %player_o, "match created");
        Self {
            id,
            player_x,
            player_o,
            board: Board::new(),
            turn: Mark::X,
            status: MatchStatus::InProgress,
        }
    }

    /// Returns the match identifier.
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Returns the participants as (X, O).
    pub fn players(&self) -> (ConnectionId, ConnectionId) {
        (self.player_x, self.player_o)
    }

    /// Returns the role a connection plays, if it is a participant.
    pub fn role_of(&self, id: ConnectionId) -> Option<Mark> {
        if id == self.player_x {
            Some(Mark::X)
        } else if id == self.player_o {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Returns the other participant, if `id` is a participant.
    pub fn opponent_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        match self.role_of(id)? {
            Mark::X => Some(self.player_o),
            Mark::O => Some(self.player_x),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the role that owns the current turn. Frozen once the
    /// match reaches a terminal status.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Returns the match status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Validates and applies one move by the given connection.
    ///
    /// On success the board holds the new mark and the status reflects
    /// any termination; the caller broadcasts the post-move snapshot.
    /// On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotParticipant`] if `id` is neither player.
    /// - [`GameError::GameOver`] if the status is already terminal.
    /// - [`GameError::NotYourTurn`] if `id`'s role is not up.
    /// - [`GameError::InvalidCell`] if `cell` is outside 0..=8.
    /// - [`GameError::CellOccupied`] if the cell is taken.
    #[instrument(skip(self), fields(match_id = self.id))]
    pub fn apply_move(&mut self, id: ConnectionId, cell: usize) -> Result<(), GameError> {
        let role = self.role_of(id).ok_or(GameError::NotParticipant)?;

        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        if role != self.turn {
            return Err(GameError::NotYourTurn);
        }
        if cell >= 9 {
            return Err(GameError::InvalidCell);
        }
        if !self.board.is_empty(cell) {
            return Err(GameError::CellOccupied);
        }

        self.board.set(cell, role);

        if let Some(winner) = self.board.winner() {
            self.status = MatchStatus::WonBy(winner);
            info!(match_id = self.id, %winner, "match won");
        } else if self.board.is_full() {
            self.status = MatchStatus::Draw;
            info!(match_id = self.id, "match drawn");
        } else {
            self.turn = self.turn.opponent();
        }

        Ok(())
    }

    /// Abandons the match. Only an in-progress match transitions;
    /// calling again, or on an already-terminal match, is a no-op.
    ///
    /// Returns whether a transition occurred, so the caller can
    /// notify participants exactly once.
    #[instrument(skip(self), fields(match_id = self.id))]
    pub fn abandon(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = MatchStatus::Abandoned;
        info!(match_id = self.id, "match abandoned");
        true
    }
}
