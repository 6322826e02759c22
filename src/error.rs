//! Error taxonomy for the session core.
//!
//! Every error here is recoverable: game and protocol errors are
//! reported to the offending connection only, registry errors refuse
//! the new connection at the transport boundary. Nothing in the core
//! is fatal to the process.

use derive_more::{Display, Error, From};

/// An illegal game action attempted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// The sender is not one of the two participants of the match.
    #[display("you are not a participant in this match")]
    NotParticipant,
    /// The sender's role does not own the current turn.
    #[display("not your turn")]
    NotYourTurn,
    /// The match already reached a terminal status.
    #[display("the match is already over")]
    GameOver,
    /// The cell index is outside 0..=8.
    #[display("cell index must be between 0 and 8")]
    InvalidCell,
    /// The target cell is already occupied.
    #[display("that cell is already occupied")]
    CellOccupied,
}

/// A client payload the codec could not parse.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// Input did not conform to the client message schema.
    #[display("malformed message: {_0}")]
    MalformedMessage(#[error(not(source))] String),
}

/// A resource limit reached at connection admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    /// The registry's connection capacity is exhausted.
    #[display("connection capacity reached")]
    ResourceExhausted,
}

/// A matchmaking request that cannot be honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MatchmakingError {
    /// The connection is already waiting for, or playing in, a match.
    #[display("connection is already queued or matched")]
    AlreadyMatched,
}

/// Umbrella error the session engine reports back over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// Illegal game action.
    Game(GameError),
    /// Unparseable client payload.
    Protocol(ProtocolError),
    /// Connection admission failure.
    Registry(RegistryError),
    /// Matchmaking failure.
    Matchmaking(MatchmakingError),
}

impl SessionError {
    /// Stable wire identifier for the `error` frame's `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Game(GameError::NotParticipant) => "not_participant",
            SessionError::Game(GameError::NotYourTurn) => "not_your_turn",
            SessionError::Game(GameError::GameOver) => "game_over",
            SessionError::Game(GameError::InvalidCell) => "invalid_cell",
            SessionError::Game(GameError::CellOccupied) => "cell_occupied",
            SessionError::Protocol(ProtocolError::MalformedMessage(_)) => "malformed_message",
            SessionError::Registry(RegistryError::ResourceExhausted) => "resource_exhausted",
            SessionError::Matchmaking(MatchmakingError::AlreadyMatched) => "already_matched",
        }
    }
}
