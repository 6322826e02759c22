//! Wire codec: JSON text frames to and from typed messages.
//!
//! The codec owns the mapping between bytes and typed variants; the
//! rest of the core never touches serialization. Inbound decoding is
//! a closed tagged-variant parse — an unknown or missing `type` is a
//! malformed message, never a silent default. Outbound encoding is
//! total over well-formed internal state.

use crate::error::ProtocolError;
use crate::game::{Board, Cell, Mark, MatchStatus};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Client-to-server request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Place the sender's mark at a cell (0..=8 after validation;
    /// range is checked by the match, not the codec).
    Move {
        /// Row-major board index.
        cell: usize,
    },
    /// Give up the current match.
    Forfeit,
}

/// Server-to-client event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// The sender has been paired; the opponent is ready.
    MatchStart {
        /// Role assigned to the recipient.
        role: Mark,
    },
    /// Authoritative post-move snapshot, broadcast to both players.
    State {
        /// Current board.
        board: Board,
        /// Role that owns the next move.
        turn: Mark,
        /// Live or terminal status.
        status: MatchStatus,
    },
    /// An error caused by the recipient's own request.
    Error {
        /// Stable machine-readable kind.
        kind: &'static str,
        /// Human-readable explanation.
        message: String,
    },
    /// The match reached a terminal status.
    MatchEnd {
        /// The terminal status.
        status: MatchStatus,
    },
}

/// Wire shape for [`ServerMessage`]; field layout matches the schema
/// clients consume.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent<'a> {
    MatchStart {
        role: &'static str,
    },
    State {
        board: [&'static str; 9],
        turn: &'static str,
        status: &'static str,
    },
    Error {
        kind: &'static str,
        message: &'a str,
    },
    MatchEnd {
        status: &'static str,
    },
}

fn mark_str(mark: Mark) -> &'static str {
    match mark {
        Mark::X => "X",
        Mark::O => "O",
    }
}

fn cell_str(cell: Cell) -> &'static str {
    match cell {
        Cell::Empty => "",
        Cell::Occupied(mark) => mark_str(mark),
    }
}

fn status_str(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::InProgress => "in_progress",
        MatchStatus::WonBy(Mark::X) => "won_x",
        MatchStatus::WonBy(Mark::O) => "won_o",
        MatchStatus::Draw => "draw",
        MatchStatus::Abandoned => "abandoned",
    }
}

fn board_strs(board: &Board) -> [&'static str; 9] {
    let mut out = [""; 9];
    for (slot, &cell) in out.iter_mut().zip(board.cells().iter()) {
        *slot = cell_str(cell);
    }
    out
}

/// Parses one inbound payload into a typed client request.
///
/// # Errors
///
/// [`ProtocolError::MalformedMessage`] on any input that does not
/// conform to the schema: invalid JSON, missing or unknown `type`,
/// missing fields, or fields of the wrong type.
#[instrument]
pub fn decode(payload: &str) -> Result<ClientMessage, ProtocolError> {
    serde_json::from_str(payload).map_err(|e| ProtocolError::MalformedMessage(e.to_string()))
}

/// Serializes one outbound event to its wire frame. Total: every
/// well-formed [`ServerMessage`] has a frame.
pub fn encode(message: &ServerMessage) -> String {
    let wire = match message {
        ServerMessage::MatchStart { role } => WireEvent::MatchStart {
            role: mark_str(*role),
        },
        ServerMessage::State {
            board,
            turn,
            status,
        } => WireEvent::State {
            board: board_strs(board),
            turn: mark_str(*turn),
            status: status_str(*status),
        },
        ServerMessage::Error { kind, message } => WireEvent::Error {
            kind: *kind,
            message: message.as_str(),
        },
        ServerMessage::MatchEnd { status } => WireEvent::MatchEnd {
            status: status_str(*status),
        },
    };
    serde_json::to_string(&wire).expect("wire events serialize")
}
