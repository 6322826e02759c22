//! Gridlock - WebSocket tic-tac-toe match server.
//!
//! # Architecture
//!
//! - **Engine**: the serialized session core — connection registry,
//!   FIFO matchmaker, and the live-match table.
//! - **Game**: the match state machine (turn order, move validation,
//!   win/draw/abandon termination).
//! - **Codec**: JSON wire frames to and from typed messages.
//! - **Transport**: the axum WebSocket layer feeding the engine.
//!
//! The engine is transport-agnostic: it consumes connect/receive/close
//! events and emits frames through the [`Outbound`] capability, so
//! tests drive it with an in-process harness instead of sockets.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod codec;
mod engine;
mod error;
mod game;
mod matchmaker;
mod registry;
mod ws;

// Crate-level exports - codec
pub use codec::{decode, encode, ClientMessage, ServerMessage};

// Crate-level exports - session engine
pub use engine::{Outbound, SessionEngine};

// Crate-level exports - error taxonomy
pub use error::{GameError, MatchmakingError, ProtocolError, RegistryError, SessionError};

// Crate-level exports - game types
pub use game::{Board, Cell, Mark, Match, MatchId, MatchStatus};

// Crate-level exports - matchmaking and connections
pub use matchmaker::Matchmaker;
pub use registry::{ConnectionId, ConnectionRegistry, ConnectionState};

// Crate-level exports - transport
pub use ws::{router, AppState, PROTOCOL};
