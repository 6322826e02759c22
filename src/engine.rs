//! Session engine: wires transport events to the registry, the
//! matchmaker, and the live-match table.
//!
//! The engine assumes strictly serialized calls — one inbound
//! transport event at a time. It never blocks on I/O: every outbound
//! frame is a fire-and-forget enqueue through [`Outbound`], so a
//! multi-threaded transport only has to funnel events through one
//! lock or work queue before reaching the core.

use crate::codec::{self, ClientMessage, ServerMessage};
use crate::error::{GameError, MatchmakingError, RegistryError, SessionError};
use crate::game::{Mark, Match, MatchId, MatchStatus};
use crate::matchmaker::Matchmaker;
use crate::registry::{ConnectionId, ConnectionRegistry, ConnectionState};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Outbound send capability provided by the transport layer.
///
/// The engine is agnostic to whether the other side is a WebSocket
/// peer or an in-process test harness.
pub trait Outbound {
    /// Queues one encoded frame for delivery. Must not block; frames
    /// addressed to a connection that is gone are dropped.
    fn send(&mut self, id: ConnectionId, frame: String);
}

/// Orchestrates connection lifecycle, matchmaking, and match play.
#[derive(Debug)]
pub struct SessionEngine {
    registry: ConnectionRegistry,
    matchmaker: Matchmaker,
    matches: HashMap<MatchId, Match>,
    last_activity: HashMap<MatchId, Instant>,
}

impl SessionEngine {
    /// Creates an engine admitting at most `capacity` simultaneous
    /// connections.
    pub fn new(capacity: usize) -> Self {
        info!(capacity, "session engine initialized");
        Self {
            registry: ConnectionRegistry::new(capacity),
            matchmaker: Matchmaker::new(),
            matches: HashMap::new(),
            last_activity: HashMap::new(),
        }
    }

    /// Admits a new connection and returns its identifier.
    ///
    /// The transport must bind its outbound sender to the returned id
    /// before calling [`SessionEngine::on_ready`], so the first frames
    /// of a match have somewhere to go.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ResourceExhausted`] when the connection limit
    /// is reached; the transport refuses the connection and no
    /// existing match is affected.
    #[instrument(skip(self))]
    pub fn on_connect(&mut self) -> Result<ConnectionId, RegistryError> {
        self.registry.on_connect()
    }

    /// Queues an admitted connection for pairing, and starts a match
    /// immediately when an opponent is already waiting.
    ///
    /// On pairing, both participants receive `MatchStart` with their
    /// assigned role, then the initial state: empty board, X to move.
    #[instrument(skip(self, out))]
    pub fn on_ready(&mut self, id: ConnectionId, out: &mut impl Outbound) {
        match self.registry.state(id) {
            None => {
                warn!(%id, "ready signal for unknown connection");
                return;
            }
            Some(ConnectionState::InMatch(_)) => {
                self.send_error(out, id, &MatchmakingError::AlreadyMatched.into());
                return;
            }
            Some(ConnectionState::Unmatched) => {}
        }
        if let Err(e) = self.matchmaker.enqueue(id) {
            self.send_error(out, id, &e.into());
            return;
        }

        if let Some(started) = self.matchmaker.try_pair() {
            let (x, o) = started.players();
            let match_id = started.id();
            self.registry.set_match(x, match_id);
            self.registry.set_match(o, match_id);

            self.send(out, x, &ServerMessage::MatchStart { role: Mark::X });
            self.send(out, o, &ServerMessage::MatchStart { role: Mark::O });
            let opening = ServerMessage::State {
                board: started.board().clone(),
                turn: started.turn(),
                status: started.status(),
            };
            self.send(out, x, &opening);
            self.send(out, o, &opening);

            self.last_activity.insert(match_id, Instant::now());
            self.matches.insert(match_id, started);
        }
    }

    /// Handles one inbound payload from a connection.
    ///
    /// Decode failures and rejected game actions are reported to the
    /// sender only; the opponent and every other match are untouched.
    #[instrument(skip(self, payload, out))]
    pub fn on_receive(&mut self, id: ConnectionId, payload: &str, out: &mut impl Outbound) {
        if !self.registry.contains(id) {
            warn!(%id, "payload from unknown connection dropped");
            return;
        }

        let message = match codec::decode(payload) {
            Ok(m) => m,
            Err(e) => {
                debug!(%id, error = %e, "rejecting malformed payload");
                self.send_error(out, id, &e.into());
                return;
            }
        };

        match message {
            ClientMessage::Move { cell } => self.handle_move(id, cell, out),
            ClientMessage::Forfeit => self.handle_forfeit(id, out),
        }
    }

    /// Handles a closed connection: queue removal, registry removal,
    /// and abandonment of any live match, with exactly one
    /// `MatchEnd(Abandoned)` to the surviving participant.
    #[instrument(skip(self, out))]
    pub fn on_disconnect(&mut self, id: ConnectionId, out: &mut impl Outbound) {
        self.matchmaker.remove(id);

        let Some(state) = self.registry.on_disconnect(id) else {
            return;
        };
        if let ConnectionState::InMatch(match_id) = state
            && let Some(m) = self.matches.get_mut(&match_id)
            && m.abandon()
        {
            info!(match_id, %id, reason = "disconnect", "match abandoned");
            if let Some(survivor) = m.opponent_of(id)
                && self.registry.contains(survivor)
            {
                self.send(out, survivor, &ServerMessage::MatchEnd { status: MatchStatus::Abandoned });
            }
            self.retire(match_id);
        }
    }

    /// Abandons matches with no accepted move for `max_idle`,
    /// notifying both participants. Driven by an external timer task;
    /// the core itself mandates no timeouts.
    #[instrument(skip(self, out))]
    pub fn reap_idle(&mut self, max_idle: Duration, out: &mut impl Outbound) {
        let now = Instant::now();
        let stale: Vec<MatchId> = self
            .last_activity
            .iter()
            .filter(|&(_, &at)| now.duration_since(at) >= max_idle)
            .map(|(&match_id, _)| match_id)
            .collect();

        for match_id in stale {
            if let Some(m) = self.matches.get_mut(&match_id)
                && m.abandon()
            {
                info!(match_id, reason = "timeout", "match abandoned");
                let (x, o) = m.players();
                for participant in [x, o] {
                    if self.registry.contains(participant) {
                        self.send(
                            out,
                            participant,
                            &ServerMessage::MatchEnd { status: MatchStatus::Abandoned },
                        );
                    }
                }
                self.retire(match_id);
            }
        }
    }

    /// Number of live matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    fn handle_move(&mut self, id: ConnectionId, cell: usize, out: &mut impl Outbound) {
        let Some(match_id) = self.match_of(id) else {
            self.send_error(out, id, &GameError::NotParticipant.into());
            return;
        };
        // Matches are retired once terminal, so a live entry always exists.
        let Some(m) = self.matches.get_mut(&match_id) else {
            warn!(%id, match_id, "registry points at missing match");
            self.send_error(out, id, &GameError::NotParticipant.into());
            return;
        };

        if let Err(e) = m.apply_move(id, cell) {
            debug!(%id, match_id, cell, error = %e, "move rejected");
            self.send_error(out, id, &e.into());
            return;
        }

        let (x, o) = m.players();
        let snapshot = ServerMessage::State {
            board: m.board().clone(),
            turn: m.turn(),
            status: m.status(),
        };
        let status = m.status();
        self.send(out, x, &snapshot);
        self.send(out, o, &snapshot);

        if status.is_terminal() {
            let end = ServerMessage::MatchEnd { status };
            self.send(out, x, &end);
            self.send(out, o, &end);
            self.retire(match_id);
        } else {
            self.last_activity.insert(match_id, Instant::now());
        }
    }

    fn handle_forfeit(&mut self, id: ConnectionId, out: &mut impl Outbound) {
        let Some(match_id) = self.match_of(id) else {
            self.send_error(out, id, &GameError::NotParticipant.into());
            return;
        };
        if let Some(m) = self.matches.get_mut(&match_id)
            && m.abandon()
        {
            info!(match_id, %id, reason = "forfeit", "match abandoned");
            let (x, o) = m.players();
            let end = ServerMessage::MatchEnd { status: MatchStatus::Abandoned };
            self.send(out, x, &end);
            self.send(out, o, &end);
            self.retire(match_id);
        }
    }

    fn match_of(&self, id: ConnectionId) -> Option<MatchId> {
        match self.registry.state(id)? {
            ConnectionState::InMatch(match_id) => Some(match_id),
            ConnectionState::Unmatched => None,
        }
    }

    /// Drops a terminal match and returns its participants to the
    /// unmatched state. Participants are not re-queued.
    fn retire(&mut self, match_id: MatchId) {
        self.last_activity.remove(&match_id);
        if let Some(m) = self.matches.remove(&match_id) {
            let (x, o) = m.players();
            self.registry.clear_match(x);
            self.registry.clear_match(o);
            debug!(match_id, "match retired");
        }
    }

    fn send(&self, out: &mut impl Outbound, id: ConnectionId, message: &ServerMessage) {
        out.send(id, codec::encode(message));
    }

    fn send_error(&self, out: &mut impl Outbound, id: ConnectionId, error: &SessionError) {
        let frame = ServerMessage::Error {
            kind: error.kind(),
            message: error.to_string(),
        };
        self.send(out, id, &frame);
    }
}
