//! Live-connection registry.
//!
//! Issues opaque connection identifiers and tracks whether each live
//! connection is waiting or playing. Identifiers are monotonic and
//! never reused within the registry's lifetime.

use crate::error::RegistryError;
use crate::game::MatchId;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Opaque identifier for a live connection.
///
/// Issued by [`ConnectionRegistry::on_connect`]; invalid after
/// disconnect. Referenced, never owned, by the matchmaker and matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub struct ConnectionId(u64);

/// Whether a live connection is waiting for or playing a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not currently in a match.
    Unmatched,
    /// Participant of the given live match.
    InMatch(MatchId),
}

/// Tracks live connections and their match membership.
#[derive(Debug)]
pub struct ConnectionRegistry {
    next_id: u64,
    connections: HashMap<ConnectionId, ConnectionState>,
    capacity: usize,
}

impl ConnectionRegistry {
    /// Creates an empty registry admitting at most `capacity`
    /// simultaneous connections.
    pub fn new(capacity: usize) -> Self {
        Self {
            next_id: 1,
            connections: HashMap::new(),
            capacity,
        }
    }

    /// Admits a new connection and returns its identifier.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ResourceExhausted`] when the capacity is
    /// reached; existing connections are unaffected.
    #[instrument(skip(self))]
    pub fn on_connect(&mut self) -> Result<ConnectionId, RegistryError> {
        if self.connections.len() >= self.capacity {
            warn!(capacity = self.capacity, "refusing connection, registry full");
            return Err(RegistryError::ResourceExhausted);
        }
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.connections.insert(id, ConnectionState::Unmatched);
        info!(%id, live = self.connections.len(), "connection registered");
        Ok(id)
    }

    /// Removes a connection, returning its prior state so the caller
    /// can cascade to the matchmaker or owning match. Returns `None`
    /// for an unknown id.
    #[instrument(skip(self))]
    pub fn on_disconnect(&mut self, id: ConnectionId) -> Option<ConnectionState> {
        let state = self.connections.remove(&id);
        if state.is_some() {
            info!(%id, live = self.connections.len(), "connection removed");
        }
        state
    }

    /// Returns the state of a live connection.
    pub fn state(&self, id: ConnectionId) -> Option<ConnectionState> {
        self.connections.get(&id).copied()
    }

    /// Checks whether a connection is live.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Marks a live connection as participating in `match_id`.
    pub fn set_match(&mut self, id: ConnectionId, match_id: MatchId) {
        if let Some(state) = self.connections.get_mut(&id) {
            *state = ConnectionState::InMatch(match_id);
        }
    }

    /// Returns a live connection to the unmatched state.
    pub fn clear_match(&mut self, id: ConnectionId) {
        if let Some(state) = self.connections.get_mut(&id) {
            *state = ConnectionState::Unmatched;
        }
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Checks whether no connections are live.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
