//! FIFO pairing of unmatched connections.
//!
//! The waiting queue is strictly first-in-first-out: the two
//! longest-waiting connections form the next match, and the earlier
//! of the two takes X. FIFO gives deterministic, fair wait-time
//! ordering and is trivial to test.

use crate::error::MatchmakingError;
use crate::game::{Match, MatchId};
use crate::registry::ConnectionId;
use std::collections::VecDeque;
use tracing::{debug, info, instrument};

/// Pairs waiting connections into matches.
#[derive(Debug)]
pub struct Matchmaker {
    waiting: VecDeque<ConnectionId>,
    next_match_id: MatchId,
}

impl Matchmaker {
    /// Creates a matchmaker with an empty queue.
    pub fn new() -> Self {
        Self {
            waiting: VecDeque::new(),
            next_match_id: 1,
        }
    }

    /// Appends a connection to the waiting queue.
    ///
    /// # Errors
    ///
    /// [`MatchmakingError::AlreadyMatched`] if the connection is
    /// already queued. The caller guards the already-in-a-match case
    /// against registry state before enqueueing.
    #[instrument(skip(self))]
    pub fn enqueue(&mut self, id: ConnectionId) -> Result<(), MatchmakingError> {
        if self.waiting.contains(&id) {
            return Err(MatchmakingError::AlreadyMatched);
        }
        self.waiting.push_back(id);
        debug!(%id, waiting = self.waiting.len(), "connection queued");
        Ok(())
    }

    /// Pairs the two oldest waiting connections into a new match.
    ///
    /// Returns `None` while fewer than two connections wait. The
    /// first-dequeued connection is assigned X and moves first.
    #[instrument(skip(self))]
    pub fn try_pair(&mut self) -> Option<Match> {
        if self.waiting.len() < 2 {
            return None;
        }
        let player_x = self.waiting.pop_front()?;
        let player_o = self.waiting.pop_front()?;
        let id = self.next_match_id;
        self.next_match_id += 1;
        info!(match_id = id, %player_x, %player_o, "paired waiting connections");
        Some(Match::new(id, player_x, player_o))
    }

    /// Removes a connection from the waiting queue. Idempotent; a
    /// connection that is not queued is silently ignored.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ConnectionId) {
        self.waiting.retain(|&queued| queued != id);
    }

    /// Checks whether a connection is currently queued.
    pub fn is_waiting(&self, id: ConnectionId) -> bool {
        self.waiting.contains(&id)
    }

    /// Number of connections awaiting pairing.
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new()
    }
}
