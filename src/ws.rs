//! Axum WebSocket transport bound to the session engine.
//!
//! Clients connect under the `tic-tac-toe-protocol` subprotocol. Each
//! socket gets a writer task draining an unbounded channel, so the
//! core never awaits delivery; all calls into the engine are
//! serialized through one mutex.

use crate::codec::{self, ServerMessage};
use crate::engine::{Outbound, SessionEngine};
use crate::registry::ConnectionId;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Subprotocol clients must speak.
pub const PROTOCOL: &str = "tic-tac-toe-protocol";

/// Interval between server heartbeat pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Outbound senders for live sockets; the engine's send capability.
#[derive(Debug, Default)]
struct PeerMap {
    peers: HashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

impl PeerMap {
    fn insert(&mut self, id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(id, tx);
    }

    fn remove(&mut self, id: ConnectionId) {
        self.peers.remove(&id);
    }
}

impl Outbound for PeerMap {
    fn send(&mut self, id: ConnectionId, frame: String) {
        if let Some(tx) = self.peers.get(&id) {
            // A closed channel means the socket task is winding down;
            // the engine learns of it via on_disconnect.
            let _ = tx.send(Message::Text(frame.into()));
        }
    }
}

/// Engine plus peer senders under a single lock, so every transport
/// event reaches the core strictly serialized.
#[derive(Debug)]
struct Shared {
    engine: SessionEngine,
    peers: PeerMap,
}

/// Shared server state handed to every socket task.
#[derive(Clone)]
pub struct AppState {
    shared: Arc<Mutex<Shared>>,
}

impl AppState {
    /// Creates server state admitting at most `max_connections`
    /// simultaneous clients.
    pub fn new(max_connections: usize) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine: SessionEngine::new(max_connections),
                peers: PeerMap::default(),
            })),
        }
    }

    /// Abandons matches idle for longer than `max_idle` and notifies
    /// their participants.
    pub fn reap_idle(&self, max_idle: Duration) {
        let mut guard = self.shared.lock().unwrap();
        let shared = &mut *guard;
        shared.engine.reap_idle(max_idle, &mut shared.peers);
    }
}

/// Builds the router exposing the WebSocket endpoint at `/ws`.
pub fn router(state: AppState) -> Router {
    Router::new().route("/ws", any(ws_handler)).with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.protocols([PROTOCOL])
        .on_upgrade(move |socket| handle_socket(socket, state))
}

#[instrument(skip(socket, state))]
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    // Bind the sender before on_ready so the match-start frames of an
    // immediate pairing are deliverable.
    let admitted = {
        let mut guard = state.shared.lock().unwrap();
        let shared = &mut *guard;
        match shared.engine.on_connect() {
            Ok(id) => {
                shared.peers.insert(id, tx.clone());
                shared.engine.on_ready(id, &mut shared.peers);
                Ok(id)
            }
            Err(e) => Err(e),
        }
    };

    let conn_id = match admitted {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "refusing connection");
            let refusal = ServerMessage::Error {
                kind: "resource_exhausted",
                message: e.to_string(),
            };
            let _ = sink.send(Message::Text(codec::encode(&refusal).into())).await;
            let _ = sink.send(Message::Close(None)).await;
            return;
        }
    };
    info!(%conn_id, "client connected");

    let mut writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let mut guard = state.shared.lock().unwrap();
                    let shared = &mut *guard;
                    shared.engine.on_receive(conn_id, text.as_str(), &mut shared.peers);
                }
                Some(Ok(Message::Binary(bytes))) => {
                    // The protocol is textual; tolerate clients that
                    // frame it as binary.
                    let text = String::from_utf8_lossy(&bytes);
                    let mut guard = state.shared.lock().unwrap();
                    let shared = &mut *guard;
                    shared.engine.on_receive(conn_id, &text, &mut shared.peers);
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // ping/pong handled by axum
                Some(Err(e)) => {
                    debug!(%conn_id, error = %e, "socket error");
                    break;
                }
            },
            _ = heartbeat.tick() => {
                if tx.send(Message::Ping(Bytes::new())).is_err() {
                    break;
                }
            }
            _ = &mut writer => break,
        }
    }

    {
        let mut guard = state.shared.lock().unwrap();
        let shared = &mut *guard;
        shared.peers.remove(conn_id);
        shared.engine.on_disconnect(conn_id, &mut shared.peers);
    }
    writer.abort();
    info!(%conn_id, "client disconnected");
}
