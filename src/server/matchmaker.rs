use crate::model::{ClientMessage, GameSnapshot, ServerMessage, Winner};
use crate::server::{ClientId, Connection, GameSession, SessionId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Pairs connections into sessions and routes their frames. Clones share
/// state, so the listener can hand one to every socket task.
#[derive(Clone)]
pub struct Matchmaker {
    state: Arc<RwLock<MatchmakerState>>,
}

/// All matchmaking bookkeeping behind one lock, so pairing, routing and
/// teardown each happen atomically. `members` indexes participants by
/// connection for O(1) routing.
#[derive(Default)]
struct MatchmakerState {
    connections: HashMap<ClientId, Connection>,
    waiting: Option<ClientId>,
    sessions: HashMap<SessionId, GameSession>,
    members: HashMap<ClientId, SessionId>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Matchmaker {
            state: Arc::new(RwLock::new(MatchmakerState::default())),
        }
    }

    /// Track a freshly accepted connection. Its frames and close event are
    /// fed back in by the socket task that owns it.
    #[instrument(skip_all, fields(client_id = %connection.client_id))]
    pub async fn register_connection(&self, connection: Connection) {
        let mut state = self.state.write().await;
        state.connections.insert(connection.client_id, connection);
        debug!(connections = state.connections.len(), "connection registered");
    }

    /// Forget a closed connection: free the waiting slot if it held it, and
    /// tear down its session with a single end notification to the opponent.
    #[instrument(skip(self))]
    pub async fn unregister_connection(&self, client_id: ClientId) {
        let mut state = self.state.write().await;
        state.connections.remove(&client_id);
        if state.waiting == Some(client_id) {
            debug!("waiting connection left");
            state.waiting = None;
        }
        let Some(session_id) = state.members.remove(&client_id) else {
            return;
        };
        let Some(session) = state.sessions.remove(&session_id) else {
            return;
        };
        if let Some(opponent) = session.opponent_of(client_id) {
            state.members.remove(&opponent.client_id);
            info!(
                session_id = %session.id(),
                opponent = %opponent.client_id,
                "participant disconnected, session closed"
            );
            opponent.send(&ServerMessage::End {
                state: GameSnapshot {
                    game_over: true,
                    winner: Some(Winner::OpponentDisconnected),
                    ..session.snapshot()
                },
            });
        }
    }

    /// Route one decoded frame. The sender's identity travels with the
    /// event; frames from connections that were never registered (or are
    /// already gone) are dropped.
    #[instrument(skip(self, message))]
    pub async fn handle_message(&self, client_id: ClientId, message: ClientMessage) {
        let mut state = self.state.write().await;
        if !state.connections.contains_key(&client_id) {
            debug!("frame from an unknown connection dropped");
            return;
        }
        match message {
            ClientMessage::Join => state.join(client_id),
            ClientMessage::Move { index } => match state.session_of_mut(client_id) {
                Some(session) => session.apply_move(client_id, index),
                None => debug!("move from a connection with no session ignored"),
            },
            ClientMessage::Reset => match state.session_of_mut(client_id) {
                Some(session) => session.reset(),
                None => debug!("reset from a connection with no session ignored"),
            },
            ClientMessage::Relay { payload } => state.relay(client_id, payload),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }

    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    /// Connection currently waiting for an opponent, if any.
    pub async fn waiting(&self) -> Option<ClientId> {
        self.state.read().await.waiting
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchmakerState {
    fn join(&mut self, client_id: ClientId) {
        if self.members.contains_key(&client_id) {
            debug!(%client_id, "join from a paired connection ignored");
            return;
        }
        match self.waiting {
            Some(waiting_id) if waiting_id == client_id => {
                debug!(%client_id, "duplicate join from the waiting connection ignored");
            }
            Some(waiting_id) => {
                // The joiner is registered (its frame just came through); only
                // the waiting entry could be stale.
                match (
                    self.connections.get(&waiting_id).cloned(),
                    self.connections.get(&client_id).cloned(),
                ) {
                    (Some(player_x), Some(player_o)) => {
                        let session = GameSession::new(player_x, player_o);
                        let session_id = session.id();
                        self.waiting = None;
                        self.members.insert(waiting_id, session_id);
                        self.members.insert(client_id, session_id);
                        self.sessions.insert(session_id, session);
                    }
                    _ => {
                        warn!(%waiting_id, %client_id, "stale waiting entry, joiner takes the slot");
                        self.waiting = Some(client_id);
                    }
                }
            }
            None => {
                info!(%client_id, "waiting for an opponent");
                self.waiting = Some(client_id);
            }
        }
    }

    fn relay(&self, client_id: ClientId, payload: Value) {
        let Some(session) = self.session_of(client_id) else {
            debug!(%client_id, "relay from a connection with no session dropped");
            return;
        };
        if let Some(opponent) = session.opponent_of(client_id) {
            debug!(from = %client_id, to = %opponent.client_id, "relaying payload");
            opponent.send(&ServerMessage::Relay { payload });
        }
    }

    fn session_of(&self, client_id: ClientId) -> Option<&GameSession> {
        let session_id = self.members.get(&client_id)?;
        self.sessions.get(session_id)
    }

    fn session_of_mut(&mut self, client_id: ClientId) -> Option<&mut GameSession> {
        let session_id = self.members.get(&client_id)?;
        self.sessions.get_mut(session_id)
    }
}
