use crate::model::ServerMessage;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error};
use uuid::Uuid;

pub type ClientId = Uuid;

/// Handle to one remote participant: its identity plus the outbound queue
/// drained by that connection's writer task.
#[derive(Debug, Clone)]
pub struct Connection {
    pub client_id: ClientId,
    sender: UnboundedSender<Message>,
}

impl Connection {
    pub fn new(client_id: ClientId, sender: UnboundedSender<Message>) -> Self {
        Connection { client_id, sender }
    }

    /// Queue a frame for this participant. A failed send means the socket
    /// task already stopped; the close event on that socket cleans up, so
    /// the failure is only logged here.
    pub fn send(&self, message: &ServerMessage) {
        let serialized = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                error!(error = ?e, "failed to serialize outbound frame");
                return;
            }
        };
        if let Err(e) = self.sender.send(Message::text(serialized)) {
            debug!(client_id = %self.client_id, error = %e, "dropping frame for closed connection");
        }
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.client_id == other.client_id
    }
}
