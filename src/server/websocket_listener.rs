use crate::error::ServerError;
use crate::model::ClientMessage;
use crate::server::{ClientId, Connection, Matchmaker};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

/// Accepts WebSocket connections and feeds their frames to the matchmaker.
pub struct WebSocketListener {
    matchmaker: Matchmaker,
    address: SocketAddr,
}

impl WebSocketListener {
    pub fn new(matchmaker: Matchmaker, address: SocketAddr) -> Self {
        WebSocketListener {
            matchmaker,
            address,
        }
    }

    /// Bind and serve until the process stops. Only the bind can fail;
    /// connection tasks and transient accept errors never take the
    /// listener down.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.address).await?;
        info!("listening on ws://{}", self.address);

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };
            debug!(%peer, "incoming tcp connection");
            let matchmaker = self.matchmaker.clone();
            tokio::spawn(async move {
                handle_connection(stream, matchmaker).await;
            });
        }
    }
}

#[instrument(skip_all)]
async fn handle_connection(stream: TcpStream, matchmaker: Matchmaker) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            error!(error = ?e, "websocket handshake failed");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client_id = ClientId::new_v4();

    matchmaker
        .register_connection(Connection::new(client_id, tx))
        .await;
    info!(%client_id, "client connected");

    // Outbound pump: drains everything queued for this client.
    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_sender.send(message).await {
                debug!(error = %e, "outbound send failed, stopping pump");
                break;
            }
        }
    });

    while let Some(message) = ws_receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(frame) => matchmaker.handle_message(client_id, frame).await,
                Err(e) => debug!(%client_id, error = %e, "undecodable frame dropped"),
            },
            Ok(Message::Close(_)) => {
                debug!(%client_id, "close frame received");
                break;
            }
            // Pings are answered by the protocol layer; binary has no meaning here.
            Ok(_) => {}
            Err(e) => {
                debug!(%client_id, error = %e, "transport error, closing");
                break;
            }
        }
    }

    matchmaker.unregister_connection(client_id).await;
    info!(%client_id, "client disconnected");
    send_task.abort();
}
