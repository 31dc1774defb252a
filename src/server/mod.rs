mod connection;
mod matchmaker;
mod session;
mod websocket_listener;

pub use connection::{ClientId, Connection};
pub use matchmaker::Matchmaker;
pub use session::{GameSession, SessionId};
pub use websocket_listener::WebSocketListener;
