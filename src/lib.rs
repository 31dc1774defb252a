pub mod config;
pub mod error;
pub mod model;
pub mod server;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::ServerError;
    pub use crate::model::Board;
    pub use crate::model::Cell;
    pub use crate::model::ClientMessage;
    pub use crate::model::GameSnapshot;
    pub use crate::model::Mark;
    pub use crate::model::ServerMessage;
    pub use crate::model::Winner;
    pub use crate::server::ClientId;
    pub use crate::server::Connection;
    pub use crate::server::GameSession;
    pub use crate::server::Matchmaker;
    pub use crate::server::SessionId;
    pub use crate::server::WebSocketListener;
}
