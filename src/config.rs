use crate::error::ServerError;
use std::net::SocketAddr;

/// Port the match server listens on when `OXO_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Config {
    /// Read configuration from the environment. `OXO_PORT` overrides the
    /// default port and must parse as a port number.
    pub fn from_env() -> Result<Self, ServerError> {
        let port = match std::env::var("OXO_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| ServerError::InvalidPort(value))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Config { port })
    }

    /// Address the listener binds, on all interfaces.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config { port: DEFAULT_PORT }
    }
}
