use thiserror::Error;

/// Startup failures. Event-path problems (bad frames, dead peers) are logged
/// where they occur and cost at most the event that carried them.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid listen port: {0:?}")]
    InvalidPort(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
