use oxo_session::config::Config;
use oxo_session::error::ServerError;
use oxo_session::server::{Matchmaker, WebSocketListener};
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> Result<(), ServerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oxo_session=debug"));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .init();

    let config = Config::from_env()?;
    let matchmaker = Matchmaker::new();
    let listener = WebSocketListener::new(matchmaker, config.listen_addr());
    listener.run().await
}
