mod board;
mod mark;
mod message;

pub use board::{Board, Cell};
pub use mark::Mark;
pub use message::{ClientMessage, GameSnapshot, ServerMessage, Winner};
