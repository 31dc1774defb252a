use crate::model::{Board, Mark};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a client may send. Decoding tolerates extra fields, so older
/// clients that echo `board`/`currentPlayer` alongside a move still parse;
/// frames with an unknown `type` fail to decode and get dropped upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Join,
    Move { index: usize },
    Reset,
    Relay { payload: Value },
}

/// Authoritative game state as both participants see it. `winner` is only
/// populated on end frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub board: Board,
    #[serde(rename = "currentPlayer")]
    pub current_player: Mark,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    pub winner: Option<Winner>,
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Sent once to each participant when a game starts; `player` is the
    /// symbol the receiver plays for the rest of the session.
    Start {
        player: Mark,
        #[serde(flatten)]
        state: GameSnapshot,
    },
    Move {
        #[serde(flatten)]
        state: GameSnapshot,
    },
    End {
        #[serde(flatten)]
        state: GameSnapshot,
    },
    Reset {
        #[serde(flatten)]
        state: GameSnapshot,
    },
    /// Verbatim forward of an opponent's relay payload.
    Relay { payload: Value },
}

/// Outcome reported on an end frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "opponent disconnected")]
    OpponentDisconnected,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Winner::X,
            Mark::O => Winner::O,
        }
    }
}
