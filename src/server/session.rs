use crate::model::{Board, GameSnapshot, Mark, ServerMessage, Winner};
use crate::server::{ClientId, Connection};
use tracing::{debug, info};
use uuid::Uuid;

pub type SessionId = Uuid;

/// One paired two-player game. The first participant plays X and keeps that
/// symbol for the session's lifetime; every game within the session opens
/// with X to move.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    player_x: Connection,
    player_o: Connection,
    board: Board,
    turn: Mark,
    game_over: bool,
}

impl GameSession {
    /// Pair two connections into a fresh game and tell each participant the
    /// symbol it plays along with the initial state.
    pub fn new(player_x: Connection, player_o: Connection) -> Self {
        let session = GameSession {
            id: SessionId::new_v4(),
            player_x,
            player_o,
            board: Board::default(),
            turn: Mark::X,
            game_over: false,
        };
        info!(
            session_id = %session.id,
            player_x = %session.player_x.client_id,
            player_o = %session.player_o.client_id,
            "session started"
        );
        session.player_x.send(&ServerMessage::Start {
            player: Mark::X,
            state: session.snapshot(),
        });
        session.player_o.send(&ServerMessage::Start {
            player: Mark::O,
            state: session.snapshot(),
        });
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.mark_of(client_id).is_some()
    }

    /// The symbol a participant plays, if it belongs to this session.
    pub fn mark_of(&self, client_id: ClientId) -> Option<Mark> {
        if self.player_x.client_id == client_id {
            Some(Mark::X)
        } else if self.player_o.client_id == client_id {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The other participant's connection.
    pub fn opponent_of(&self, client_id: ClientId) -> Option<&Connection> {
        match self.mark_of(client_id)? {
            Mark::X => Some(&self.player_o),
            Mark::O => Some(&self.player_x),
        }
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current authoritative state with no outcome attached.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            current_player: self.turn,
            game_over: self.game_over,
            winner: None,
        }
    }

    /// Validate and apply one move from `requester`. An illegal move (game
    /// already decided, not the requester's turn, index off the board, cell
    /// taken) changes nothing and answers nothing; legal moves are broadcast,
    /// and a move that decides the game is followed by an end broadcast and
    /// an automatic reset.
    pub fn apply_move(&mut self, requester: ClientId, index: usize) {
        if self.game_over {
            return;
        }
        let Some(mark) = self.mark_of(requester) else {
            debug!(session_id = %self.id, client_id = %requester, "move from outside the session ignored");
            return;
        };
        if mark != self.turn {
            debug!(session_id = %self.id, %mark, "move out of turn ignored");
            return;
        }
        match self.board.cell(index) {
            Some(cell) if cell.is_empty() => {}
            _ => {
                debug!(session_id = %self.id, index, "move to an unavailable cell ignored");
                return;
            }
        }

        self.board.set(index, mark);
        self.turn = mark.other();
        self.broadcast(&ServerMessage::Move {
            state: self.snapshot(),
        });

        if let Some(winner) = self.board.winner() {
            self.finish(Winner::from(winner));
        } else if self.board.is_full() {
            self.finish(Winner::Draw);
        }
    }

    /// Start the next game in place: empty board, X to move, both sides
    /// notified. Either participant may ask for this at any point, mid-game
    /// included.
    pub fn reset(&mut self) {
        self.board = Board::default();
        self.turn = Mark::X;
        self.game_over = false;
        self.broadcast(&ServerMessage::Reset {
            state: self.snapshot(),
        });
    }

    fn finish(&mut self, winner: Winner) {
        self.game_over = true;
        info!(session_id = %self.id, ?winner, "game over");
        self.broadcast(&ServerMessage::End {
            state: GameSnapshot {
                winner: Some(winner),
                ..self.snapshot()
            },
        });
        self.reset();
    }

    fn broadcast(&self, message: &ServerMessage) {
        self.player_x.send(message);
        self.player_o.send(message);
    }
}
