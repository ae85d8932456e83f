use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::board::{BoardState, GameStatus};
use crate::command::{Command, MoveCommand};
use crate::opponent::{NaiveOpponent, Opponent, Proposal};
use crate::response::{Response, ResponseSlot};
use crate::rules::{settle, validate_move};
use crate::server_types::GameSummary;
use crate::types::Color;
use crate::Device;

/// The one shared game.
///
/// Two locks guard disjoint data: `board` covers the whole [`BoardState`],
/// `response` covers the outbound slot. Whenever a request needs both, the
/// board guard is dropped before the response lock is taken.
pub struct Game<O = NaiveOpponent> {
    board: RwLock<BoardState>,
    response: ResponseSlot,
    opponent: O,
}

impl Game {
    pub fn new() -> Self {
        Self::with_opponent(NaiveOpponent)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects a request from `side` when no game is running or it is the other
/// side's turn.
fn precheck(state: &BoardState, side: Color) -> Option<Response> {
    if !state.status().is_active() {
        Some(Response::NoGame)
    } else if state.turn() != side {
        Some(Response::OutOfTurn)
    } else {
        None
    }
}

impl<O: Opponent> Game<O> {
    pub fn with_opponent(opponent: O) -> Self {
        Self::with_state(BoardState::default(), opponent)
    }

    /// Starts from an existing position, e.g. one built with
    /// [`BoardState::from_fen`].
    pub fn with_state(state: BoardState, opponent: O) -> Self {
        Self {
            board: RwLock::new(state),
            response: ResponseSlot::default(),
            opponent,
        }
    }

    /// Runs one command line, publishes its outcome and returns it.
    #[instrument(level = "debug", skip_all, fields(len = line.len()))]
    pub async fn submit(&self, line: &[u8]) -> Response {
        let response = match Command::parse(line) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                debug!(error = %e, "rejected command line");
                e.into()
            }
        };
        self.response.publish(response).await;
        response
    }

    pub async fn pending(&self) -> Response {
        self.response.pending().await
    }

    pub async fn summary(&self) -> GameSummary {
        self.board.read().await.summary()
    }

    async fn dispatch(&self, command: Command) -> Response {
        match command {
            Command::NewGame(human) => self.new_game(human).await,
            Command::Query => self.query().await,
            Command::Move(mv) => self.human_move(mv).await,
            Command::ComputerMove => self.computer_move().await,
            Command::Resign => self.resign().await,
        }
    }

    async fn new_game(&self, human: Color) -> Response {
        let mut state = self.board.write().await;
        state.reset(human);
        info!(%human, game = state.games(), "new game");
        Response::Ok
    }

    async fn query(&self) -> Response {
        let state = self.board.read().await;
        if state.games() == 0 {
            Response::NoGame
        } else {
            Response::Board(state.snapshot())
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn human_move(&self, mv: MoveCommand) -> Response {
        {
            let state = self.board.read().await;
            if let Some(rejection) = precheck(&state, state.human()) {
                return rejection;
            }
        }

        // Someone else may have moved between the two guards.
        let mut state = self.board.write().await;
        if let Some(rejection) = precheck(&state, state.human()) {
            return rejection;
        }
        let human = state.human();
        match validate_move(&mut state, human, &mv) {
            Ok(outcome) => {
                debug!(from = %outcome.from, to = %outcome.to, "human moved");
                settle(&mut state, human.opposite()).into()
            }
            Err(e) => {
                debug!(reason = %e, "illegal move");
                e.into()
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn computer_move(&self) -> Response {
        {
            let state = self.board.read().await;
            if let Some(rejection) = precheck(&state, state.computer()) {
                return rejection;
            }
        }

        let mut state = self.board.write().await;
        if let Some(rejection) = precheck(&state, state.computer()) {
            return rejection;
        }
        let side = state.computer();
        let (from, to) = match self.opponent.propose(&state, side) {
            Proposal::Move { from, to } => (from, to),
            Proposal::NoMove => {
                state.set_status(GameStatus::Stalemate);
                info!(%side, "computer has no move, game tied");
                return Response::Tie;
            }
        };

        let Some(piece) = state.board().get(from).occupant() else {
            error!(%from, "opponent proposed a move from an empty square");
            return Response::IllegalMove;
        };
        let mv = MoveCommand {
            piece,
            from,
            to,
            capture: state.board().get(to).occupant(),
            promotion: None,
        };
        match validate_move(&mut state, side, &mv) {
            Ok(_) => {
                debug!(%from, %to, "computer moved");
                settle(&mut state, side.opposite()).into()
            }
            Err(e) => {
                error!(reason = %e, %from, %to, "opponent proposed an illegal move");
                e.into()
            }
        }
    }

    async fn resign(&self) -> Response {
        {
            let state = self.board.read().await;
            if let Some(rejection) = resign_precheck(&state) {
                return rejection;
            }
        }

        let mut state = self.board.write().await;
        if let Some(rejection) = resign_precheck(&state) {
            return rejection;
        }
        let human = state.human();
        state.set_status(GameStatus::Resigned);
        info!(%human, "resigned");
        Response::Ok
    }
}

/// A mated game reports the mate; otherwise resigning follows the same
/// rules as a human move.
fn resign_precheck(state: &BoardState) -> Option<Response> {
    if state.status() == GameStatus::Mate {
        Some(Response::Mate)
    } else {
        precheck(state, state.human())
    }
}

#[async_trait]
impl<O: Opponent> Device for Game<O> {
    async fn write(&self, buf: &[u8]) -> usize {
        self.submit(buf).await;
        buf.len()
    }

    async fn read(&self) -> Vec<u8> {
        self.pending().await.as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn rejected_resignation_only_reads_the_board() {
        let game = Game::new();
        let guard = game.board.read().await;
        let outcome = timeout(Duration::from_secs(1), game.resign())
            .await
            .expect("resign waited on the write lock");
        assert_eq!(outcome, Response::NoGame);
        drop(guard);

        game.submit(b"00 B\n").await;
        let _guard = game.board.read().await;
        let outcome = timeout(Duration::from_secs(1), game.resign())
            .await
            .expect("resign waited on the write lock");
        assert_eq!(outcome, Response::OutOfTurn);
    }

    #[tokio::test]
    async fn resignation_ends_the_game() {
        let game = Game::new();
        game.submit(b"00 W\n").await;
        assert_eq!(game.resign().await, Response::Ok);
        assert_eq!(game.board.read().await.status(), GameStatus::Resigned);
        assert_eq!(game.resign().await, Response::NoGame);
    }
}
