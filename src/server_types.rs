#[cfg(feature = "server")]
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::board::{Board, GameStatus};
use crate::types::{Color, Coord};

#[cfg(feature = "server")]
use crate::Response;

/// Snapshot of the game for monitoring, independent of the line protocol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub status: GameStatus,

    /// The side to move.
    pub turn: Color,

    /// The color the human plays.
    pub human: Color,

    /// Committed moves in the current game, both sides counted.
    pub moves: u32,

    /// Games started since the process came up.
    pub games: u32,

    #[serde(with = "crate::chess_serde::coord_serde")]
    pub white_king: Coord,

    #[serde(with = "crate::chess_serde::coord_serde")]
    pub black_king: Coord,

    /// Piece placement in FEN.
    #[serde(with = "crate::chess_serde::board_serde")]
    pub board: Board,
}

/// Protocol replies, including errors, travel as a successful HTTP exchange;
/// the payload carries the outcome.
#[cfg(feature = "server")]
pub(crate) fn plain_text(body: Vec<u8>) -> axum::response::Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

#[cfg(feature = "server")]
impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        plain_text(self.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;

    #[test]
    fn summary_wire_shape() {
        let mut state = BoardState::default();
        state.reset(Color::Black);
        let json = serde_json::to_value(state.summary()).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["turn"], "white");
        assert_eq!(json["human"], "black");
        assert_eq!(json["white_king"], "e1");
        assert_eq!(json["board"], "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");

        let back: GameSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, state.summary());
    }
}
