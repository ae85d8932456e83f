use tracing::info;

use crate::board::{Board, BoardState, GameStatus};
use crate::rules::{is_attacked, KING_STEPS};
use crate::types::{Color, Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KingSafety {
    Safe,
    Check,
    Mate,
}

/// Adjacent squares the king of `color` on `king` could step to without
/// being attacked, in scan order.
///
/// The king is lifted off its square for the test, so squares along the line
/// of an attacker behind it are not mistaken for shielded ones. Only king
/// relocation counts as an escape: blocking the attacker or capturing it
/// with another piece is not considered.
pub fn king_escapes(board: &Board, king: Coord, color: Color) -> impl Iterator<Item = Coord> {
    let mut lifted = *board;
    lifted.take(king);
    KING_STEPS
        .into_iter()
        .filter_map(move |(dr, df)| king.offset(dr, df))
        .filter(move |&to| !lifted.get(to).is_color(color) && !is_attacked(&lifted, to, color))
}

/// Classifies the safety of `color`'s king on `board`.
pub fn assess(board: &Board, king: Coord, color: Color) -> KingSafety {
    if !is_attacked(board, king, color) {
        KingSafety::Safe
    } else if king_escapes(board, king, color).next().is_some() {
        KingSafety::Check
    } else {
        KingSafety::Mate
    }
}

/// Looks at `defender`'s king after the other side moved and records the
/// resulting game status. A mate ends the game.
pub fn settle(state: &mut BoardState, defender: Color) -> KingSafety {
    let safety = assess(state.board(), state.king(defender), defender);
    let status = match safety {
        KingSafety::Safe => GameStatus::InProgress,
        KingSafety::Check => GameStatus::Check,
        KingSafety::Mate => GameStatus::Mate,
    };
    if safety != KingSafety::Safe {
        info!(%defender, ?safety, "king attacked");
    }
    state.set_status(status);
    safety
}
