use crate::board::{Board, BoardState};
use crate::rules::king_escapes;
use crate::types::{Color, Coord, PieceKind, Square};

/// What the computer wants to do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    Move { from: Coord, to: Coord },
    /// No legal move was found; the game is a tie.
    NoMove,
}

/// The computer side of the game.
///
/// An opponent only proposes moves. The game runs every proposal through the
/// same validator as human moves before committing it, so a faulty opponent
/// cannot corrupt the board.
pub trait Opponent: Send + Sync {
    fn propose(&self, state: &BoardState, side: Color) -> Proposal;
}

/// Opens with the king's pawn, then only ever shuffles its king to the first
/// adjacent square that is not attacked.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveOpponent;

impl Opponent for NaiveOpponent {
    fn propose(&self, state: &BoardState, side: Color) -> Proposal {
        // moves counts both sides, so the computer's first ply is 0 or 1.
        if state.moves() <= 1 {
            if let Some(push) = center_push(state.board(), side) {
                return push;
            }
        }
        let king = state.king(side);
        match king_escapes(state.board(), king, side).next() {
            Some(to) => Proposal::Move { from: king, to },
            None => Proposal::NoMove,
        }
    }
}

/// Two-square advance of the e-pawn, if it is still home with a free path.
fn center_push(board: &Board, side: Color) -> Option<Proposal> {
    let from = Coord::new(side.pawn_rank(), 4)?;
    let over = from.offset(side.forward(), 0)?;
    let to = over.offset(side.forward(), 0)?;
    let ready = board.get(from) == Square::piece(side, PieceKind::Pawn)
        && board.get(over).is_empty()
        && board.get(to).is_empty();
    ready.then_some(Proposal::Move { from, to })
}
