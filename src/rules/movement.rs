use thiserror::Error;

use crate::board::{Board, BoardState};
use crate::command::MoveCommand;
use crate::rules::is_attacked;
use crate::types::{Color, Coord, Piece, PieceKind, Square};

/// Why a move was refused. The protocol reports all of them as `ILLMOVE`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("{0} does not belong to the side moving")]
    NotYourPiece(Piece),
    #[error("{square} does not hold a {piece}")]
    SourceMismatch { square: Coord, piece: Piece },
    #[error("{0} is occupied")]
    DestinationOccupied(Coord),
    #[error("{square} does not hold the declared {piece}")]
    CaptureMismatch { square: Coord, piece: Piece },
    #[error("cannot capture own {0}")]
    OwnPiece(Piece),
    #[error("kings cannot be captured")]
    KingCapture,
    #[error("only pawns can be promoted")]
    PromotionNotPawn,
    #[error("cannot promote to {0}")]
    PromotionTarget(Piece),
    #[error("promotion is only allowed on the last rank")]
    PromotionRank,
    #[error("a {kind:?} cannot move from {from} to {to}")]
    Geometry { kind: PieceKind, from: Coord, to: Coord },
    #[error("the path from {from} to {to} is blocked")]
    Blocked { from: Coord, to: Coord },
    #[error("the move leaves the king in check")]
    SelfCheck,
}

/// A committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Coord,
    pub to: Coord,
    /// What now stands on `to`.
    pub placed: Piece,
    pub captured: Option<Piece>,
}

/// Checks `mv` for `mover` against the current position and, if it is legal,
/// commits it: the board, the king cache, the move counter and the turn are
/// all updated. On any error the state is left exactly as it was.
pub fn validate_move(
    state: &mut BoardState,
    mover: Color,
    mv: &MoveCommand,
) -> Result<MoveOutcome, IllegalMove> {
    check_claims(state.board(), mover, mv)?;
    check_geometry(state.board(), mover, mv)?;
    commit(state, mover, mv)
}

/// Ownership, source, occupancy and promotion rules: everything the command
/// asserts about the position besides how the piece travels.
fn check_claims(board: &Board, mover: Color, mv: &MoveCommand) -> Result<(), IllegalMove> {
    if mv.piece.color != mover {
        return Err(IllegalMove::NotYourPiece(mv.piece));
    }
    if board.get(mv.from) != Square::Occupied(mv.piece) {
        return Err(IllegalMove::SourceMismatch {
            square: mv.from,
            piece: mv.piece,
        });
    }

    let dest = board.get(mv.to);
    match mv.capture {
        None if !dest.is_empty() => return Err(IllegalMove::DestinationOccupied(mv.to)),
        None => {}
        Some(claimed) if dest != Square::Occupied(claimed) => {
            return Err(IllegalMove::CaptureMismatch {
                square: mv.to,
                piece: claimed,
            })
        }
        Some(claimed) if claimed.color == mover => return Err(IllegalMove::OwnPiece(claimed)),
        Some(claimed) if claimed.kind == PieceKind::King => return Err(IllegalMove::KingCapture),
        Some(_) => {}
    }

    if let Some(target) = mv.promotion {
        if mv.piece.kind != PieceKind::Pawn {
            return Err(IllegalMove::PromotionNotPawn);
        }
        if target.color != mover || !target.kind.is_promotion_target() {
            return Err(IllegalMove::PromotionTarget(target));
        }
        if mv.to.rank() != mover.promotion_rank() {
            return Err(IllegalMove::PromotionRank);
        }
    }
    Ok(())
}

fn check_geometry(board: &Board, mover: Color, mv: &MoveCommand) -> Result<(), IllegalMove> {
    let (from, to) = (mv.from, mv.to);
    let dr = to.rank() - from.rank();
    let df = to.file() - from.file();
    let bad = IllegalMove::Geometry {
        kind: mv.piece.kind,
        from,
        to,
    };

    let slides = match mv.piece.kind {
        PieceKind::Pawn => return check_pawn(board, mover, mv, dr, df),
        PieceKind::Knight => return if (dr * df).abs() == 2 { Ok(()) } else { Err(bad) },
        PieceKind::King => {
            return if dr.abs() <= 1 && df.abs() <= 1 && (dr, df) != (0, 0) {
                Ok(())
            } else {
                Err(bad)
            }
        }
        PieceKind::Rook => (dr == 0) != (df == 0),
        PieceKind::Bishop => dr != 0 && dr.abs() == df.abs(),
        PieceKind::Queen => (dr == 0) != (df == 0) || (dr != 0 && dr.abs() == df.abs()),
    };
    if !slides {
        return Err(bad);
    }
    if !path_clear(board, from, to) {
        return Err(IllegalMove::Blocked { from, to });
    }
    Ok(())
}

fn check_pawn(board: &Board, mover: Color, mv: &MoveCommand, dr: i8, df: i8) -> Result<(), IllegalMove> {
    let forward = mover.forward();
    let ok = if mv.capture.is_some() {
        dr == forward && df.abs() == 1
    } else if df != 0 {
        false
    } else if dr == forward {
        true
    } else if dr == 2 * forward && mv.from.rank() == mover.pawn_rank() {
        if !path_clear(board, mv.from, mv.to) {
            return Err(IllegalMove::Blocked {
                from: mv.from,
                to: mv.to,
            });
        }
        true
    } else {
        false
    };
    if ok {
        Ok(())
    } else {
        Err(IllegalMove::Geometry {
            kind: PieceKind::Pawn,
            from: mv.from,
            to: mv.to,
        })
    }
}

/// Whether every square strictly between `from` and `to` is empty. The two
/// squares must share a rank, a file or a diagonal.
pub fn path_clear(board: &Board, from: Coord, to: Coord) -> bool {
    if from == to {
        return false;
    }
    let step = (
        (to.rank() - from.rank()).signum(),
        (to.file() - from.file()).signum(),
    );
    let mut cur = from;
    while let Some(next) = cur.offset(step.0, step.1) {
        if next == to {
            return true;
        }
        if !board.get(next).is_empty() {
            return false;
        }
        cur = next;
    }
    false
}

/// Tentatively plays the move, takes it back if it exposes the mover's own
/// king, otherwise finishes the turn.
fn commit(state: &mut BoardState, mover: Color, mv: &MoveCommand) -> Result<MoveOutcome, IllegalMove> {
    let placed = match mv.promotion {
        Some(target) => state.promote(target.color, target.kind),
        None => Square::Occupied(mv.piece),
    };
    let captured = state.apply_move(mv.from, mv.to, placed);

    let king = if mv.piece.kind == PieceKind::King {
        mv.to
    } else {
        state.king(mover)
    };
    if is_attacked(state.board(), king, mover) {
        state.undo_move(mv.from, mv.to, Square::Occupied(mv.piece), captured);
        if mv.promotion.is_some() {
            state.revoke_promotion();
        }
        return Err(IllegalMove::SelfCheck);
    }

    if mv.piece.kind == PieceKind::King {
        state.set_king(mover, mv.to);
    }
    state.end_turn();
    Ok(MoveOutcome {
        from: mv.from,
        to: mv.to,
        placed: placed.occupant().unwrap_or(mv.piece),
        captured: captured.occupant(),
    })
}
