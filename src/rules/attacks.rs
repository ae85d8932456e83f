use crate::board::Board;
use crate::rules::{KING_STEPS, KNIGHT_JUMPS};
use crate::types::{Color, Coord, Piece, PieceKind};

/// True iff a king of `color` standing on `target` would be attacked.
///
/// Casts the eight rays out of `target` and classifies the first piece met
/// on each, then looks at the eight knight squares. `target` itself is never
/// inspected, so it may hold anything (including the piece about to be
/// captured by a king).
pub fn is_attacked(board: &Board, target: Coord, color: Color) -> bool {
    let enemy = color.opposite();
    KING_STEPS
        .iter()
        .any(|&step| ray_threat(board, target, step, enemy))
        || knight_threat(board, target, enemy)
}

/// First occupied square walking from `from` (exclusive) in `step` direction,
/// with its distance in steps.
fn first_occupied(board: &Board, from: Coord, (dr, df): (i8, i8)) -> Option<(Coord, Piece, i8)> {
    let mut cur = from;
    let mut distance = 0;
    while let Some(next) = cur.offset(dr, df) {
        distance += 1;
        if let Some(piece) = board.get(next).occupant() {
            return Some((next, piece, distance));
        }
        cur = next;
    }
    None
}

fn ray_threat(board: &Board, target: Coord, step: (i8, i8), enemy: Color) -> bool {
    let Some((at, piece, distance)) = first_occupied(board, target, step) else {
        return false;
    };
    if piece.color != enemy {
        return false;
    }
    let diagonal = step.0 != 0 && step.1 != 0;
    match piece.kind {
        PieceKind::Queen => true,
        PieceKind::Rook => !diagonal,
        PieceKind::Bishop => diagonal,
        PieceKind::King => distance == 1,
        // A pawn only hits the square diagonally in front of it.
        PieceKind::Pawn => diagonal && distance == 1 && at.rank() + enemy.forward() == target.rank(),
        PieceKind::Knight => false,
    }
}

fn knight_threat(board: &Board, target: Coord, enemy: Color) -> bool {
    KNIGHT_JUMPS
        .iter()
        .filter_map(|&(dr, df)| target.offset(dr, df))
        .any(|c| board.get(c).occupant() == Some(Piece::new(enemy, PieceKind::Knight)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Coord {
        let b = s.as_bytes();
        Coord::from_algebraic(b[0], b[1]).unwrap()
    }

    fn attacked(fen: &str, square: &str, color: Color) -> bool {
        is_attacked(&Board::from_fen(fen).unwrap(), at(square), color)
    }

    #[test]
    fn sliders_along_their_lines() {
        // Black rook on e8, white king on e1.
        assert!(attacked("4r3/8/8/8/8/8/8/4K3", "e1", Color::White));
        // Same rook is not a diagonal attacker.
        assert!(!attacked("r7/8/8/8/8/8/8/7K", "h1", Color::White));
        // Bishop on a8 hits h1 along the long diagonal.
        assert!(attacked("b7/8/8/8/8/8/8/7K", "h1", Color::White));
        // Queen does both.
        assert!(attacked("q7/8/8/8/8/8/8/7K", "h1", Color::White));
        assert!(attacked("7q/8/8/8/8/8/8/7K", "h1", Color::White));
    }

    #[test]
    fn first_piece_blocks_the_ray() {
        // White pawn on e4 shields the king from the rook.
        assert!(!attacked("4r3/8/8/8/4P3/8/8/4K3", "e1", Color::White));
        // A black knight in between also blocks, it is no threat along a ray.
        assert!(!attacked("4r3/8/8/8/4n3/8/8/4K3", "e1", Color::White));
    }

    #[test]
    fn king_only_adjacent() {
        assert!(attacked("8/8/8/8/8/8/4k3/4K3", "e1", Color::White));
        assert!(!attacked("8/8/8/8/4k3/8/8/4K3", "e1", Color::White));
    }

    #[test]
    fn pawns_attack_forward_only() {
        // Black pawn on d2 attacks e1 (it moves down the board).
        assert!(attacked("8/8/8/8/8/8/3p4/4K3", "e1", Color::White));
        // Black pawn on d1 beside the king on e2 does not.
        assert!(!attacked("8/8/8/8/8/8/4K3/3p4", "e2", Color::White));
        // White pawn on d7 attacks e8, not e6.
        assert!(attacked("4k3/3P4/8/8/8/8/8/8", "e8", Color::Black));
        assert!(!attacked("8/3P4/4k3/8/8/8/8/8", "e6", Color::Black));
        // Pawn straight ahead is no threat.
        assert!(!attacked("8/8/8/8/8/8/4p3/4K3", "e1", Color::White));
    }

    #[test]
    fn knights_jump_including_from_the_edge() {
        assert!(attacked("8/8/8/8/8/8/2n5/4K3", "e1", Color::White));
        assert!(attacked("8/8/8/8/8/5n2/8/4K3", "e1", Color::White));
        // Knight tucked in the corner.
        assert!(attacked("8/8/8/8/8/1K6/8/n7", "b3", Color::White));
        // Corner king attacked from the edge.
        assert!(attacked("8/8/8/8/8/8/2n5/K7", "a1", Color::White));
        assert!(!attacked("8/8/8/8/8/8/8/K1n5", "a1", Color::White));
    }

    #[test]
    fn friendly_pieces_never_threaten() {
        assert!(!attacked("8/8/8/8/8/8/3NQ3/4K3", "e1", Color::White));
    }
}
