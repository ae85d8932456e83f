//! Move legality and king safety.
//!
//! Everything in here works on plain board values and never touches a lock;
//! callers hold the board lock for as long as a rule needs a stable board.

pub mod attacks;
pub mod checkmate;
pub mod movement;

pub use attacks::is_attacked;
pub use checkmate::{king_escapes, settle, KingSafety};
pub use movement::{validate_move, IllegalMove, MoveOutcome};

/// Unit steps a king (or a ray) can take, in the order the engine scans them.
pub(crate) const KING_STEPS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (1, 0),
    (-1, 1),
    (-1, -1),
    (-1, 0),
    (0, 1),
    (0, -1),
];

pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];
