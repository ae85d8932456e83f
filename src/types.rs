use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The protocol byte for this color (`W` or `B`).
    pub const fn code(self) -> u8 {
        match self {
            Self::White => b'W',
            Self::Black => b'B',
        }
    }

    pub const fn from_code(b: u8) -> Option<Self> {
        match b {
            b'W' => Some(Self::White),
            b'B' => Some(Self::Black),
            _ => None,
        }
    }

    /// Rank the pieces of this color start on (0 or 7).
    pub const fn back_rank(self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Rank the pawns of this color start on.
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Rank a pawn of this color promotes on.
    pub const fn promotion_rank(self) -> i8 {
        self.opposite().back_rank()
    }

    /// Rank delta of a single pawn step.
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// Kind of a chess piece. Kept separate from [`Color`] so that the `B` of
/// "black" and the `B` of "bishop" never share a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub const fn code(self) -> u8 {
        match self {
            Self::King => b'K',
            Self::Queen => b'Q',
            Self::Rook => b'R',
            Self::Bishop => b'B',
            Self::Knight => b'N',
            Self::Pawn => b'P',
        }
    }

    pub const fn from_code(b: u8) -> Option<Self> {
        match b {
            b'K' => Some(Self::King),
            b'Q' => Some(Self::Queen),
            b'R' => Some(Self::Rook),
            b'B' => Some(Self::Bishop),
            b'N' => Some(Self::Knight),
            b'P' => Some(Self::Pawn),
            _ => None,
        }
    }

    /// Whether a pawn may be promoted to this kind.
    pub const fn is_promotion_target(self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop | Self::Knight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Two-byte protocol code, color first (`WK`, `BB`, ...).
    pub const fn code(self) -> [u8; 2] {
        [self.color.code(), self.kind.code()]
    }

    pub const fn from_code(code: [u8; 2]) -> Option<Self> {
        match (Color::from_code(code[0]), PieceKind::from_code(code[1])) {
            (Some(color), Some(kind)) => Some(Self { color, kind }),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.color, self.kind)
    }
}

/// The occupant of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Square {
    pub const EMPTY_CODE: [u8; 2] = *b"**";

    pub const fn piece(color: Color, kind: PieceKind) -> Self {
        Self::Occupied(Piece::new(color, kind))
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn occupant(self) -> Option<Piece> {
        match self {
            Self::Empty => None,
            Self::Occupied(p) => Some(p),
        }
    }

    pub fn color(self) -> Option<Color> {
        self.occupant().map(|p| p.color)
    }

    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    pub const fn code(self) -> [u8; 2] {
        match self {
            Self::Empty => Self::EMPTY_CODE,
            Self::Occupied(p) => p.code(),
        }
    }

    pub fn from_code(code: [u8; 2]) -> Option<Self> {
        if code == Self::EMPTY_CODE {
            return Some(Self::Empty);
        }
        Piece::from_code(code).map(Self::Occupied)
    }
}

impl From<Piece> for Square {
    fn from(p: Piece) -> Self {
        Self::Occupied(p)
    }
}

/// A location on the 8x8 board. Rank 0 is row "1", file 0 is column "a".
///
/// A `Coord` is always on the board; stepping off the edge yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    rank: i8,
    file: i8,
}

impl Coord {
    pub const fn new(rank: i8, file: i8) -> Option<Self> {
        if rank >= 0 && rank < 8 && file >= 0 && file < 8 {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    /// Constant squares known to be on the board.
    pub(crate) const fn at(rank: i8, file: i8) -> Self {
        debug_assert!(rank >= 0 && rank < 8 && file >= 0 && file < 8);
        Self { rank, file }
    }

    pub const fn rank(self) -> i8 {
        self.rank
    }

    pub const fn file(self) -> i8 {
        self.file
    }

    pub const fn offset(self, d_rank: i8, d_file: i8) -> Option<Self> {
        Self::new(self.rank + d_rank, self.file + d_file)
    }

    /// Parses `e2` style notation from two bytes.
    pub const fn from_algebraic(file: u8, rank: u8) -> Option<Self> {
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Self {
            rank: (rank - b'1') as i8,
            file: (file - b'a') as i8,
        })
    }

    pub(crate) const fn index(self) -> (usize, usize) {
        (self.rank as usize, self.file as usize)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file as u8) as char;
        let rank = (b'1' + self.rank as u8) as char;
        write!(f, "{file}{rank}")
    }
}

impl From<Color> for shakmaty::Color {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(c: shakmaty::Color) -> Self {
        match c {
            shakmaty::Color::White => Self::White,
            shakmaty::Color::Black => Self::Black,
        }
    }
}

impl From<PieceKind> for shakmaty::Role {
    fn from(k: PieceKind) -> Self {
        match k {
            PieceKind::King => Self::King,
            PieceKind::Queen => Self::Queen,
            PieceKind::Rook => Self::Rook,
            PieceKind::Bishop => Self::Bishop,
            PieceKind::Knight => Self::Knight,
            PieceKind::Pawn => Self::Pawn,
        }
    }
}

impl From<shakmaty::Role> for PieceKind {
    fn from(r: shakmaty::Role) -> Self {
        match r {
            shakmaty::Role::King => Self::King,
            shakmaty::Role::Queen => Self::Queen,
            shakmaty::Role::Rook => Self::Rook,
            shakmaty::Role::Bishop => Self::Bishop,
            shakmaty::Role::Knight => Self::Knight,
            shakmaty::Role::Pawn => Self::Pawn,
        }
    }
}

impl From<Piece> for shakmaty::Piece {
    fn from(p: Piece) -> Self {
        Self {
            color: p.color.into(),
            role: p.kind.into(),
        }
    }
}

impl From<shakmaty::Piece> for Piece {
    fn from(p: shakmaty::Piece) -> Self {
        Self::new(p.color.into(), p.role.into())
    }
}

impl From<Coord> for shakmaty::Square {
    fn from(c: Coord) -> Self {
        shakmaty::Square::from_coords(
            shakmaty::File::new(c.file as u32),
            shakmaty::Rank::new(c.rank as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_and_bishop_codes_are_disjoint_by_position() {
        let bb = Piece::from_code(*b"BB").unwrap();
        assert_eq!(bb, Piece::new(Color::Black, PieceKind::Bishop));
        assert_eq!(Piece::from_code(*b"WX"), None);
        assert_eq!(Piece::from_code(*b"KW"), None);
    }

    #[test]
    fn empty_square_code() {
        assert_eq!(Square::Empty.code(), *b"**");
        assert_eq!(Square::from_code(*b"**"), Some(Square::Empty));
        assert_eq!(Square::from_code(*b"*W"), None);
    }

    #[test]
    fn coords_stay_on_board() {
        let a1 = Coord::from_algebraic(b'a', b'1').unwrap();
        assert_eq!((a1.rank(), a1.file()), (0, 0));
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(7, 7).unwrap().to_string(), "h8");
        assert_eq!(Coord::from_algebraic(b'i', b'1'), None);
        assert_eq!(Coord::from_algebraic(b'a', b'9'), None);
        assert_eq!(Coord::from_algebraic(b'a', b'0'), None);
    }

    #[test]
    fn pawn_direction_follows_color() {
        assert_eq!(Color::White.forward(), 1);
        assert_eq!(Color::Black.promotion_rank(), 0);
        assert_eq!(Color::White.promotion_rank(), 7);
    }
}
