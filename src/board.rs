use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::{fen::ParseFenError, Bitboard};
use thiserror::Error;

use crate::server_types::GameSummary;
use crate::types::{Color, Coord, Piece, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Length of a board dump: 64 two-byte square codes and a newline.
pub const SNAPSHOT_LEN: usize = 129;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("error in parsing board FEN: {0}")]
    Fen(#[from] ParseFenError),
    #[error("a position needs exactly one {0} king, found {1}")]
    KingCount(Color, usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board dump must be {SNAPSHOT_LEN} bytes, got {0}")]
    Length(usize),
    #[error("unrecognized square code at index {0}")]
    Square(usize),
}

/// The 8x8 grid, indexed `[rank][file]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Square; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
        }
    }

    pub fn standard() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let back = color.back_rank() as usize;
            let pawns = color.pawn_rank() as usize;
            for (file, kind) in BACK_RANK.into_iter().enumerate() {
                board.squares[back][file] = Square::piece(color, kind);
                board.squares[pawns][file] = Square::piece(color, PieceKind::Pawn);
            }
        }
        board
    }

    pub fn get(&self, c: Coord) -> Square {
        let (r, f) = c.index();
        self.squares[r][f]
    }

    pub fn set(&mut self, c: Coord, sq: Square) {
        let (r, f) = c.index();
        self.squares[r][f] = sq;
    }

    /// Empties a square and returns what was on it.
    pub fn take(&mut self, c: Coord) -> Square {
        let (r, f) = c.index();
        std::mem::take(&mut self.squares[r][f])
    }

    /// All 64 squares in rank-major, then file order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Square)> + '_ {
        (0..8i8).flat_map(move |r| {
            (0..8i8).filter_map(move |f| Coord::new(r, f).map(|c| (c, self.get(c))))
        })
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.iter()
            .filter_map(move |(c, sq)| sq.occupant().filter(|p| p.color == color).map(|p| (c, p)))
    }

    pub fn kings(&self, color: Color) -> Vec<Coord> {
        self.pieces(color)
            .filter(|(_, p)| p.kind == PieceKind::King)
            .map(|(c, _)| c)
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut bytes = [0u8; SNAPSHOT_LEN];
        for (i, (_, sq)) in self.iter().enumerate() {
            bytes[2 * i..2 * i + 2].copy_from_slice(&sq.code());
        }
        bytes[SNAPSHOT_LEN - 1] = b'\n';
        Snapshot(bytes)
    }

    /// Piece placement field of a FEN string.
    pub fn to_fen(&self) -> String {
        let mut board = shakmaty::Board::empty();
        for (c, sq) in self.iter() {
            if let Some(piece) = sq.occupant() {
                board.set_piece_at(c.into(), piece.into());
            }
        }
        board.board_fen(Bitboard(0)).to_string()
    }

    pub fn from_fen(board_fen: &str) -> Result<Self, SetupError> {
        let parsed = shakmaty::Board::from_str(board_fen)?;
        let mut board = Self::empty();
        for r in 0..8i8 {
            for f in 0..8i8 {
                let Some(c) = Coord::new(r, f) else { continue };
                if let Some(piece) = parsed.piece_at(c.into()) {
                    board.set(c, Square::Occupied(piece.into()));
                }
            }
        }
        Ok(board)
    }
}

/// A 129-byte board dump, as returned by the query command.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Snapshot([u8; SNAPSHOT_LEN]);

impl Snapshot {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let bytes: [u8; SNAPSHOT_LEN] = bytes
            .try_into()
            .map_err(|_| SnapshotError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn decode(&self) -> Result<Board, SnapshotError> {
        let mut board = Board::empty();
        for (i, pair) in self.0[..SNAPSHOT_LEN - 1].chunks_exact(2).enumerate() {
            let sq = Square::from_code([pair[0], pair[1]]).ok_or(SnapshotError::Square(i))?;
            let c = Coord::new((i / 8) as i8, (i % 8) as i8).ok_or(SnapshotError::Square(i))?;
            board.set(c, sq);
        }
        Ok(board)
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot({:?})", String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NoGame,
    InProgress,
    Check,
    Mate,
    Stalemate,
    Resigned,
}

impl GameStatus {
    /// Whether moves are accepted.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::InProgress | Self::Check)
    }
}

/// Cached king locations. Always equal to where the kings stand on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KingPositions {
    white: Coord,
    black: Coord,
}

impl KingPositions {
    const fn home() -> Self {
        Self {
            white: Coord::at(0, 4),
            black: Coord::at(7, 4),
        }
    }

    pub fn get(&self, color: Color) -> Coord {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn set(&mut self, color: Color, c: Coord) {
        match color {
            Color::White => self.white = c,
            Color::Black => self.black = c,
        }
    }
}

/// Everything guarded by the board lock.
#[derive(Debug, Clone)]
pub struct BoardState {
    board: Board,
    kings: KingPositions,
    turn: Color,
    human: Color,
    status: GameStatus,
    moves: u32,
    games: u32,
    promoted: Vec<Piece>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            board: Board::empty(),
            kings: KingPositions::home(),
            turn: Color::White,
            human: Color::White,
            status: GameStatus::NoGame,
            moves: 0,
            games: 0,
            promoted: Vec::new(),
        }
    }
}

impl BoardState {
    /// An in-progress game on an arbitrary position.
    pub fn from_fen(board_fen: &str, human: Color, to_move: Color) -> Result<Self, SetupError> {
        let board = Board::from_fen(board_fen)?;
        let mut kings = KingPositions::home();
        for color in [Color::White, Color::Black] {
            match board.kings(color).as_slice() {
                [king] => kings.set(color, *king),
                found => return Err(SetupError::KingCount(color, found.len())),
            }
        }
        Ok(Self {
            board,
            kings,
            turn: to_move,
            human,
            status: GameStatus::InProgress,
            moves: 0,
            games: 1,
            promoted: Vec::new(),
        })
    }

    /// Starts a new game with the human playing `human`. White always moves
    /// first, so the computer opens when the human picks black.
    pub fn reset(&mut self, human: Color) {
        self.promoted.clear();
        self.board = Board::standard();
        self.kings = KingPositions::home();
        self.human = human;
        self.turn = Color::White;
        self.status = GameStatus::InProgress;
        self.games += 1;
        self.moves = 0;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    /// Overwrites `to` with `placed` and empties `from`, returning the
    /// previous contents of `to`. Legality is the caller's business.
    pub fn apply_move(&mut self, from: Coord, to: Coord, placed: Square) -> Square {
        let previous = self.board.get(to);
        self.board.set(to, placed);
        self.board.set(from, Square::Empty);
        previous
    }

    /// Puts back the two squares touched by [`BoardState::apply_move`].
    pub(crate) fn undo_move(&mut self, from: Coord, to: Coord, source: Square, captured: Square) {
        self.board.set(from, source);
        self.board.set(to, captured);
    }

    pub fn promote(&mut self, color: Color, kind: PieceKind) -> Square {
        let piece = Piece::new(color, kind);
        self.promoted.push(piece);
        Square::Occupied(piece)
    }

    pub(crate) fn revoke_promotion(&mut self) {
        self.promoted.pop();
    }

    pub(crate) fn set_king(&mut self, color: Color, at: Coord) {
        self.kings.set(color, at);
    }

    /// Counts a committed move and hands the turn to the other side.
    pub(crate) fn end_turn(&mut self) {
        self.moves += 1;
        self.turn = self.turn.opposite();
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn king(&self, color: Color) -> Coord {
        self.kings.get(color)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn computer(&self) -> Color {
        self.human.opposite()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    /// Pieces created by promotion during the current game.
    pub fn promotions(&self) -> &[Piece] {
        &self.promoted
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            status: self.status,
            turn: self.turn,
            human: self.human,
            moves: self.moves,
            games: self.games,
            white_king: self.kings.white,
            black_king: self.kings.black,
            board: self.board,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn reset_sets_up_both_armies() {
        for human in [Color::White, Color::Black] {
            let mut state = BoardState::default();
            state.reset(human);
            for color in [Color::White, Color::Black] {
                assert_eq!(state.board().pieces(color).count(), 16);
                assert_eq!(state.board().kings(color), vec![state.king(color)]);
            }
            assert_eq!(state.turn(), Color::White);
            assert_eq!(state.status(), GameStatus::InProgress);
            assert_eq!(state.games(), 1);
        }
    }

    #[test]
    fn snapshot_layout() {
        let snap = Board::standard().snapshot();
        let bytes = snap.as_bytes();
        assert_eq!(bytes.len(), SNAPSHOT_LEN);
        assert_eq!(&bytes[..16], b"WRWNWBWQWKWBWNWR");
        assert_eq!(&bytes[16..18], b"WP");
        assert_eq!(&bytes[32..34], b"**");
        assert_eq!(&bytes[112..128], b"BRBNBBBQBKBBBNBR");
        assert_eq!(bytes[128], b'\n');
        assert_eq!(snap.decode().unwrap(), Board::standard());
    }

    #[test]
    fn snapshot_rejects_garbage() {
        assert_eq!(Snapshot::from_bytes(b"OK\n"), Err(SnapshotError::Length(3)));
        let mut bytes = Board::empty().snapshot().as_bytes().to_vec();
        bytes[6] = b'X';
        let snap = Snapshot::from_bytes(&bytes).unwrap();
        assert_eq!(snap.decode(), Err(SnapshotError::Square(3)));
    }

    #[test]
    fn fen_matches_standard_position() {
        assert_eq!(Board::standard().to_fen(), START_FEN);
        assert_eq!(Board::from_fen(START_FEN).unwrap(), Board::standard());
    }

    #[test]
    fn fen_setup_requires_both_kings() {
        assert!(matches!(
            BoardState::from_fen("8/8/8/8/8/8/8/4K3", Color::White, Color::White),
            Err(SetupError::KingCount(Color::Black, 0))
        ));
        let state = BoardState::from_fen("7k/8/8/8/8/8/8/K7", Color::White, Color::White).unwrap();
        assert_eq!(state.king(Color::Black).to_string(), "h8");
        assert_eq!(state.king(Color::White).to_string(), "a1");
    }

    #[test]
    fn promotions_are_released_on_reset() {
        let mut state = BoardState::default();
        state.reset(Color::White);
        let queen = state.promote(Color::White, PieceKind::Queen);
        assert_eq!(queen, Square::piece(Color::White, PieceKind::Queen));
        assert_eq!(state.promotions().len(), 1);
        state.reset(Color::Black);
        assert!(state.promotions().is_empty());
    }
}
