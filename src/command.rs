//! Parsing of protocol lines into typed commands.
//!
//! Parsing is purely syntactic: nothing here looks at the board, so a
//! malformed line never needs the board lock.

use thiserror::Error;

use crate::types::{Color, Coord, Piece};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The two-digit command code is not one of `00`..`04`.
    #[error("unknown command code")]
    UnknownCommand,
    /// The code is known but its arguments are malformed.
    #[error("invalid command format")]
    InvalidFormat,
}

/// A human move as written on the wire, e.g. `WPd7-e8xBRyWQ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub piece: Piece,
    pub from: Coord,
    pub to: Coord,
    /// The piece the mover claims stands on `to`.
    pub capture: Option<Piece>,
    /// The piece a pawn turns into on arrival.
    pub promotion: Option<Piece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame(Color),
    Query,
    Move(MoveCommand),
    ComputerMove,
    Resign,
}

impl Command {
    /// Parses one newline-terminated line.
    pub fn parse(line: &[u8]) -> Result<Self, ParseError> {
        let code = match line {
            [b'0', c @ b'0'..=b'4', ..] => *c,
            _ => return Err(ParseError::UnknownCommand),
        };
        let body = match line.split_last() {
            Some((b'\n', body)) => &body[2..],
            _ => return Err(ParseError::InvalidFormat),
        };

        match (code, body) {
            (b'0', [b' ', color]) => Color::from_code(*color)
                .map(Command::NewGame)
                .ok_or(ParseError::InvalidFormat),
            (b'1', []) => Ok(Command::Query),
            (b'2', [b' ', mv @ ..]) => parse_move(mv).map(Command::Move),
            (b'3', []) => Ok(Command::ComputerMove),
            (b'4', []) => Ok(Command::Resign),
            _ => Err(ParseError::InvalidFormat),
        }
    }
}

fn piece(color: u8, kind: u8) -> Result<Piece, ParseError> {
    Piece::from_code([color, kind]).ok_or(ParseError::InvalidFormat)
}

fn coord(file: u8, rank: u8) -> Result<Coord, ParseError> {
    Coord::from_algebraic(file, rank).ok_or(ParseError::InvalidFormat)
}

fn parse_move(mv: &[u8]) -> Result<MoveCommand, ParseError> {
    let [pc, pk, f0, r0, b'-', f1, r1, suffix @ ..] = mv else {
        return Err(ParseError::InvalidFormat);
    };

    // A capture always comes before a promotion.
    let (capture, promotion) = match suffix {
        [] => (None, None),
        [b'x', c, k] => (Some(piece(*c, *k)?), None),
        [b'y', c, k] => (None, Some(piece(*c, *k)?)),
        [b'x', c0, k0, b'y', c1, k1] => (Some(piece(*c0, *k0)?), Some(piece(*c1, *k1)?)),
        _ => return Err(ParseError::InvalidFormat),
    };

    Ok(MoveCommand {
        piece: piece(*pc, *pk)?,
        from: coord(*f0, *r0)?,
        to: coord(*f1, *r1)?,
        capture,
        promotion,
    })
}
