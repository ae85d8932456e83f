use tokio::sync::RwLock;

use crate::board::Snapshot;
use crate::command::ParseError;
use crate::rules::{IllegalMove, KingSafety};

/// Outcome of a request, exactly as it goes out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ok,
    UnknownCommand,
    InvalidFormat,
    Check,
    Mate,
    IllegalMove,
    OutOfTurn,
    NoGame,
    Tie,
    Board(Snapshot),
}

impl Response {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ok => b"OK\n",
            Self::UnknownCommand => b"UNKCMD\n",
            Self::InvalidFormat => b"INVFMT\n",
            Self::Check => b"CHECK\n",
            Self::Mate => b"MATE\n",
            Self::IllegalMove => b"ILLMOVE\n",
            Self::OutOfTurn => b"OOT\n",
            Self::NoGame => b"NOGAME\n",
            Self::Tie => b"TIE\n",
            Self::Board(snapshot) => snapshot.as_bytes(),
        }
    }
}

impl From<ParseError> for Response {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnknownCommand => Self::UnknownCommand,
            ParseError::InvalidFormat => Self::InvalidFormat,
        }
    }
}

impl From<IllegalMove> for Response {
    fn from(_: IllegalMove) -> Self {
        Self::IllegalMove
    }
}

impl From<KingSafety> for Response {
    fn from(s: KingSafety) -> Self {
        match s {
            KingSafety::Safe => Self::Ok,
            KingSafety::Check => Self::Check,
            KingSafety::Mate => Self::Mate,
        }
    }
}

/// The single outbound message. Every request overwrites it; only the latest
/// value can be read.
///
/// It has its own lock so that rejecting a malformed line never waits on the
/// board.
#[derive(Debug)]
pub struct ResponseSlot {
    pending: RwLock<Response>,
}

impl Default for ResponseSlot {
    fn default() -> Self {
        Self {
            pending: RwLock::new(Response::NoGame),
        }
    }
}

impl ResponseSlot {
    pub async fn publish(&self, response: Response) {
        *self.pending.write().await = response;
    }

    pub async fn pending(&self) -> Response {
        *self.pending.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_end_in_newline() {
        for r in [
            Response::Ok,
            Response::UnknownCommand,
            Response::InvalidFormat,
            Response::Check,
            Response::Mate,
            Response::IllegalMove,
            Response::OutOfTurn,
            Response::NoGame,
            Response::Tie,
        ] {
            assert_eq!(r.as_bytes().last(), Some(&b'\n'));
        }
        assert_eq!(Response::OutOfTurn.as_bytes(), b"OOT\n");
    }

    #[tokio::test]
    async fn last_write_wins() {
        let slot = ResponseSlot::default();
        assert_eq!(slot.pending().await, Response::NoGame);
        slot.publish(Response::Ok).await;
        slot.publish(Response::Tie).await;
        assert_eq!(slot.pending().await, Response::Tie);
    }
}
