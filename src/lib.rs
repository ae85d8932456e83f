//! A single chess game shared by every connected client.
//!
//! Clients talk to the game through a tiny line protocol: each request is a
//! newline-terminated command, and the outcome of the most recent request is
//! left in a one-slot response buffer for the next read. See [`command`] for
//! the grammar and [`response::Response`] for the replies.
//!
//! The human picks a color; the computer plays the other one with a fixed,
//! deliberately naive strategy ([`opponent::NaiveOpponent`]).

pub mod board;
pub mod chess_serde;
pub mod command;
pub mod game;
pub mod opponent;
pub mod response;
pub mod rules;
#[cfg(feature = "server")]
pub mod server;
pub mod server_types;
pub mod types;

use async_trait::async_trait;

pub use game::Game;
pub use response::Response;
pub use shakmaty;

/// The read/write surface a transport drives.
///
/// A transport hands each complete command line to [`Device::write`] and
/// relays whatever [`Device::read`] returns. Reads never consume anything:
/// they always return the outcome of the latest write from any client.
///
/// Transports should be generic over this trait rather than tied to
/// [`Game`], so that the game can be wrapped (for example with a recorder
/// or a rate limiter) without touching the transport.
#[async_trait]
pub trait Device: Send + Sync {
    /// Executes one command line and returns how many bytes were consumed,
    /// which is always the whole buffer. Protocol errors are reported through
    /// the response slot, not here.
    async fn write(&self, buf: &[u8]) -> usize;

    /// The pending response payload.
    async fn read(&self) -> Vec<u8>;
}
