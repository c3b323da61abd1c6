//! # Hangman Server Library
//!
//! A multi-client hangman server. Clients log in, play rounds against a
//! randomly drawn phrase and browse a shared leaderboard of results.
//!
//! ## Architecture
//!
//! ### Request Queue and Worker Pool
//! The acceptor pushes every new connection onto a FIFO [`queue::RequestQueue`].
//! A fixed number of workers ([`pool::WorkerPool`]) take connections off the
//! head and each serves one session at a time, so the pool size bounds the
//! number of concurrent sessions. Connections beyond that wait in the queue.
//!
//! ### Sessions
//! A [`session::Session`] owns one connection and walks it through
//! authentication, the menu, games and leaderboard views. Sessions share
//! nothing except the [`session::ServerContext`]: the credential and phrase
//! collaborators (read-only) and the leaderboard.
//!
//! ### Leaderboard
//! [`leaderboard::Leaderboard`] keeps entries sorted at all times behind a
//! gated reader/writer lock ([`gate::GatedRwLock`]): many concurrent
//! readers, exclusive writers, and no writer starvation.
//!
//! ### Shutdown
//! Shutdown is cooperative. Triggering [`pool::Shutdown`] stops the acceptor,
//! closes connections still queued, aborts in-flight sessions at their next
//! network wait and joins every worker. Running out of memory in a shared
//! structure triggers the same sequence.
//!
//! ## Module Organization
//!
//! - `config`: server settings from TOML and the command line
//! - `corpus` / `credentials`: file-backed collaborators loaded at startup
//! - `error`: error types per layer
//! - `game`: the hangman rules for one round
//! - `gate`, `leaderboard`: the shared ranked results
//! - `queue`, `pool`: connection scheduling
//! - `session`: the per-connection protocol state machine
//! - `network`: TCP listener tying it all together

pub mod config;
pub mod corpus;
pub mod credentials;
pub mod error;
pub mod game;
pub mod gate;
pub mod leaderboard;
pub mod network;
pub mod pool;
pub mod queue;
pub mod session;

pub use config::ServerConfig;
pub use error::{ServerError, SessionError};
pub use network::Server;
pub use session::ServerContext;
