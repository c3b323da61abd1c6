//! # Hangman Client Library
//!
//! Terminal client for the hangman server. It relays the server's login
//! prompts, offers the main menu, plays rounds and prints the leaderboard.
//!
//! The server never re-prompts: an invalid menu choice ends the session. The
//! client therefore validates menu choices and guesses locally and only
//! sends input the server will accept.
//!
//! ## Module Organization
//!
//! - `network`: the [`Client`] driving one connection through the protocol
//! - `input`: whitespace-delimited answers read from stdin
//! - `rendering`: everything printed to the terminal
//! - `error`: [`ClientError`]

pub mod error;
pub mod input;
pub mod network;
pub mod rendering;

pub use error::ClientError;
pub use network::Client;
