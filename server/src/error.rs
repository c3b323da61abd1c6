//! Error types for the hangman server
//!
//! Session-level failures end one connection; `ServerError` covers startup
//! problems that stop the process before it serves anyone.

use crate::game::GameError;
use crate::leaderboard::LeaderboardError;
use crate::queue::QueueError;
use shared::{ProtocolError, TransportError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a single session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("game error: {0}")]
    Game(#[from] GameError),

    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),
}

impl SessionError {
    /// Whether the failure must bring the whole server down
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::ResourceExhaustion(_))
    }
}

impl From<ProtocolError> for SessionError {
    fn from(err: ProtocolError) -> Self {
        SessionError::ProtocolViolation(err.to_string())
    }
}

impl From<LeaderboardError> for SessionError {
    fn from(err: LeaderboardError) -> Self {
        SessionError::ResourceExhaustion(err.to_string())
    }
}

/// Failures while starting or running the server process
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("phrase corpus is empty")]
    EmptyCorpus,

    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),
}

impl From<toml::de::Error> for ServerError {
    fn from(err: toml::de::Error) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<QueueError> for ServerError {
    fn from(err: QueueError) -> Self {
        ServerError::ResourceExhaustion(err.to_string())
    }
}
