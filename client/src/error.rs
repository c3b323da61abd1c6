use shared::{ProtocolError, TransportError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Transport(#[from] TransportError),

    #[error("unexpected message from server: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("input closed")]
    InputClosed,

    #[error("you entered an incorrect username or password")]
    Rejected,
}
