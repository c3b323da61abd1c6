//! Message-per-call text transport shared by the server and the client
//!
//! The protocol has no length prefix or terminator: every `send` carries one
//! logical message and every `receive` returns what a single read delivered,
//! capped at [`MAX_MESSAGE_LENGTH`] bytes. Both peers strictly alternate
//! (every message is answered before the next one is sent), which is what
//! keeps the boundaries intact on a stream socket.

use crate::MAX_MESSAGE_LENGTH;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("peer closed the connection")]
    Closed,
}

pub struct Connection<S> {
    stream: S,
    buffer: [u8; MAX_MESSAGE_LENGTH],
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: [0u8; MAX_MESSAGE_LENGTH],
        }
    }

    /// Writes one message and flushes it
    pub async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        self.stream.write_all(message.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one message, dropping any trailing CR/LF
    ///
    /// Returns [`TransportError::Closed`] when the peer has shut down its side.
    pub async fn receive(&mut self) -> Result<String, TransportError> {
        let len = self.stream.read(&mut self.buffer).await?;
        if len == 0 {
            return Err(TransportError::Closed);
        }

        let text = String::from_utf8_lossy(&self.buffer[..len]);
        Ok(text.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
    }
}
