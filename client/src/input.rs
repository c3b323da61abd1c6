//! Reads whitespace-separated answers from the user

use crate::error::ClientError;
use shared::{MenuSelection, FIELD_DELIMITER};
use std::collections::VecDeque;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub struct Prompt<R> {
    reader: R,
    line: String,
    pending: VecDeque<String>,
}

impl<R> Prompt<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending: VecDeque::new(),
        }
    }

    /// Next whitespace-delimited word, reading more lines as needed
    pub async fn next_token(&mut self) -> Result<String, ClientError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            self.line.clear();
            if self.reader.read_line(&mut self.line).await? == 0 {
                return Err(ClientError::InputClosed);
            }
            self.pending
                .extend(self.line.split_whitespace().map(str::to_string));
        }
    }
}

/// Menu choice typed by the user; only `1`, `2` and `3` are accepted
pub fn parse_selection(token: &str) -> Option<MenuSelection> {
    MenuSelection::parse(token).ok()
}

/// The letter to send for a typed guess
pub fn parse_guess(token: &str) -> Option<char> {
    token.chars().next().filter(|&c| c != FIELD_DELIMITER)
}
