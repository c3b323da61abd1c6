use std::fmt;
use thiserror::Error;

pub mod connection;

pub use connection::{Connection, TransportError};

pub const DEFAULT_PORT: u16 = 12345;
pub const MAX_MESSAGE_LENGTH: usize = 100;
pub const MAX_ATTEMPTS: u32 = 26;
pub const ATTEMPT_MARGIN: u32 = 9;

pub const FIELD_DELIMITER: char = '|';
pub const MASK_CHAR: char = '_';
pub const PHRASE_SEPARATOR: char = ' ';

pub const USERNAME_PROMPT: &str = "\nPlease enter your username: ";
pub const PASSWORD_PROMPT: &str = "Please enter your password: ";
pub const AUTH_ACCEPTED: &str = "true";
pub const AUTH_REJECTED: &str = "false";
pub const ACK: &str = "Y";
pub const READY: &str = "Y";
/// Guessed-letters field of an update sent before any guess
pub const NO_GUESSES: &str = " ";

/// Malformed payloads received from the peer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown game status '{0}'")]
    InvalidStatus(String),
    #[error("invalid menu selection '{0}'")]
    InvalidSelection(String),
}

fn split_fields(message: &str, expected: usize) -> Result<Vec<&str>, ProtocolError> {
    let fields: Vec<&str> = message.split(FIELD_DELIMITER).collect();
    if fields.len() != expected {
        return Err(ProtocolError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    Play,
    ShowLeaderboard,
    Quit,
}

impl MenuSelection {
    /// Parses a menu message; exactly one of `1`, `2` or `3` is accepted
    pub fn parse(message: &str) -> Result<Self, ProtocolError> {
        match message {
            "1" => Ok(MenuSelection::Play),
            "2" => Ok(MenuSelection::ShowLeaderboard),
            "3" => Ok(MenuSelection::Quit),
            other => Err(ProtocolError::InvalidSelection(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuSelection::Play => "1",
            MenuSelection::ShowLeaderboard => "2",
            MenuSelection::Quit => "3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_char(&self) -> char {
        match self {
            GameStatus::Ongoing => 'O',
            GameStatus::Won => 'W',
            GameStatus::Lost => 'L',
        }
    }

    pub fn from_field(field: &str) -> Result<Self, ProtocolError> {
        match field {
            "O" => Ok(GameStatus::Ongoing),
            "W" => Ok(GameStatus::Won),
            "L" => Ok(GameStatus::Lost),
            other => Err(ProtocolError::InvalidStatus(other.to_string())),
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Game progress sent to the client after every guess
///
/// Wire form: `guessedLetters|remainingAttempts|maskedPhrase|statusChar`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameUpdate {
    pub guessed_letters: String,
    pub remaining_attempts: u32,
    pub masked_phrase: String,
    pub status: GameStatus,
}

impl GameUpdate {
    /// Longest possible encoding for a phrase of `phrase_len` bytes
    pub fn max_encoded_len(phrase_len: usize) -> usize {
        let attempts_width = MAX_ATTEMPTS.to_string().len();
        MAX_ATTEMPTS as usize + attempts_width + phrase_len + 1 + 3
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}",
            self.guessed_letters,
            self.remaining_attempts,
            self.masked_phrase,
            self.status.as_char(),
            d = FIELD_DELIMITER
        )
    }

    pub fn decode(message: &str) -> Result<Self, ProtocolError> {
        let fields = split_fields(message, 4)?;
        Ok(Self {
            guessed_letters: fields[0].to_string(),
            remaining_attempts: parse_number("remaining_attempts", fields[1])?,
            masked_phrase: fields[2].to_string(),
            status: GameStatus::from_field(fields[3])?,
        })
    }
}

/// One leaderboard row as streamed to the client
///
/// Wire form: `username|gamesWon|totalGames`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRecord {
    pub username: String,
    pub games_won: u32,
    pub total_games: u32,
}

impl LeaderboardRecord {
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.username,
            self.games_won,
            self.total_games,
            d = FIELD_DELIMITER
        )
    }

    pub fn decode(message: &str) -> Result<Self, ProtocolError> {
        let fields = split_fields(message, 3)?;
        Ok(Self {
            username: fields[0].to_string(),
            games_won: parse_number("games_won", fields[1])?,
            total_games: parse_number("total_games", fields[2])?,
        })
    }
}

impl fmt::Display for LeaderboardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} won / {} played)",
            self.username, self.games_won, self.total_games
        )
    }
}

/// Parses the leaderboard size announcement
pub fn decode_count(message: &str) -> Result<usize, ProtocolError> {
    parse_number("count", message).map(|count| count as usize)
}
