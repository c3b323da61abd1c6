use crate::corpus::{Phrase, PhraseCorpus};
use log::debug;
use shared::{GameStatus, GameUpdate, ATTEMPT_MARGIN, MASK_CHAR, MAX_ATTEMPTS, NO_GUESSES};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game already finished ({0:?})")]
    Finished(GameStatus),
    #[error("no phrases to choose from")]
    NoPhrases,
}

/// One round of hangman
#[derive(Debug, Clone)]
pub struct GameState {
    phrase: Vec<char>,
    revealed: Vec<bool>,
    guessed: String,
    remaining_attempts: u32,
    status: GameStatus,
}

impl GameState {
    /// Starts a round on a randomly chosen phrase
    pub fn start(corpus: &dyn PhraseCorpus) -> Result<Self, GameError> {
        let phrase = corpus.choose().ok_or(GameError::NoPhrases)?;
        Ok(Self::new(phrase))
    }

    pub fn new(phrase: &Phrase) -> Self {
        let text: Vec<char> = phrase.text().chars().collect();
        let separator = phrase.category.chars().count();

        let mut revealed = vec![false; text.len()];
        revealed[separator] = true;

        let remaining_attempts = (text.len() as u32 + ATTEMPT_MARGIN).min(MAX_ATTEMPTS);
        debug!(
            "New game: '{}' with {} attempts",
            phrase.text(),
            remaining_attempts
        );

        Self {
            phrase: text,
            revealed,
            guessed: String::new(),
            remaining_attempts,
            status: GameStatus::Ongoing,
        }
    }

    /// Applies one guess. Every guess costs an attempt, repeats included.
    pub fn guess(&mut self, letter: char) -> Result<GameStatus, GameError> {
        if self.status.is_finished() {
            return Err(GameError::Finished(self.status));
        }

        self.guessed.push(letter);
        self.remaining_attempts -= 1;

        for (shown, &c) in self.revealed.iter_mut().zip(&self.phrase) {
            if c == letter {
                *shown = true;
            }
        }

        self.status = if self.revealed.iter().all(|&shown| shown) {
            GameStatus::Won
        } else if self.remaining_attempts == 0 {
            GameStatus::Lost
        } else {
            GameStatus::Ongoing
        };

        Ok(self.status)
    }

    pub fn masked_phrase(&self) -> String {
        self.phrase
            .iter()
            .zip(&self.revealed)
            .map(|(&c, &shown)| if shown { c } else { MASK_CHAR })
            .collect()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.remaining_attempts
    }

    pub fn update(&self) -> GameUpdate {
        let guessed_letters = if self.guessed.is_empty() {
            NO_GUESSES.to_string()
        } else {
            self.guessed.clone()
        };

        GameUpdate {
            guessed_letters,
            remaining_attempts: self.remaining_attempts,
            masked_phrase: self.masked_phrase(),
            status: self.status,
        }
    }
}
