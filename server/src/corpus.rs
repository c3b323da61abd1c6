//! Phrases the game engine draws from

use crate::error::ServerError;
use rand::seq::SliceRandom;
use shared::{GameUpdate, MAX_MESSAGE_LENGTH, PHRASE_SEPARATOR};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub category: String,
    pub item: String,
}

impl Phrase {
    pub fn new(category: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            item: item.into(),
        }
    }

    /// Category and item joined by the separator, e.g. `animal dog`
    pub fn text(&self) -> String {
        format!("{}{}{}", self.category, PHRASE_SEPARATOR, self.item)
    }
}

pub trait PhraseCorpus: Send + Sync {
    fn all(&self) -> &[Phrase];

    /// Uniformly random phrase, `None` only for an empty corpus
    fn choose(&self) -> Option<&Phrase> {
        self.all().choose(&mut rand::thread_rng())
    }
}

/// In-memory corpus, never empty
#[derive(Debug, Clone)]
pub struct PhraseList {
    phrases: Vec<Phrase>,
}

impl PhraseList {
    pub fn new(phrases: Vec<Phrase>) -> Result<Self, ServerError> {
        if phrases.is_empty() {
            return Err(ServerError::EmptyCorpus);
        }
        Ok(Self { phrases })
    }

    /// Loads `item,category` lines; blank lines are skipped
    ///
    /// Phrases whose game updates could outgrow one message are refused.
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let content = fs::read_to_string(path).map_err(|source| ServerError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let mut phrases = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let (item, category) = line.split_once(',').ok_or_else(|| ServerError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                reason: "expected 'item,category'".to_string(),
            })?;
            let phrase = Phrase::new(category.trim(), item.trim());
            if GameUpdate::max_encoded_len(phrase.text().len()) > MAX_MESSAGE_LENGTH {
                return Err(ServerError::Malformed {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("phrase '{}' is too long", phrase.text()),
                });
            }
            phrases.push(phrase);
        }

        Self::new(phrases)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl PhraseCorpus for PhraseList {
    fn all(&self) -> &[Phrase] {
        &self.phrases
    }
}
