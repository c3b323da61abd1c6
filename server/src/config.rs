//! Server configuration
//!
//! Values come from an optional TOML file and are then overridden by command
//! line flags. Every field has a default, so an empty file is valid.

use crate::error::ServerError;
use serde::Deserialize;
use shared::DEFAULT_PORT;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_POOL_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the listener to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Number of worker tasks serving sessions
    pub pool_size: usize,
    /// Credential file: a header line, then `username<TAB>password` lines
    pub credentials_path: PathBuf,
    /// Phrase file: `item,category` lines
    pub phrases_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            pool_size: DEFAULT_POOL_SIZE,
            credentials_path: PathBuf::from("Authentication.txt"),
            phrases_path: PathBuf::from("hangman_text.txt"),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let content = fs::read_to_string(path).map_err(|source| ServerError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.pool_size == 0 {
            return Err(ServerError::Config(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(ServerError::Config("host must not be empty".to_string()));
        }
        Ok(())
    }
}
