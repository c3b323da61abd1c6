//! Username/password lookup used during authentication

use crate::error::ServerError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub trait CredentialProvider: Send + Sync {
    /// Stored password for `username`, if the account exists
    fn lookup(&self, username: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    passwords: HashMap<String, String>,
}

impl CredentialStore {
    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            passwords: pairs
                .into_iter()
                .map(|(user, pass)| (user.into(), pass.into()))
                .collect(),
        }
    }

    /// Loads a credential file: one header line, then `username<TAB>password`
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let content = fs::read_to_string(path).map_err(|source| ServerError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let mut passwords = HashMap::new();
        for (index, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let (username, password) = line
                .split_once('\t')
                .map(|(user, pass)| (user.trim(), pass.trim_end()))
                .filter(|(_, pass)| !pass.is_empty())
                .ok_or_else(|| ServerError::Malformed {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("no password for '{}'", line.trim()),
                })?;
            passwords.insert(username.to_string(), password.to_string());
        }

        Ok(Self { passwords })
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

impl CredentialProvider for CredentialStore {
    fn lookup(&self, username: &str) -> Option<&str> {
        self.passwords.get(username).map(String::as_str)
    }
}
