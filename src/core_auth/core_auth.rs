use crate::core_auth::error::AuthError;
use crate::core_auth::helper::{load_passwd_file, verify_password};
use crate::core_auth::Auth;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// One `username:bcrypt-hash` line of a passwd file.
#[derive(Debug, Clone)]
pub struct PasswdEntry {
    username: String,
    hashed_password: String,
}

impl PasswdEntry {
    pub fn from_line(line: &str) -> Option<Self> {
        let (username, hashed_password) = line.split_once(':')?;
        if username.is_empty() || hashed_password.is_empty() {
            return None;
        }
        Some(PasswdEntry {
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
        })
    }

    pub fn get_hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }
}

/// Checks credentials against bcrypt hashes loaded from a passwd file.
#[derive(Debug, Clone)]
pub struct PasswdFileAuth {
    entries: HashMap<String, PasswdEntry>,
}

impl PasswdFileAuth {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        Ok(Self {
            entries: load_passwd_file(path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Auth for PasswdFileAuth {
    async fn check_passwd(&self, user: &str, pass: &str) -> Result<bool, AuthError> {
        let Some(entry) = self.entries.get(user) else {
            return Ok(false);
        };
        let hashed = entry.get_hashed_password().to_string();
        let pass = pass.to_string();
        // bcrypt verification blocks, run it on the blocking pool.
        tokio::task::spawn_blocking(move || verify_password(&pass, &hashed))
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))
    }
}
