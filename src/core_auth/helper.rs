use crate::core_auth::core_auth::PasswdEntry;
use crate::core_auth::error::AuthError;
use bcrypt::{hash, verify, DEFAULT_COST};
use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}

/// Reads `username:hash` lines. Blank lines and `#` comments are skipped.
pub fn load_passwd_file(path: &Path) -> Result<HashMap<String, PasswdEntry>, AuthError> {
    let content = fs::read_to_string(path)?;
    let mut passwd_map = HashMap::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match PasswdEntry::from_line(line) {
            Some(entry) => {
                passwd_map.insert(entry.get_username().to_string(), entry);
            }
            None => {
                warn!("Malformed passwd entry at {:?}:{}", path, number + 1);
                return Err(AuthError::MalformedEntry(number + 1));
            }
        }
    }

    info!("Loaded {} passwd entries from {:?}", passwd_map.len(), path);
    Ok(passwd_map)
}
