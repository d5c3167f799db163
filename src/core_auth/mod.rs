//! Credential checking strategies consumed by PASS.

pub mod core_auth;
pub mod error;
pub mod helper;
pub mod simple;

pub use core_auth::{PasswdEntry, PasswdFileAuth};
pub use error::AuthError;
pub use simple::{AnonymousAuth, SimpleAuth};

use crate::config::AuthConfig;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait Auth: Send + Sync {
    /// Whether any password is accepted for the `anonymous` user.
    fn allow_anonymous(&self) -> bool {
        false
    }

    /// Returns `Ok(true)` when `pass` is the password of `user`.
    async fn check_passwd(&self, user: &str, pass: &str) -> Result<bool, AuthError>;
}

/// Picks the auth strategy described by the `[auth]` configuration table.
///
/// A passwd file wins over an inline user, which wins over anonymous access.
pub fn from_config(config: &AuthConfig) -> Result<Arc<dyn Auth>, AuthError> {
    if let Some(path) = &config.passwd_file {
        info!("Using passwd file authentication: {:?}", path);
        return Ok(Arc::new(PasswdFileAuth::from_file(path)?));
    }

    match (&config.username, &config.password) {
        (Some(name), Some(password)) => {
            info!("Using single user authentication for {}", name);
            Ok(Arc::new(SimpleAuth::new(name.clone(), password.clone())))
        }
        (Some(_), None) | (None, Some(_)) => Err(AuthError::InvalidConfig(
            "username and password must be set together".to_string(),
        )),
        (None, None) if config.anonymous => {
            info!("Using anonymous authentication");
            Ok(Arc::new(AnonymousAuth))
        }
        (None, None) => Err(AuthError::InvalidConfig(
            "no authentication method configured".to_string(),
        )),
    }
}
