use crate::core_auth::error::AuthError;
use crate::core_auth::Auth;
use async_trait::async_trait;

/// A single user with a plain text password.
#[derive(Debug, Clone)]
pub struct SimpleAuth {
    name: String,
    password: String,
}

impl SimpleAuth {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl Auth for SimpleAuth {
    async fn check_passwd(&self, user: &str, pass: &str) -> Result<bool, AuthError> {
        Ok(user == self.name && pass == self.password)
    }
}

/// Accepts every login.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuth;

#[async_trait]
impl Auth for AnonymousAuth {
    fn allow_anonymous(&self) -> bool {
        true
    }

    async fn check_passwd(&self, _user: &str, _pass: &str) -> Result<bool, AuthError> {
        Ok(true)
    }
}
