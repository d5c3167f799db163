// Error handling for the authentication module
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read passwd file: {0}")]
    PasswdReadError(#[from] std::io::Error),

    #[error("Malformed passwd line {0}")]
    MalformedEntry(usize),

    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Invalid auth configuration: {0}")]
    InvalidConfig(String),

    #[error("Auth backend error: {0}")]
    Backend(String),
}
