// Error handling for storage drivers
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Driver error: {0}")]
    Other(String),
}

impl DriverError {
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            DriverError::Io(_) | DriverError::Other(_) => {
                (451, "Requested action aborted. Local error in processing.")
            }
            _ => (550, "Action not taken"),
        }
    }
}
