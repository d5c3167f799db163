// Error handling for data connections
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSocketError {
    #[error("Failed to connect to {addr}: {source}")]
    ConnectFailed { addr: SocketAddr, source: io::Error },

    #[error("Failed to open passive listener: {0}")]
    ListenFailed(io::Error),

    #[error("data socket unavailable")]
    Unavailable,

    #[error("Unsupported network protocol: {0}")]
    UnsupportedFamily(String),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("{0} refused after EPSV ALL")]
    EpsvOnly(&'static str),

    #[error("Data connection I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DataSocketError {
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            DataSocketError::UnsupportedFamily(_) => {
                (522, "Network protocol not supported, use (1,2)")
            }
            DataSocketError::MalformedAddress(_) => {
                (501, "Syntax error in parameters or arguments.")
            }
            DataSocketError::EpsvOnly(_) => (501, "Only EPSV is accepted after EPSV ALL"),
            _ => (425, "Data connection failed"),
        }
    }
}
