use thiserror::Error;

#[derive(Error, Debug)]
pub enum TlsError {
    #[error("cannot load certificate chain: {0}")]
    Certificate(String),

    #[error("cannot load private key: {0}")]
    PrivateKey(String),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("invalid TLS setup: {0}")]
    Config(String),

    #[error("TLS is not enabled on this server")]
    NotConfigured,
}

impl TlsError {
    /// Reply sent when an AUTH upgrade cannot go ahead.
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            TlsError::NotConfigured => (534, "TLS not available"),
            TlsError::Handshake(_) => (431, "Unable to accept security mechanism"),
            _ => (451, "Requested action aborted. Local error in processing."),
        }
    }
}
