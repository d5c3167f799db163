use crate::core_tls::error::TlsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Enables TLS support
    pub enabled: bool,

    /// Path to the PEM certificate chain
    pub cert_file: PathBuf,

    /// Path to the PEM private key
    pub key_file: PathBuf,

    /// Implicit TLS: every control connection starts with a handshake.
    /// Otherwise clients upgrade with AUTH TLS.
    pub implicit_tls: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cert_file: PathBuf::from("etc/ssl/cert.pem"),
            key_file: PathBuf::from("etc/ssl/key.pem"),
            implicit_tls: false,
        }
    }
}

impl TlsConfig {
    /// Fails when TLS is enabled but the certificate or key file is missing.
    pub fn validate(&self) -> Result<(), TlsError> {
        if !self.enabled {
            return Ok(());
        }
        if !self.cert_file.is_file() {
            return Err(TlsError::Certificate(missing(&self.cert_file)));
        }
        if !self.key_file.is_file() {
            return Err(TlsError::PrivateKey(missing(&self.key_file)));
        }
        Ok(())
    }
}

fn missing(path: &Path) -> String {
    format!("{} not found", path.display())
}
