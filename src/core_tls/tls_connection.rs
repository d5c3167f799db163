use crate::core_tls::error::TlsError;
use crate::core_tls::tls_config::TlsConfig;
use log::info;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::server::TlsStream;
use tokio_rustls::{rustls, TlsAcceptor};

/// Server-side TLS context built once from a certificate/key pair and shared by all sessions.
#[derive(Clone)]
pub struct TlsConnection {
    tls_acceptor: TlsAcceptor,
}

impl TlsConnection {
    pub fn new(cert_file: &Path, key_file: &Path) -> Result<Self, TlsError> {
        if !cert_file.exists() || !key_file.exists() {
            return Err(TlsError::NotConfigured);
        }

        let mut config = rustls::ServerConfig::builder()
            .with_safe_defaults()
            .with_no_client_auth()
            .with_single_cert(load_certs(cert_file)?, load_private_key(key_file)?)
            .map_err(|e| TlsError::Config(e.to_string()))?;
        config.alpn_protocols = vec![b"ftp".to_vec()];

        info!("TLS context loaded from {:?}", cert_file);
        Ok(Self {
            tls_acceptor: TlsAcceptor::from(Arc::new(config)),
        })
    }

    /// Builds the context when TLS is enabled, `None` otherwise.
    pub fn from_config(config: &TlsConfig) -> Result<Option<Self>, TlsError> {
        if !config.enabled {
            return Ok(None);
        }
        config.validate()?;
        Self::new(&config.cert_file, &config.key_file).map(Some)
    }

    /// Runs a server-side handshake over `stream`.
    ///
    /// On failure the raw stream is handed back so a plaintext session can carry on.
    pub async fn accept_tls(
        &self,
        stream: TcpStream,
    ) -> Result<TlsStream<TcpStream>, (TlsError, TcpStream)> {
        self.tls_acceptor
            .accept(stream)
            .into_fallible()
            .await
            .map_err(|(e, stream)| (TlsError::Handshake(e.to_string()), stream))
    }
}

fn load_certs(path: &Path) -> Result<Vec<rustls::Certificate>, TlsError> {
    let pem = std::fs::read(path).map_err(|e| TlsError::Certificate(e.to_string()))?;
    let chain = rustls_pemfile::certs(&mut pem.as_slice())
        .map_err(|e| TlsError::Certificate(e.to_string()))?;
    if chain.is_empty() {
        return Err(TlsError::Certificate(format!(
            "no certificate in {}",
            path.display()
        )));
    }
    Ok(chain.into_iter().map(rustls::Certificate).collect())
}

/// PKCS#8 first, then PKCS#1 RSA.
fn load_private_key(path: &Path) -> Result<rustls::PrivateKey, TlsError> {
    let pem = std::fs::read(path).map_err(|e| TlsError::PrivateKey(e.to_string()))?;
    let mut keys = rustls_pemfile::pkcs8_private_keys(&mut pem.as_slice())
        .map_err(|e| TlsError::PrivateKey(e.to_string()))?;
    if keys.is_empty() {
        keys = rustls_pemfile::rsa_private_keys(&mut pem.as_slice())
            .map_err(|e| TlsError::PrivateKey(e.to_string()))?;
    }
    keys.pop()
        .map(rustls::PrivateKey)
        .ok_or_else(|| TlsError::PrivateKey(format!("no private key in {}", path.display())))
}
