//! TLS for control connections, implicit or upgraded through AUTH TLS.

pub mod error;
pub mod tls_config;
pub mod tls_connection;

pub use error::TlsError;
pub use tls_config::TlsConfig;
pub use tls_connection::TlsConnection;
