use crate::constants::{
    DEFAULT_HOSTNAME, DEFAULT_PASV_MAX_RETRIES, DEFAULT_PASV_RETRY_INTERVAL_MS, DEFAULT_PORT,
    DEFAULT_SERVER_NAME, DEFAULT_WELCOME_MESSAGE,
};
use crate::core_network::RetryPolicy;
use crate::core_tls::TlsConfig;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    pub name: String,
    pub welcome_message: String,
    /// Address advertised in PASV/EPSV replies, e.g. when behind NAT.
    /// Defaults to the local address of the control connection.
    pub public_ip: Option<IpAddr>,
    pub pasv_max_retries: u32,
    pub pasv_retry_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            name: DEFAULT_SERVER_NAME.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            public_ip: None,
            pasv_max_retries: DEFAULT_PASV_MAX_RETRIES,
            pasv_retry_interval_ms: DEFAULT_PASV_RETRY_INTERVAL_MS,
        }
    }
}

impl ServerConfig {
    /// The `host:port` string the listener binds, bracketing IPv6 hosts.
    pub fn listen_to(&self) -> String {
        if self.hostname.contains(':') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }

    pub fn pasv_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.pasv_max_retries.max(1),
            interval: Duration::from_millis(self.pasv_retry_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// File of `username:bcrypt-hash` lines.
    pub passwd_file: Option<PathBuf>,
    pub anonymous: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tls: TlsConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.listen_to(), "[::]:3000");
        assert!(!config.tls.enabled);
        assert!(config.server.public_ip.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            hostname = "127.0.0.1"
            port = 2121
            public_ip = "10.0.0.5"
            pasv_max_retries = 2

            [auth]
            username = "admin"
            password = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_to(), "127.0.0.1:2121");
        assert_eq!(config.server.name, DEFAULT_SERVER_NAME);
        assert_eq!(
            config.server.public_ip,
            Some("10.0.0.5".parse::<IpAddr>().unwrap())
        );
        let policy = config.server.pasv_retry_policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(
            policy.interval,
            Duration::from_millis(DEFAULT_PASV_RETRY_INTERVAL_MS)
        );
        assert_eq!(config.auth.username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[server]\nport = \"twenty-one\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_sample_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("etc/ferroftpd.toml");
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.server.port, 2121);
        assert_eq!(config.auth.username.as_deref(), Some("admin"));
        assert!(!config.tls.enabled);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            Config::load_from_file(Path::new("/nonexistent/ferroftpd.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
