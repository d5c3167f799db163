// src/constants.rs

pub const DEFAULT_HOSTNAME: &str = "::";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SERVER_NAME: &str = "ferroftpd";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to ferroftpd";

// Passive data connections: how long a transfer command waits for the client to dial in.
pub const DEFAULT_PASV_MAX_RETRIES: u32 = 4;
pub const DEFAULT_PASV_RETRY_INTERVAL_MS: u64 = 500;

pub const SESSION_ID_LENGTH: usize = 20;
pub const LIST_SIZE_COLUMN_WIDTH: usize = 12;
