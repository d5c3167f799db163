pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_cli;
pub mod core_driver;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod core_tls;
pub mod helpers;
pub mod list_formatter;
pub mod server;
pub mod session;

pub use config::Config;
pub use server::{Server, ServerContext, ServerOpts};
pub use session::Session;
