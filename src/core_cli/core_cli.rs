use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ferroftpd", about = "An embeddable FTP server written in Rust.")]
pub struct Cli {
    /// Path to the TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log every command and reply
    #[arg(short, long)]
    pub verbose: bool,
}
