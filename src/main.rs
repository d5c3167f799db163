use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use ferroftpd::config::Config;
use ferroftpd::core_cli::Cli;
use ferroftpd::core_driver::{MemDriverFactory, SimplePerm};
use ferroftpd::{core_auth, Server, ServerOpts};
use log::info;
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let auth = core_auth::from_config(&config.auth).context("Failed to set up authentication")?;
    let server = Arc::new(
        Server::new(ServerOpts {
            config,
            factory: Arc::new(MemDriverFactory::new(SimplePerm::new("ftp", "ftp"))),
            auth,
        })
        .context("Failed to set up TLS")?,
    );

    let listener = server.listen().await?;

    let signal_server = Arc::clone(&server);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_server.shutdown();
        }
    });

    server.serve(listener).await
}
