use crate::config::Config;
use crate::core_auth::Auth;
use crate::core_driver::DriverFactory;
use crate::core_ftpcommand::{initialize_command_handlers, CommandRegistry};
use crate::core_network::network;
use crate::core_tls::{TlsConnection, TlsError};
use anyhow::{Context, Result};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Read-only state shared by every session of one server.
pub struct ServerContext {
    pub config: Config,
    pub registry: CommandRegistry,
    pub auth: Arc<dyn Auth>,
    pub factory: Arc<dyn DriverFactory>,
    pub tls: Option<TlsConnection>,
}

/// What a server is built from.
pub struct ServerOpts {
    pub config: Config,
    pub factory: Arc<dyn DriverFactory>,
    pub auth: Arc<dyn Auth>,
}

pub struct Server {
    ctx: Arc<ServerContext>,
    shutdown: watch::Sender<bool>,
}

impl Server {
    /// Builds the command registry and, when enabled, the TLS context.
    pub fn new(opts: ServerOpts) -> Result<Self, TlsError> {
        let tls = TlsConnection::from_config(&opts.config.tls)?;
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            ctx: Arc::new(ServerContext {
                config: opts.config,
                registry: initialize_command_handlers(),
                auth: opts.auth,
                factory: opts.factory,
                tls,
            }),
            shutdown,
        })
    }

    pub fn name(&self) -> &str {
        &self.ctx.config.server.name
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.ctx
    }

    /// Binds the configured address.
    pub async fn listen(&self) -> Result<TcpListener> {
        let listen_to = self.ctx.config.server.listen_to();
        TcpListener::bind(listen_to.as_str())
            .await
            .with_context(|| format!("Failed to bind {}", listen_to))
    }

    pub async fn listen_and_serve(&self) -> Result<()> {
        let listener = self.listen().await?;
        self.serve(listener).await
    }

    /// Accepts connections on `listener` until [`Server::shutdown`] is called.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        info!(
            "{} listening on {}{}",
            self.name(),
            addr,
            if self.ctx.tls.is_some() { " (TLS)" } else { "" }
        );
        network::accept_loop(listener, Arc::clone(&self.ctx), self.shutdown.subscribe()).await
    }

    /// Stops accepting. Live sessions close once their current command finishes.
    pub fn shutdown(&self) {
        info!("{} shutting down", self.name());
        self.shutdown.send_replace(true);
    }
}
