use crate::core_driver::Driver;
use crate::core_network::control::ControlStream;
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Accepts control connections until shutdown is signalled or the listener fails.
pub async fn accept_loop(
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    loop {
        let (socket, addr) = tokio::select! {
            accepted = listener.accept() => accepted.context("Failed to accept connection")?,
            _ = shutdown_signalled(&mut shutdown) => {
                info!("{} stopped accepting connections", ctx.config.server.name);
                return Ok(());
            }
        };
        info!("New connection from {:?}", addr);

        let driver = match ctx.factory.new_driver() {
            Ok(driver) => driver,
            Err(e) => {
                error!("Error creating driver, aborting client connection: {}", e);
                continue;
            }
        };

        let ctx = Arc::clone(&ctx);
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, ctx, driver, shutdown).await {
                error!("Connection error from {:?}: {:#}", addr, e);
            }
            info!("Connection closed for {:?}", addr);
        });
    }
}

/// Runs one control connection to completion, wrapping it in TLS first when implicit TLS is on.
pub async fn handle_connection(
    socket: TcpStream,
    ctx: Arc<ServerContext>,
    driver: Box<dyn Driver>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let stream = match ctx.tls.as_ref().filter(|_| ctx.config.tls.implicit_tls) {
        Some(tls) => {
            let stream = tls
                .accept_tls(socket)
                .await
                .map_err(|(e, _)| e)
                .context("Implicit TLS handshake failed")?;
            ControlStream::Tls(Box::new(stream))
        }
        None => ControlStream::Plain(socket),
    };

    let session = Session::new(stream, ctx, driver, shutdown)
        .context("Failed to set up session")?;
    session.serve().await;
    Ok(())
}

/// Resolves once the shutdown flag is set. Never resolves if the sender is gone.
pub(crate) async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
