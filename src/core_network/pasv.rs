use crate::core_log::SessionLogger;
use crate::core_network::data_socket::{DataSocket, RetryPolicy};
use crate::core_network::error::DataSocketError;
use crate::session::Session;
use log::warn;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// A listener waiting for exactly one data connection from the client.
///
/// The accept runs on its own task and hands the stream over a oneshot
/// channel, so the session never blocks between PASV and the transfer
/// command. Dropping the socket aborts a pending accept.
pub struct PassiveSocket {
    host: IpAddr,
    port: u16,
    conn: Option<TcpStream>,
    incoming: Option<oneshot::Receiver<io::Result<TcpStream>>>,
    accept_task: JoinHandle<()>,
    retry: RetryPolicy,
    logger: SessionLogger,
}

impl PassiveSocket {
    /// Binds an ephemeral port on `bind_ip`. `host` is the address reported to the client.
    pub async fn listen(
        bind_ip: IpAddr,
        host: IpAddr,
        retry: RetryPolicy,
        logger: SessionLogger,
    ) -> Result<Self, DataSocketError> {
        let listener = TcpListener::bind((bind_ip, 0))
            .await
            .map_err(DataSocketError::ListenFailed)?;
        let port = listener
            .local_addr()
            .map_err(DataSocketError::ListenFailed)?
            .port();

        let (tx, rx) = oneshot::channel();
        let task_logger = logger.clone();
        let accept_task = tokio::spawn(async move {
            let accepted = listener.accept().await;
            drop(listener);
            match &accepted {
                Ok((_, addr)) => task_logger.print(format!("Data connection from {}", addr)),
                Err(e) => task_logger.print(format!("Passive accept failed: {}", e)),
            }
            let _ = tx.send(accepted.map(|(stream, _)| stream));
        });

        logger.print(format!("Passive listener on {}:{}", bind_ip, port));
        Ok(Self {
            host,
            port,
            conn: None,
            incoming: Some(rx),
            accept_task,
            retry,
            logger,
        })
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the data connection, waiting up to the retry budget for the client to dial in.
    pub async fn wait_for_open_socket(&mut self) -> Result<&mut TcpStream, DataSocketError> {
        if self.conn.is_none() {
            let conn = self.wait_for_connection().await?;
            self.conn = Some(conn);
        }
        self.conn.as_mut().ok_or(DataSocketError::Unavailable)
    }

    async fn wait_for_connection(&mut self) -> Result<TcpStream, DataSocketError> {
        let mut incoming = self.incoming.take().ok_or(DataSocketError::Unavailable)?;

        for attempt in 1..=self.retry.max_retries {
            match timeout(self.retry.interval, &mut incoming).await {
                Ok(Ok(accepted)) => return Ok(accepted?),
                Ok(Err(_)) => return Err(DataSocketError::Unavailable),
                Err(_) => self.logger.print(format!(
                    "Waiting for data connection on port {} ({}/{})",
                    self.port, attempt, self.retry.max_retries
                )),
            }
        }

        self.incoming = Some(incoming);
        Err(DataSocketError::Unavailable)
    }

    pub async fn close(mut self) {
        if let Some(mut conn) = self.conn.take() {
            let _ = conn.shutdown().await;
        }
    }
}

impl Drop for PassiveSocket {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// `(h1,h2,h3,h4,p1,p2)` as carried by a 227 reply.
pub fn format_pasv_address(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!("({},{},{},{},{},{})", h1, h2, h3, h4, port >> 8, port & 0xff)
}

/// `(|||port|)` as carried by a 229 reply.
pub fn format_epsv_port(port: u16) -> String {
    format!("(|||{}|)", port)
}

async fn open_passive_socket(session: &mut Session) -> Result<PassiveSocket, DataSocketError> {
    session.close_data_socket().await;
    PassiveSocket::listen(
        session.local_ip(),
        session.passive_listen_ip(),
        session.pasv_retry_policy(),
        session.logger().clone(),
    )
    .await
}

/// Refuses every data connection setup except EPSV once the client sent EPSV ALL.
pub(crate) async fn refuse_after_epsv_all(
    session: &mut Session,
    verb: &'static str,
) -> io::Result<bool> {
    if !session.epsv_all {
        return Ok(false);
    }
    let (code, message) = DataSocketError::EpsvOnly(verb).to_ftp_response();
    session.write_message(code, message).await?;
    Ok(true)
}

pub async fn handle_pasv_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    if refuse_after_epsv_all(session, "PASV").await? {
        return Ok(());
    }

    let ipv4 = match session.passive_listen_ip() {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(ip) => {
            warn!("PASV cannot advertise IPv6 address {}, use EPSV", ip);
            return session.write_message(425, "Data connection failed").await;
        }
    };

    match open_passive_socket(session).await {
        Ok(socket) => {
            let target = format_pasv_address(ipv4, socket.port());
            session.set_data_socket(DataSocket::Passive(socket)).await;
            session
                .write_message(227, &format!("Entering Passive Mode {}", target))
                .await
        }
        Err(e) => {
            session.logger().print(&e);
            let (code, message) = e.to_ftp_response();
            session.write_message(code, message).await
        }
    }
}

/// EPSV with no argument or a supported family opens a passive socket.
/// `EPSV ALL` opens nothing and locks the session to EPSV from then on.
pub async fn handle_epsv_command(session: &mut Session, arg: &str) -> io::Result<()> {
    if arg.eq_ignore_ascii_case("ALL") {
        session.epsv_all = true;
        return session.write_message(200, "EPSV ALL ok").await;
    }
    if !arg.is_empty() && !matches!(arg, "1" | "2") {
        let (code, message) =
            DataSocketError::UnsupportedFamily(arg.to_string()).to_ftp_response();
        return session.write_message(code, message).await;
    }

    match open_passive_socket(session).await {
        Ok(socket) => {
            let target = format_epsv_port(socket.port());
            session.set_data_socket(DataSocket::Passive(socket)).await;
            session
                .write_message(229, &format!("Entering Extended Passive Mode {}", target))
                .await
        }
        Err(e) => {
            session.logger().print(&e);
            let (code, message) = e.to_ftp_response();
            session.write_message(code, message).await
        }
    }
}
