use crate::core_driver::{Driver, FileReader};
use crate::core_log::SessionLogger;
use crate::core_network::network::shutdown_signalled;
use crate::core_network::{ControlStream, DataSocket, DataSocketError, RetryPolicy};
use crate::core_tls::TlsError;
use crate::helpers::{clean_path, new_session_id};
use crate::server::ServerContext;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::sync::watch;

/// Outcome of a data-connection transfer: bytes moved, or why the data socket failed.
pub type TransferResult = Result<u64, DataSocketError>;

/// Splits a control line into an upper-cased verb and its parameter.
pub fn parse_line(line: &str) -> (String, String) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.split_once(' ') {
        Some((verb, param)) => (verb.to_ascii_uppercase(), param.to_string()),
        None => (line.to_ascii_uppercase(), String::new()),
    }
}

/// Resolves a client supplied path against `name_prefix`.
///
/// The result is always absolute and lexically clean. `-a` counts as an
/// empty argument since some clients send `LIST -a`.
pub fn build_path(name_prefix: &str, filename: &str) -> String {
    if filename.starts_with('/') {
        clean_path(filename)
    } else if filename.is_empty() || filename == "-a" {
        clean_path(&format!("/{}", name_prefix))
    } else {
        clean_path(&format!("/{}/{}", name_prefix, filename))
    }
}

/// One control connection and the per-client state commands act on.
pub struct Session {
    ctx: Arc<ServerContext>,
    driver: Box<dyn Driver>,
    control: Option<BufStream<ControlStream>>,
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
    data_socket: Option<DataSocket>,
    logger: SessionLogger,
    shutdown: watch::Receiver<bool>,
    closed: bool,
    tls: bool,
    pub(crate) name_prefix: String,
    pub(crate) req_user: String,
    pub(crate) user: String,
    pub(crate) rename_from: Option<String>,
    pub(crate) last_file_pos: u64,
    pub(crate) append_data: bool,
    pub(crate) epsv_all: bool,
}

impl Session {
    pub fn new(
        stream: ControlStream,
        ctx: Arc<ServerContext>,
        driver: Box<dyn Driver>,
        shutdown: watch::Receiver<bool>,
    ) -> io::Result<Self> {
        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        let tls = stream.is_tls();

        Ok(Self {
            ctx,
            driver,
            control: Some(BufStream::new(stream)),
            local_addr,
            peer_addr,
            data_socket: None,
            logger: SessionLogger::new(new_session_id()),
            shutdown,
            closed: false,
            tls,
            name_prefix: "/".to_string(),
            req_user: String::new(),
            user: String::new(),
            rename_from: None,
            last_file_pos: 0,
            append_data: false,
            epsv_all: false,
        })
    }

    pub fn session_id(&self) -> &str {
        self.logger.session_id()
    }

    pub fn logger(&self) -> &SessionLogger {
        &self.logger
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.ctx
    }

    pub(crate) fn driver(&mut self) -> &mut dyn Driver {
        self.driver.as_mut()
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn login_user(&self) -> &str {
        &self.user
    }

    pub fn is_login(&self) -> bool {
        !self.user.is_empty()
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn build_path(&self, filename: &str) -> String {
        build_path(&self.name_prefix, filename)
    }

    /// Local address of the control connection, with IPv4-mapped IPv6 unwrapped.
    pub fn local_ip(&self) -> IpAddr {
        match self.local_addr.ip() {
            IpAddr::V6(ip) => ip
                .to_ipv4_mapped()
                .map(IpAddr::V4)
                .unwrap_or(IpAddr::V6(ip)),
            ip => ip,
        }
    }

    /// The address reported in PASV/EPSV replies.
    pub fn passive_listen_ip(&self) -> IpAddr {
        self.ctx.config.server.public_ip.unwrap_or_else(|| self.local_ip())
    }

    pub fn pasv_retry_policy(&self) -> RetryPolicy {
        self.ctx.config.server.pasv_retry_policy()
    }

    /// Reads and executes commands until the client quits, the connection
    /// fails or the server shuts down.
    pub async fn serve(mut self) {
        self.logger
            .print(format!("Connection Established from {}", self.peer_addr));

        let welcome = self.ctx.config.server.welcome_message.clone();
        if let Err(e) = self.write_message(220, &welcome).await {
            self.logger.print(format!("Cannot send welcome: {}", e));
            self.close().await;
            return;
        }

        let mut shutdown = self.shutdown.clone();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = {
                let Some(control) = self.control.as_mut() else {
                    break;
                };
                tokio::select! {
                    read = control.read_until(b'\n', &mut buf) => read,
                    _ = shutdown_signalled(&mut shutdown) => {
                        self.logger.print("Server shutting down, closing connection");
                        break;
                    }
                }
            };

            match read {
                Ok(0) => {
                    self.logger.print("Client closed the control connection");
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if let Err(e) = self.receive_line(&line).await {
                        self.logger.print(format!("Control connection failed: {}", e));
                        break;
                    }
                    if self.closed {
                        break;
                    }
                }
                Err(e) => {
                    self.logger.print(format!("Read error: {}", e));
                    break;
                }
            }
        }

        self.close().await;
        self.logger.print("Connection Terminated");
    }

    /// Dispatches one control line through the registry.
    pub(crate) async fn receive_line(&mut self, line: &str) -> io::Result<()> {
        let (verb, param) = parse_line(line);
        self.logger.print_command(&verb, &param);

        let Some(command) = self.ctx.registry.lookup(&verb) else {
            return self.write_message(500, "Command not found").await;
        };

        if command.requires_param() && param.is_empty() {
            self.write_message(553, "action aborted, required param missing")
                .await
        } else if command.requires_auth() && !self.is_login() {
            self.write_message(530, "not logged in").await
        } else {
            command.execute(self, &param).await
        }
    }

    /// Writes `<code> <message>\r\n` and flushes it.
    pub async fn write_message(&mut self, code: u16, message: &str) -> io::Result<()> {
        self.logger.print_response(code, message);
        let control = self.control.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "control connection closed")
        })?;
        control
            .write_all(format!("{} {}\r\n", code, message).as_bytes())
            .await?;
        control.flush().await
    }

    pub fn has_data_socket(&self) -> bool {
        self.data_socket.is_some()
    }

    /// Installs a new data socket, closing any previous one first.
    pub(crate) async fn set_data_socket(&mut self, socket: DataSocket) {
        self.close_data_socket().await;
        self.logger.print(format!(
            "Data socket ready on {}:{}",
            socket.host(),
            socket.port()
        ));
        self.data_socket = Some(socket);
    }

    pub(crate) async fn close_data_socket(&mut self) {
        if let Some(socket) = self.data_socket.take() {
            socket.close().await;
        }
    }

    /// Writes `data` to the data connection, closes it and replies 226.
    ///
    /// The outer `Err` is a control connection failure. The inner one is a
    /// data connection failure, left for the caller to report.
    pub(crate) async fn send_outofband_data(&mut self, data: &[u8]) -> io::Result<TransferResult> {
        let result = match self.data_socket.take() {
            Some(mut socket) => {
                let written = socket.write(data).await;
                socket.close().await;
                written.map(|()| data.len() as u64)
            }
            None => Err(DataSocketError::Unavailable),
        };
        self.finish_transfer(result).await
    }

    /// Copies `reader` to the data connection until EOF, closes it and replies 226.
    pub(crate) async fn send_outofband_stream(
        &mut self,
        mut reader: FileReader,
    ) -> io::Result<TransferResult> {
        let result = match self.data_socket.take() {
            Some(mut socket) => {
                let copied = socket.copy_from(&mut reader).await;
                socket.close().await;
                copied
            }
            None => Err(DataSocketError::Unavailable),
        };
        self.finish_transfer(result).await
    }

    /// Drains the data connection into `writer` and closes it. Sends no reply.
    pub(crate) async fn receive_outofband_stream<W>(&mut self, writer: &mut W) -> TransferResult
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.last_file_pos = 0;
        match self.data_socket.take() {
            Some(mut socket) => {
                let copied = socket.copy_to(writer).await;
                socket.close().await;
                copied
            }
            None => Err(DataSocketError::Unavailable),
        }
    }

    async fn finish_transfer(&mut self, result: TransferResult) -> io::Result<TransferResult> {
        self.last_file_pos = 0;
        if let Ok(bytes) = &result {
            self.write_message(226, &format!("Closing data connection, sent {} bytes", bytes))
                .await?;
        }
        Ok(result)
    }

    /// Runs a server-side TLS handshake over the control connection.
    ///
    /// On failure the plaintext stream is put back untouched.
    pub(crate) async fn upgrade_to_tls(&mut self) -> Result<(), TlsError> {
        let tls = self.ctx.tls.clone().ok_or(TlsError::NotConfigured)?;
        let control = self
            .control
            .take()
            .ok_or_else(|| TlsError::Handshake("control connection closed".into()))?;

        match control.into_inner() {
            ControlStream::Plain(tcp) => match tls.accept_tls(tcp).await {
                Ok(stream) => {
                    self.control = Some(BufStream::new(ControlStream::Tls(Box::new(stream))));
                    self.tls = true;
                    self.logger.print("Control connection upgraded to TLS");
                    Ok(())
                }
                Err((e, tcp)) => {
                    self.control = Some(BufStream::new(ControlStream::Plain(tcp)));
                    Err(e)
                }
            },
            stream @ ControlStream::Tls(_) => {
                self.control = Some(BufStream::new(stream));
                Err(TlsError::Config("already using TLS".into()))
            }
        }
    }

    /// Closes the data socket and the control connection. Safe to call more than once.
    pub async fn close(&mut self) {
        self.closed = true;
        self.close_data_socket().await;
        if let Some(mut control) = self.control.take() {
            let _ = control.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("USER admin\r\n"),
            ("USER".to_string(), "admin".to_string())
        );
        assert_eq!(parse_line("pwd\r\n"), ("PWD".to_string(), String::new()));
        assert_eq!(
            parse_line("stor my file.txt\n"),
            ("STOR".to_string(), "my file.txt".to_string())
        );
        assert_eq!(parse_line("\r\n"), (String::new(), String::new()));
    }

    #[test]
    fn test_build_path() {
        assert_eq!(build_path("/", "/"), "/");
        assert_eq!(build_path("/", ""), "/");
        assert_eq!(build_path("/", "one.txt"), "/one.txt");
        assert_eq!(build_path("/files", "two.txt"), "/files/two.txt");
        assert_eq!(build_path("", "files/two.txt"), "/files/two.txt");
        assert_eq!(build_path("/files", "-a"), "/files");
        assert_eq!(build_path("/files", ".."), "/");
        assert_eq!(build_path("/files", "/../../../../etc/passwd"), "/etc/passwd");
        assert_eq!(build_path("/files", "../../../etc/passwd"), "/etc/passwd");
    }

    #[test]
    fn test_build_path_is_idempotent() {
        let prefixes = ["/", "/files", "/a/b"];
        let inputs = ["", "-a", "x.txt", "../up", "./a//b/", "/abs/../c", "../../.."];
        for prefix in prefixes {
            for input in inputs {
                let once = build_path(prefix, input);
                assert!(once.starts_with('/'));
                assert_eq!(build_path(prefix, &once), once, "{} + {}", prefix, input);
            }
        }
    }
}
