#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ferroftpd::config::Config;
use ferroftpd::core_auth::SimpleAuth;
use ferroftpd::core_driver::{
    Driver, DriverError, DriverFactory, FileInfo, FileReader, MemDriverFactory, SimplePerm,
};
use ferroftpd::{Server, ServerOpts};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Forwards to an in-memory driver and records every operation it sees.
pub struct RecordingDriver {
    inner: Box<dyn Driver>,
    calls: CallLog,
}

impl RecordingDriver {
    fn record(&self, op: &str, path: &str) {
        self.calls.lock().unwrap().push(format!("{} {}", op, path));
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn change_dir(&mut self, path: &str) -> Result<(), DriverError> {
        self.record("change_dir", path);
        self.inner.change_dir(path).await
    }

    async fn dir_contents(&mut self, path: &str) -> Result<Vec<FileInfo>, DriverError> {
        self.record("dir_contents", path);
        self.inner.dir_contents(path).await
    }

    async fn delete_dir(&mut self, path: &str) -> Result<(), DriverError> {
        self.record("delete_dir", path);
        self.inner.delete_dir(path).await
    }

    async fn delete_file(&mut self, path: &str) -> Result<(), DriverError> {
        self.record("delete_file", path);
        self.inner.delete_file(path).await
    }

    async fn rename(&mut self, from: &str, to: &str) -> Result<(), DriverError> {
        self.record("rename", &format!("{} {}", from, to));
        self.inner.rename(from, to).await
    }

    async fn make_dir(&mut self, path: &str) -> Result<(), DriverError> {
        self.record("make_dir", path);
        self.inner.make_dir(path).await
    }

    async fn bytes(&mut self, path: &str) -> Result<u64, DriverError> {
        self.record("bytes", path);
        self.inner.bytes(path).await
    }

    async fn modified_time(&mut self, path: &str) -> Result<DateTime<Utc>, DriverError> {
        self.record("modified_time", path);
        self.inner.modified_time(path).await
    }

    async fn get_file(&mut self, path: &str, offset: u64) -> Result<FileReader, DriverError> {
        self.record("get_file", path);
        self.inner.get_file(path, offset).await
    }

    async fn put_file(
        &mut self,
        path: &str,
        data: FileReader,
        append: bool,
    ) -> Result<u64, DriverError> {
        self.record("put_file", path);
        self.inner.put_file(path, data, append).await
    }
}

pub struct RecordingFactory {
    inner: MemDriverFactory,
    calls: CallLog,
}

impl DriverFactory for RecordingFactory {
    fn new_driver(&self) -> Result<Box<dyn Driver>, DriverError> {
        Ok(Box::new(RecordingDriver {
            inner: self.inner.new_driver()?,
            calls: Arc::clone(&self.calls),
        }))
    }
}

pub struct TestServer {
    pub server: Arc<Server>,
    pub addr: SocketAddr,
    pub calls: CallLog,
}

/// Server certificate for `localhost`, signed by the CA in `ca.pem`.
pub const SERVER_CERT_PEM: &str = include_str!("../fixtures/server.pem");
pub const SERVER_KEY_PEM: &str = include_str!("../fixtures/server.key");
pub const CA_CERT_PEM: &str = include_str!("../fixtures/ca.pem");

/// Writes `pem` to a temp file that lives as long as the returned handle.
pub fn pem_file(pem: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(pem.as_bytes()).unwrap();
    file
}

fn loopback_config() -> Config {
    let mut config = Config::default();
    config.server.hostname = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.pasv_max_retries = 8;
    config.server.pasv_retry_interval_ms = 250;
    config
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|factory| factory).await
    }

    /// Starts a server on a loopback ephemeral port with `admin`/`admin` credentials.
    pub async fn start_with(seed: impl FnOnce(MemDriverFactory) -> MemDriverFactory) -> Self {
        Self::start_configured(loopback_config(), seed).await
    }

    /// Like `start`, with the loopback config adjusted by `configure` first.
    pub async fn start_with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = loopback_config();
        configure(&mut config);
        Self::start_configured(config, |factory| factory).await
    }

    /// Starts a server backed by `factory` instead of a recording in-memory one.
    pub async fn start_with_factory(factory: Arc<dyn DriverFactory>) -> Self {
        Self::launch(loopback_config(), factory, Arc::new(Mutex::new(Vec::new()))).await
    }

    async fn start_configured(
        config: Config,
        seed: impl FnOnce(MemDriverFactory) -> MemDriverFactory,
    ) -> Self {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let factory = RecordingFactory {
            inner: seed(MemDriverFactory::new(SimplePerm::new("ftp", "ftp"))),
            calls: Arc::clone(&calls),
        };
        Self::launch(config, Arc::new(factory), calls).await
    }

    async fn launch(config: Config, factory: Arc<dyn DriverFactory>, calls: CallLog) -> Self {
        let server = Arc::new(
            Server::new(ServerOpts {
                config,
                factory,
                auth: Arc::new(SimpleAuth::new("admin", "admin")),
            })
            .unwrap(),
        );
        let listener = server.listen().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let serving = Arc::clone(&server);
        tokio::spawn(async move { serving.serve(listener).await });

        Self {
            server,
            addr,
            calls,
        }
    }

    pub fn called(&self, op: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|call| call.split(' ').next() == Some(op))
    }

    pub async fn client(&self) -> Client {
        Client::connect(self.addr).await
    }

    pub async fn logged_in_client(&self) -> Client {
        let mut client = self.client().await;
        client.login().await;
        client
    }
}

/// Line oriented control connection client.
pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read),
            writer,
        };
        let welcome = client.reply().await;
        assert!(welcome.starts_with("220 "), "{}", welcome);
        client
    }

    /// Next reply line without CRLF. Empty once the server hangs up.
    pub async fn reply(&mut self) -> String {
        let mut line = String::new();
        tokio::time::timeout(Duration::from_secs(10), self.reader.read_line(&mut line))
            .await
            .expect("server reply timed out")
            .unwrap_or(0);
        line.trim_end().to_string()
    }

    /// Hands back the raw connection, e.g. to run a TLS handshake after `234`.
    pub fn into_stream(self) -> TcpStream {
        assert!(self.reader.buffer().is_empty(), "unread reply bytes");
        self.reader.into_inner().reunite(self.writer).unwrap()
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    pub async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.reply().await
    }

    pub async fn login(&mut self) {
        assert!(self.cmd("USER admin").await.starts_with("331 "));
        assert_eq!(self.cmd("PASS admin").await, "230 Password ok, continue");
    }

    /// Sends PASV and connects to the advertised address.
    pub async fn pasv(&mut self) -> (SocketAddr, TcpStream) {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        let addr = parse_pasv_reply(&reply);
        let data = TcpStream::connect(addr).await.unwrap();
        (addr, data)
    }
}

pub fn parse_pasv_reply(reply: &str) -> SocketAddr {
    let start = reply.find('(').unwrap() + 1;
    let end = reply.rfind(')').unwrap();
    let fields: Vec<u8> = reply[start..end]
        .split(',')
        .map(|field| field.parse().unwrap())
        .collect();
    let ip = Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]);
    let port = u16::from(fields[4]) << 8 | u16::from(fields[5]);
    SocketAddr::new(IpAddr::V4(ip), port)
}

pub fn parse_epsv_reply(reply: &str) -> u16 {
    let start = reply.find("(|||").unwrap() + 4;
    let end = reply.rfind("|)").unwrap();
    reply[start..end].parse().unwrap()
}
