use crate::constants::{DEFAULT_PASV_MAX_RETRIES, DEFAULT_PASV_RETRY_INTERVAL_MS};
use crate::core_network::error::DataSocketError;
use crate::core_network::pasv::PassiveSocket;
use crate::core_network::port::ActiveSocket;
use std::net::IpAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Bounds how long a passive socket waits for the client to connect.
///
/// The wait is at most `max_retries * interval`, after which the data
/// socket is treated as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_PASV_MAX_RETRIES,
            interval: Duration::from_millis(DEFAULT_PASV_RETRY_INTERVAL_MS),
        }
    }
}

/// The data channel of a session, dialed out (PORT/EPRT) or listened for (PASV/EPSV).
pub enum DataSocket {
    Active(ActiveSocket),
    Passive(PassiveSocket),
}

impl DataSocket {
    pub fn host(&self) -> IpAddr {
        match self {
            DataSocket::Active(socket) => socket.host(),
            DataSocket::Passive(socket) => socket.host(),
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            DataSocket::Active(socket) => socket.port(),
            DataSocket::Passive(socket) => socket.port(),
        }
    }

    /// The connected stream. For a passive socket this waits for the client
    /// within the retry budget.
    pub async fn stream(&mut self) -> Result<&mut TcpStream, DataSocketError> {
        match self {
            DataSocket::Active(socket) => Ok(socket.stream()),
            DataSocket::Passive(socket) => socket.wait_for_open_socket().await,
        }
    }

    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, DataSocketError> {
        Ok(self.stream().await?.read(buf).await?)
    }

    pub async fn write(&mut self, data: &[u8]) -> Result<(), DataSocketError> {
        let stream = self.stream().await?;
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Streams `reader` to the peer until EOF.
    pub async fn copy_from<R>(&mut self, reader: &mut R) -> Result<u64, DataSocketError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let stream = self.stream().await?;
        let copied = tokio::io::copy(reader, stream).await?;
        stream.flush().await?;
        Ok(copied)
    }

    /// Streams everything the peer sends into `writer` until the peer closes.
    pub async fn copy_to<W>(&mut self, writer: &mut W) -> Result<u64, DataSocketError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let stream = self.stream().await?;
        let copied = tokio::io::copy(stream, writer).await?;
        writer.flush().await?;
        Ok(copied)
    }

    pub async fn close(self) {
        match self {
            DataSocket::Active(socket) => socket.close().await,
            DataSocket::Passive(socket) => socket.close().await,
        }
    }
}
