use crate::core_log::SessionLogger;
use crate::core_network::data_socket::{DataSocket, RetryPolicy};
use crate::core_network::error::DataSocketError;
use crate::core_network::pasv::refuse_after_epsv_all;
use crate::session::Session;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// A data connection the server dialed out to the client's listener.
pub struct ActiveSocket {
    conn: TcpStream,
    host: IpAddr,
    port: u16,
}

impl ActiveSocket {
    pub async fn connect(
        addr: SocketAddr,
        retry: RetryPolicy,
        logger: &SessionLogger,
    ) -> Result<Self, DataSocketError> {
        logger.print(format!("Opening data connection to {}", addr));
        let budget = retry.interval * retry.max_retries;
        let conn = match timeout(budget, TcpStream::connect(addr)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(source)) => return Err(DataSocketError::ConnectFailed { addr, source }),
            Err(_) => {
                return Err(DataSocketError::ConnectFailed {
                    addr,
                    source: io::ErrorKind::TimedOut.into(),
                })
            }
        };

        Ok(Self {
            conn,
            host: addr.ip(),
            port: addr.port(),
        })
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn stream(&mut self) -> &mut TcpStream {
        &mut self.conn
    }

    pub async fn close(mut self) {
        let _ = self.conn.shutdown().await;
    }
}

/// Parses a PORT argument, `h1,h2,h3,h4,p1,p2`.
pub fn parse_port_param(param: &str) -> Result<SocketAddr, DataSocketError> {
    let malformed = || DataSocketError::MalformedAddress(param.to_string());

    let octets = param
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| malformed())?;
    let [h1, h2, h3, h4, p1, p2] = octets[..] else {
        return Err(malformed());
    };

    let ip = Ipv4Addr::new(h1, h2, h3, h4);
    let port = u16::from(p1) << 8 | u16::from(p2);
    Ok(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Parses an EPRT argument, `<d>family<d>address<d>port<d>` (RFC 2428).
pub fn parse_eprt_param(param: &str) -> Result<SocketAddr, DataSocketError> {
    let malformed = || DataSocketError::MalformedAddress(param.to_string());

    let delimiter = param.chars().next().ok_or_else(malformed)?;
    let fields: Vec<&str> = param[delimiter.len_utf8()..].split(delimiter).collect();
    let [family, address, port, ""] = fields[..] else {
        return Err(malformed());
    };

    let ip = match family {
        "1" => IpAddr::V4(address.parse::<Ipv4Addr>().map_err(|_| malformed())?),
        "2" => IpAddr::V6(address.parse::<Ipv6Addr>().map_err(|_| malformed())?),
        other => return Err(DataSocketError::UnsupportedFamily(other.to_string())),
    };
    let port = port.parse::<u16>().map_err(|_| malformed())?;
    Ok(SocketAddr::new(ip, port))
}

async fn open_active_socket(session: &mut Session, addr: SocketAddr) -> io::Result<()> {
    session.close_data_socket().await;

    let logger = session.logger().clone();
    match ActiveSocket::connect(addr, session.pasv_retry_policy(), &logger).await {
        Ok(socket) => {
            let port = socket.port();
            session.set_data_socket(DataSocket::Active(socket)).await;
            session
                .write_message(200, &format!("Connection established ({})", port))
                .await
        }
        Err(e) => {
            session.logger().print(&e);
            let (code, message) = e.to_ftp_response();
            session.write_message(code, message).await
        }
    }
}

pub async fn handle_port_command(session: &mut Session, arg: &str) -> io::Result<()> {
    if refuse_after_epsv_all(session, "PORT").await? {
        return Ok(());
    }
    match parse_port_param(arg) {
        Ok(addr) => open_active_socket(session, addr).await,
        Err(e) => {
            let (code, message) = e.to_ftp_response();
            session.write_message(code, message).await
        }
    }
}

pub async fn handle_eprt_command(session: &mut Session, arg: &str) -> io::Result<()> {
    if refuse_after_epsv_all(session, "EPRT").await? {
        return Ok(());
    }
    match parse_eprt_param(arg) {
        Ok(addr) => open_active_socket(session, addr).await,
        Err(e) => {
            let (code, message) = e.to_ftp_response();
            session.write_message(code, message).await
        }
    }
}
