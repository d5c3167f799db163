mod common;

use common::{parse_epsv_reply, TestServer};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[tokio::test]
async fn test_store_then_size() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    assert_eq!(
        client.cmd("USER admin").await,
        "331 User name ok, password required"
    );
    assert_eq!(client.cmd("PASS admin").await, "230 Password ok, continue");
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is the current directory");
    assert_eq!(client.cmd("TYPE I").await, "200 Type set to binary");

    let (_, mut data) = client.pasv().await;
    assert!(client.cmd("STOR foo.txt").await.starts_with("150 "));
    data.write_all(b"abcd").await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);

    let done = client.reply().await;
    assert!(done.starts_with("226 "), "{}", done);
    assert!(done.ends_with("sent 4 bytes"), "{}", done);

    assert_eq!(client.cmd("SIZE /foo.txt").await, "213 4");
    assert!(server.called("put_file"));
}

#[tokio::test]
async fn test_append_and_retrieve() {
    let server = TestServer::start_with(|fs| fs.with_file("/log.txt", "one ")).await;
    let mut client = server.logged_in_client().await;

    let (_, mut data) = client.pasv().await;
    assert!(client.cmd("APPE log.txt").await.starts_with("150 "));
    data.write_all(b"two").await.unwrap();
    drop(data);
    assert!(client.reply().await.starts_with("226 "));

    let (_, mut data) = client.pasv().await;
    assert_eq!(client.cmd("RETR /log.txt").await, "150 Data transfer starting");
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"one two");
    assert_eq!(
        client.reply().await,
        "226 Closing data connection, sent 7 bytes"
    );
}

#[tokio::test]
async fn test_retrieve_from_restart_offset() {
    let server = TestServer::start_with(|fs| fs.with_file("/hello.txt", "hello world")).await;
    let mut client = server.logged_in_client().await;

    assert_eq!(client.cmd("REST 6").await, "350 Start transfer from 6");
    let (_, mut data) = client.pasv().await;
    assert!(client.cmd("RETR hello.txt").await.starts_with("150 "));
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"world");
    assert!(client.reply().await.starts_with("226 "));

    // The offset applies to one transfer only.
    let (_, mut data) = client.pasv().await;
    assert!(client.cmd("RETR hello.txt").await.starts_with("150 "));
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"hello world");
    assert!(client.reply().await.starts_with("226 "));
}

#[tokio::test]
async fn test_retrieve_missing_file() {
    let server = TestServer::start().await;
    let mut client = server.logged_in_client().await;

    let (_, mut data) = client.pasv().await;
    assert_eq!(client.cmd("RETR /nothing").await, "551 File not available");

    // The data socket is closed on failure.
    let mut buf = [0u8; 4];
    assert!(matches!(data.read(&mut buf).await, Ok(0) | Err(_)));
}

#[tokio::test]
async fn test_transfer_without_data_socket() {
    let server = TestServer::start().await;
    let mut client = server.logged_in_client().await;

    assert_eq!(client.cmd("LIST").await, "425 Data connection failed");
    assert_eq!(client.cmd("STOR a.txt").await, "425 Data connection failed");
    assert_eq!(client.cmd("RETR a.txt").await, "425 Data connection failed");
    assert!(!server.called("put_file"));
}

#[tokio::test]
async fn test_list_and_nlst() {
    let server = TestServer::start_with(|fs| {
        fs.with_file("/pub/a.txt", "aaa")
            .with_file("/pub/sub/b.txt", "b")
    })
    .await;
    let mut client = server.logged_in_client().await;

    let (_, mut data) = client.pasv().await;
    assert_eq!(
        client.cmd("LIST -la /pub").await,
        "150 Opening ASCII mode data connection for file list"
    );
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert!(client.reply().await.starts_with("226 "));

    let lines: Vec<&str> = listing.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("-rw-r--r-- 1 ftp ftp "), "{}", lines[0]);
    assert!(lines[0].ends_with(" a.txt"));
    assert!(lines[1].starts_with('d'));
    assert!(lines[1].ends_with(" sub"));

    assert_eq!(client.cmd("CWD pub").await, "250 Directory changed to /pub");
    let (_, mut data) = client.pasv().await;
    assert!(client.cmd("NLST").await.starts_with("150 "));
    let mut names = String::new();
    data.read_to_string(&mut names).await.unwrap();
    assert_eq!(names, "a.txt\r\nsub\r\n");
    assert!(client.reply().await.starts_with("226 "));
}

#[tokio::test]
async fn test_list_of_missing_directory() {
    let server = TestServer::start().await;
    let mut client = server.logged_in_client().await;

    let (_, _data) = client.pasv().await;
    assert_eq!(client.cmd("LIST /nope").await, "550 Action not taken");
}

#[tokio::test]
async fn test_second_pasv_closes_first() {
    let server = TestServer::start_with(|fs| fs.with_file("/a.txt", "x")).await;
    let mut client = server.logged_in_client().await;

    let (first, mut stale) = client.pasv().await;
    let (second, mut fresh) = client.pasv().await;
    assert_ne!(first.port(), second.port());

    assert!(client.cmd("NLST").await.starts_with("150 "));
    let mut names = String::new();
    fresh.read_to_string(&mut names).await.unwrap();
    assert_eq!(names, "a.txt\r\n");
    assert!(client.reply().await.starts_with("226 "));

    let mut buf = [0u8; 16];
    assert!(matches!(stale.read(&mut buf).await, Ok(0) | Err(_)));
}

#[tokio::test]
async fn test_passive_client_connects_late() {
    let server = TestServer::start_with(|fs| fs.with_file("/late.txt", "on time")).await;
    let mut client = server.logged_in_client().await;

    let reply = client.cmd("PASV").await;
    let addr = common::parse_pasv_reply(&reply);

    // RETR is issued before the data connection exists.
    client.send("RETR late.txt").await;
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let mut data = TcpStream::connect(addr).await.unwrap();

    assert_eq!(client.reply().await, "150 Data transfer starting");
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"on time");
    assert!(client.reply().await.starts_with("226 "));
}

#[tokio::test]
async fn test_extended_passive() {
    let server = TestServer::start().await;
    let mut client = server.logged_in_client().await;

    assert_eq!(
        client.cmd("EPSV 3").await,
        "522 Network protocol not supported, use (1,2)"
    );

    let reply = client.cmd("EPSV").await;
    assert!(reply.starts_with("229 Entering Extended Passive Mode (|||"), "{}", reply);
    let port = parse_epsv_reply(&reply);
    let mut data = TcpStream::connect(SocketAddr::from(([127, 0, 0, 1], port)))
        .await
        .unwrap();

    assert!(client.cmd("STOR e.bin").await.starts_with("150 "));
    data.write_all(&[0u8, 1, 2]).await.unwrap();
    drop(data);
    assert_eq!(
        client.reply().await,
        "226 Closing data connection, sent 3 bytes"
    );
}

#[tokio::test]
async fn test_epsv_all_refuses_other_data_commands() {
    let server = TestServer::start().await;
    let mut client = server.logged_in_client().await;

    assert_eq!(client.cmd("EPSV ALL").await, "200 EPSV ALL ok");
    assert_eq!(
        client.cmd("STOR nothing.bin").await,
        "425 Data connection failed"
    );

    let refused = "501 Only EPSV is accepted after EPSV ALL";
    assert_eq!(client.cmd("PASV").await, refused);
    assert_eq!(client.cmd("PORT 127,0,0,1,4,1").await, refused);
    assert_eq!(client.cmd("EPRT |1|127.0.0.1|1025|").await, refused);

    let reply = client.cmd("EPSV").await;
    assert!(reply.starts_with("229 "), "{}", reply);
}

#[tokio::test]
async fn test_active_mode() {
    let server = TestServer::start_with(|fs| fs.with_file("/active.txt", "dialed")).await;
    let mut client = server.logged_in_client().await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client
        .cmd(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff))
        .await;
    assert_eq!(reply, format!("200 Connection established ({})", port));
    let (mut data, _) = listener.accept().await.unwrap();

    assert!(client.cmd("RETR active.txt").await.starts_with("150 "));
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"dialed");
    assert!(client.reply().await.starts_with("226 "));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client.cmd(&format!("EPRT |1|127.0.0.1|{}|", port)).await;
    assert_eq!(reply, format!("200 Connection established ({})", port));
    let _ = listener.accept().await.unwrap();

    assert_eq!(
        client.cmd("EPRT |3|127.0.0.1|21|").await,
        "522 Network protocol not supported, use (1,2)"
    );
    assert_eq!(
        client.cmd("PORT 1,2,3").await,
        "501 Syntax error in parameters or arguments."
    );
}

#[tokio::test]
async fn test_port_to_closed_port() {
    let server = TestServer::start().await;
    let mut client = server.logged_in_client().await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    assert_eq!(
        client
            .cmd(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff))
            .await,
        "425 Data connection failed"
    );
}
