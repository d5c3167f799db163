use crate::core_tls::TlsError;
use crate::session::Session;
use std::io;

/// Explicit TLS upgrade of the control connection.
///
/// The 234 reply goes out in plaintext before the handshake starts. If the
/// handshake fails the session keeps its plaintext stream and no reply is
/// sent, since the client is mid-handshake.
pub async fn handle_auth_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let mechanism = arg.trim().to_ascii_uppercase();
    if !matches!(mechanism.as_str(), "TLS" | "TLS-C" | "SSL") {
        return session
            .write_message(504, "Unsupported security mechanism")
            .await;
    }

    if session.is_tls() {
        return session.write_message(534, "Already using TLS").await;
    }

    if session.context().tls.is_none() {
        let (code, message) = TlsError::NotConfigured.to_ftp_response();
        return session.write_message(code, message).await;
    }

    session
        .write_message(234, "AUTH command OK, starting TLS")
        .await?;

    if let Err(e) = session.upgrade_to_tls().await {
        session.logger().print(format!("TLS upgrade failed: {}", e));
    }
    Ok(())
}

pub async fn handle_pbsz_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    session.write_message(200, "PBSZ=0").await
}

/// Data connections are always plaintext, so only the clear level is accepted.
pub async fn handle_prot_command(session: &mut Session, arg: &str) -> io::Result<()> {
    match arg.trim().to_ascii_uppercase().as_str() {
        "C" => session.write_message(200, "OK").await,
        "P" | "S" | "E" => {
            session
                .write_message(536, "Requested PROT level not supported")
                .await
        }
        _ => {
            session
                .write_message(504, "Unsupported protection level")
                .await
        }
    }
}
