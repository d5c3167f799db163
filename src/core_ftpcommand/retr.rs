use crate::session::Session;
use std::io;

/// Handles the RETR (Retrieve) FTP command.
///
/// Streams the file over the open data connection, starting at the offset
/// recorded by a preceding REST.
///
/// # Arguments
///
/// * `session` - The logged in session holding the data connection.
/// * `arg` - The file to send.
///
/// # Returns
///
/// An I/O error only when a control reply cannot be written.
pub async fn handle_retr_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);
    let offset = std::mem::take(&mut session.last_file_pos);

    if !session.has_data_socket() {
        return session.write_message(425, "Data connection failed").await;
    }

    let reader = match session.driver().get_file(&path, offset).await {
        Ok(reader) => reader,
        Err(e) => {
            session.logger().print(format!("RETR {} failed: {}", path, e));
            session.close_data_socket().await;
            return session.write_message(551, "File not available").await;
        }
    };

    session.write_message(150, "Data transfer starting").await?;
    if let Err(e) = session.send_outofband_stream(reader).await? {
        session
            .logger()
            .print(format!("RETR {} aborted: {}", path, e));
        session.write_message(551, "File not available").await?;
    }
    Ok(())
}
