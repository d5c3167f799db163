use crate::session::Session;
use std::io;

/// Handles the DELE (Delete File) FTP command.
///
/// # Arguments
///
/// * `session` - The logged in session.
/// * `arg` - The file to delete, resolved against the working directory.
///
/// # Returns
///
/// An I/O error only when the reply cannot be written. Driver failures reply 550.
pub async fn handle_dele_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);

    match session.driver().delete_file(&path).await {
        Ok(()) => session.write_message(250, "File deleted").await,
        Err(e) => {
            session.logger().print(format!("DELE {} failed: {}", path, e));
            session.write_message(550, "Action not taken").await
        }
    }
}
