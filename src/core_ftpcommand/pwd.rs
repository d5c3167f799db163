use crate::session::Session;
use std::io;

/// Handles the PWD (Print Working Directory) FTP command.
pub async fn handle_pwd_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    let message = format!("\"{}\" is the current directory", session.name_prefix());
    session.write_message(257, &message).await
}
