use crate::session::Session;
use std::io;

/// Says goodbye and closes the session.
pub async fn handle_quit_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    session.write_message(221, "Goodbye").await?;
    session.close().await;
    Ok(())
}
