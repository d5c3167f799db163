use crate::session::Session;
use std::io;

/// Handles the MKD (Make Directory) FTP command.
pub async fn handle_mkd_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);

    match session.driver().make_dir(&path).await {
        Ok(()) => session.write_message(257, "Directory created").await,
        Err(e) => {
            session.logger().print(format!("MKD {} failed: {}", path, e));
            session.write_message(550, "Action not taken").await
        }
    }
}
