use crate::session::Session;
use std::io;

/// Handles the RMD (Remove Directory) FTP command.
pub async fn handle_rmd_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);

    match session.driver().delete_dir(&path).await {
        Ok(()) => session.write_message(250, "Directory deleted").await,
        Err(e) => {
            session.logger().print(format!("RMD {} failed: {}", path, e));
            session.write_message(550, "Action not taken").await
        }
    }
}
