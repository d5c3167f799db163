use crate::session::Session;
use std::io;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The target is resolved against the current directory and checked with the
/// driver before the session moves there.
///
/// # Arguments
///
/// * `session` - The session whose working directory changes.
/// * `arg` - The directory to change into, absolute or relative.
///
/// # Returns
///
/// An I/O error only when the reply cannot be written.
pub async fn handle_cwd_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);

    match session.driver().change_dir(&path).await {
        Ok(()) => {
            let message = format!("Directory changed to {}", path);
            session.name_prefix = path;
            session.write_message(250, &message).await
        }
        Err(e) => {
            session.logger().print(format!("CWD {} failed: {}", path, e));
            session.write_message(550, "Action not taken").await
        }
    }
}
