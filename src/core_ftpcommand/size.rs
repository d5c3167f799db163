use crate::session::Session;
use std::io;

/// Handles the SIZE FTP command: replies 213 with the file length in bytes.
pub async fn handle_size_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);

    match session.driver().bytes(&path).await {
        Ok(size) => session.write_message(213, &size.to_string()).await,
        Err(e) => {
            session.logger().print(format!("SIZE {} failed: {}", path, e));
            session.write_message(450, "file not available").await
        }
    }
}
