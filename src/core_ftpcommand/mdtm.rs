use crate::session::Session;
use std::io;

/// Replies 213 with the file's modification time as `YYYYMMDDHHMMSS`.
pub async fn handle_mdtm_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let path = session.build_path(arg);

    match session.driver().modified_time(&path).await {
        Ok(time) => {
            let stamp = time.format("%Y%m%d%H%M%S").to_string();
            session.write_message(213, &stamp).await
        }
        Err(e) => {
            session.logger().print(format!("MDTM {} failed: {}", path, e));
            session.write_message(550, "Action not taken").await
        }
    }
}
