use crate::session::Session;
use std::io;

/// Records the offset the next RETR starts from.
pub async fn handle_rest_command(session: &mut Session, arg: &str) -> io::Result<()> {
    match arg.trim().parse::<u64>() {
        Ok(offset) => {
            session.last_file_pos = offset;
            session
                .write_message(350, &format!("Start transfer from {}", offset))
                .await
        }
        Err(_) => session.write_message(501, "Invalid restart position").await,
    }
}
