use crate::session::Session;
use std::io;

/// Stages the source path of a rename for the following RNTO.
pub async fn handle_rnfr_command(session: &mut Session, arg: &str) -> io::Result<()> {
    session.rename_from = Some(session.build_path(arg));
    session
        .write_message(350, "Requested file action pending further information.")
        .await
}
