use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::session::Session;
use std::io;

/// CDUP is CWD to the parent directory.
pub async fn handle_cdup_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    handle_cwd_command(session, "..").await
}
