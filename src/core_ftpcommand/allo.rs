use crate::session::Session;
use std::io;

pub async fn handle_allo_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    session.write_message(202, "Obsolete").await
}
