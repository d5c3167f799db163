use crate::session::Session;
use std::io;

pub async fn handle_noop_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    session.write_message(200, "OK").await
}
