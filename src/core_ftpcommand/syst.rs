use crate::session::Session;
use std::io;

pub async fn handle_syst_command(session: &mut Session, _arg: &str) -> io::Result<()> {
    session.write_message(215, "UNIX Type: L8").await
}
