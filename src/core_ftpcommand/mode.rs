use crate::session::Session;
use std::io;

/// Only stream mode is supported.
pub async fn handle_mode_command(session: &mut Session, arg: &str) -> io::Result<()> {
    if arg.eq_ignore_ascii_case("S") {
        session.write_message(200, "OK").await
    } else {
        session.write_message(504, "MODE is an obsolete command").await
    }
}
