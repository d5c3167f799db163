use crate::session::Session;
use std::io;

/// Only file structure is supported.
pub async fn handle_stru_command(session: &mut Session, arg: &str) -> io::Result<()> {
    if arg.eq_ignore_ascii_case("F") {
        session.write_message(200, "OK").await
    } else {
        session.write_message(504, "STRU is an obsolete command").await
    }
}
