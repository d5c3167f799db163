use crate::session::Session;
use std::io;

/// Bytes pass through unchanged either way; TYPE is acknowledged only.
pub async fn handle_type_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let representation = arg
        .split_whitespace()
        .next()
        .map(str::to_ascii_uppercase);

    match representation.as_deref() {
        Some("A") => session.write_message(200, "Type set to ASCII").await,
        Some("I") => session.write_message(200, "Type set to binary").await,
        _ => session.write_message(500, "Invalid type").await,
    }
}
