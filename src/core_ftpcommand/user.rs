use crate::session::Session;
use std::io;

/// Stages the user name for the following PASS.
pub async fn handle_user_command(session: &mut Session, arg: &str) -> io::Result<()> {
    session.req_user = arg.to_string();

    if session.context().auth.allow_anonymous() && arg.eq_ignore_ascii_case("anonymous") {
        session
            .write_message(331, "Anonymous login ok, send your email as password")
            .await
    } else {
        session
            .write_message(331, "User name ok, password required")
            .await
    }
}
