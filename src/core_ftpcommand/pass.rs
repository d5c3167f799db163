use crate::session::Session;
use std::io;
use std::sync::Arc;

/// Checks the password for the user staged by USER.
///
/// The staged user is consumed whatever the outcome, so a failed attempt
/// needs a fresh USER before the next PASS.
pub async fn handle_pass_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let user = std::mem::take(&mut session.req_user);
    if user.is_empty() {
        return session
            .write_message(530, "Incorrect password, not logged in")
            .await;
    }

    let auth = Arc::clone(&session.context().auth);
    match auth.check_passwd(&user, arg).await {
        Ok(true) => {
            session.logger().print(format!("User {} logged in", user));
            session.user = user;
            session.write_message(230, "Password ok, continue").await
        }
        Ok(false) => {
            session.logger().print(format!("Login failed for {}", user));
            session
                .write_message(530, "Incorrect password, not logged in")
                .await
        }
        Err(e) => {
            session
                .logger()
                .print(format!("Password check for {} failed: {}", user, e));
            session
                .write_message(530, "Incorrect password, not logged in")
                .await
        }
    }
}
