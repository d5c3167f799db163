use crate::session::Session;
use std::io;

/// Completes a rename staged by RNFR. The staged source is cleared whatever the outcome.
pub async fn handle_rnto_command(session: &mut Session, arg: &str) -> io::Result<()> {
    let Some(from) = session.rename_from.take() else {
        session.logger().print("RNTO without a preceding RNFR");
        return session.write_message(550, "Action not taken").await;
    };
    let to = session.build_path(arg);

    match session.driver().rename(&from, &to).await {
        Ok(()) => session.write_message(250, "File renamed").await,
        Err(e) => {
            session
                .logger()
                .print(format!("RNTO {} -> {} failed: {}", from, to, e));
            session.write_message(550, "Action not taken").await
        }
    }
}
