use log::{debug, info};
use std::fmt::Display;

/// Writes log lines tagged with the id of the session that produced them.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
}

impl SessionLogger {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn print(&self, message: impl Display) {
        info!("{}   {}", self.session_id, message);
    }

    /// Logs an incoming command. The PASS parameter never reaches the log.
    pub fn print_command(&self, command: &str, param: &str) {
        if command.eq_ignore_ascii_case("PASS") {
            debug!("{} > PASS ****", self.session_id);
        } else {
            debug!("{} > {} {}", self.session_id, command, param);
        }
    }

    pub fn print_response(&self, code: u16, message: &str) {
        debug!("{} < {} {}", self.session_id, code, message);
    }
}
