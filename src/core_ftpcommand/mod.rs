pub mod allo;
pub mod auth;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod ftpcommand;
pub mod handlers;
pub mod list;
pub mod mdtm;
pub mod mkd;
pub mod mode;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod rest;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod size;
pub mod stor;
pub mod stru;
pub mod syst;
pub mod type_;
pub mod user;

pub use ftpcommand::FtpCommand;
pub use handlers::{initialize_command_handlers, CommandRegistry};
