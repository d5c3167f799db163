use crate::core_ftpcommand::ftpcommand::FtpCommand;
use std::collections::HashMap;

/// Verb to command mapping, built once at startup and shared read-only by every session.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, FtpCommand>,
}

impl CommandRegistry {
    /// Case-insensitive verb lookup.
    pub fn lookup(&self, verb: &str) -> Option<FtpCommand> {
        self.commands.get(verb.to_ascii_uppercase().as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

pub fn initialize_command_handlers() -> CommandRegistry {
    let mut commands: HashMap<&'static str, FtpCommand> = HashMap::new();

    // Access control
    commands.insert("USER", FtpCommand::USER);
    commands.insert("PASS", FtpCommand::PASS);
    commands.insert("QUIT", FtpCommand::QUIT);
    commands.insert("AUTH", FtpCommand::AUTH);
    commands.insert("PBSZ", FtpCommand::PBSZ);
    commands.insert("PROT", FtpCommand::PROT);

    // Navigation and file management
    commands.insert("CWD", FtpCommand::CWD);
    commands.insert("XCWD", FtpCommand::CWD);
    commands.insert("CDUP", FtpCommand::CDUP);
    commands.insert("XCUP", FtpCommand::CDUP);
    commands.insert("PWD", FtpCommand::PWD);
    commands.insert("XPWD", FtpCommand::PWD);
    commands.insert("MKD", FtpCommand::MKD);
    commands.insert("XMKD", FtpCommand::MKD);
    commands.insert("RMD", FtpCommand::RMD);
    commands.insert("XRMD", FtpCommand::RMD);
    commands.insert("DELE", FtpCommand::DELE);
    commands.insert("RNFR", FtpCommand::RNFR);
    commands.insert("RNTO", FtpCommand::RNTO);
    commands.insert("SIZE", FtpCommand::SIZE);
    commands.insert("MDTM", FtpCommand::MDTM);

    // Transfers
    commands.insert("LIST", FtpCommand::LIST);
    commands.insert("NLST", FtpCommand::NLST);
    commands.insert("RETR", FtpCommand::RETR);
    commands.insert("STOR", FtpCommand::STOR);
    commands.insert("APPE", FtpCommand::APPE);
    commands.insert("REST", FtpCommand::REST);
    commands.insert("PASV", FtpCommand::PASV);
    commands.insert("EPSV", FtpCommand::EPSV);
    commands.insert("PORT", FtpCommand::PORT);
    commands.insert("EPRT", FtpCommand::EPRT);

    // Transfer parameters and service commands
    commands.insert("TYPE", FtpCommand::TYPE);
    commands.insert("MODE", FtpCommand::MODE);
    commands.insert("STRU", FtpCommand::STRU);
    commands.insert("ALLO", FtpCommand::ALLO);
    commands.insert("SYST", FtpCommand::SYST);
    commands.insert("NOOP", FtpCommand::NOOP);

    CommandRegistry { commands }
}
