use crate::core_ftpcommand::{
    allo, auth, cdup, cwd, dele, list, mdtm, mkd, mode, noop, pass, pwd, quit, rest, retr, rmd,
    rnfr, rnto, size, stor, stru, syst, type_, user,
};
use crate::core_network::{pasv, port};
use crate::session::Session;
use std::io;

/// One variant per supported verb. Aliases such as `XCWD` map onto the same variant.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    SYST,
    NOOP,
    TYPE,
    MODE,
    STRU,
    ALLO,
    AUTH,
    PBSZ,
    PROT,
    CWD,
    CDUP,
    PWD,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    SIZE,
    MDTM,
    LIST,
    NLST,
    RETR,
    STOR,
    APPE,
    REST,
    PASV,
    EPSV,
    PORT,
    EPRT,
}

impl FtpCommand {
    pub fn requires_param(self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::MODE
                | FtpCommand::STRU
                | FtpCommand::AUTH
                | FtpCommand::PBSZ
                | FtpCommand::PROT
                | FtpCommand::CWD
                | FtpCommand::MKD
                | FtpCommand::RMD
                | FtpCommand::DELE
                | FtpCommand::RNFR
                | FtpCommand::RNTO
                | FtpCommand::SIZE
                | FtpCommand::MDTM
                | FtpCommand::RETR
                | FtpCommand::STOR
                | FtpCommand::APPE
                | FtpCommand::REST
                | FtpCommand::PORT
                | FtpCommand::EPRT
        )
    }

    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::QUIT
                | FtpCommand::SYST
                | FtpCommand::NOOP
                | FtpCommand::TYPE
                | FtpCommand::MODE
                | FtpCommand::STRU
                | FtpCommand::ALLO
                | FtpCommand::AUTH
                | FtpCommand::PBSZ
                | FtpCommand::PROT
        )
    }

    /// Runs the handler. `Err` means the control connection is unusable.
    pub async fn execute(self, session: &mut Session, arg: &str) -> io::Result<()> {
        match self {
            FtpCommand::USER => user::handle_user_command(session, arg).await,
            FtpCommand::PASS => pass::handle_pass_command(session, arg).await,
            FtpCommand::QUIT => quit::handle_quit_command(session, arg).await,
            FtpCommand::SYST => syst::handle_syst_command(session, arg).await,
            FtpCommand::NOOP => noop::handle_noop_command(session, arg).await,
            FtpCommand::TYPE => type_::handle_type_command(session, arg).await,
            FtpCommand::MODE => mode::handle_mode_command(session, arg).await,
            FtpCommand::STRU => stru::handle_stru_command(session, arg).await,
            FtpCommand::ALLO => allo::handle_allo_command(session, arg).await,
            FtpCommand::AUTH => auth::handle_auth_command(session, arg).await,
            FtpCommand::PBSZ => auth::handle_pbsz_command(session, arg).await,
            FtpCommand::PROT => auth::handle_prot_command(session, arg).await,
            FtpCommand::CWD => cwd::handle_cwd_command(session, arg).await,
            FtpCommand::CDUP => cdup::handle_cdup_command(session, arg).await,
            FtpCommand::PWD => pwd::handle_pwd_command(session, arg).await,
            FtpCommand::MKD => mkd::handle_mkd_command(session, arg).await,
            FtpCommand::RMD => rmd::handle_rmd_command(session, arg).await,
            FtpCommand::DELE => dele::handle_dele_command(session, arg).await,
            FtpCommand::RNFR => rnfr::handle_rnfr_command(session, arg).await,
            FtpCommand::RNTO => rnto::handle_rnto_command(session, arg).await,
            FtpCommand::SIZE => size::handle_size_command(session, arg).await,
            FtpCommand::MDTM => mdtm::handle_mdtm_command(session, arg).await,
            FtpCommand::LIST => list::handle_list_command(session, arg).await,
            FtpCommand::NLST => list::handle_nlst_command(session, arg).await,
            FtpCommand::RETR => retr::handle_retr_command(session, arg).await,
            FtpCommand::STOR => stor::handle_stor_command(session, arg).await,
            FtpCommand::APPE => stor::handle_appe_command(session, arg).await,
            FtpCommand::REST => rest::handle_rest_command(session, arg).await,
            FtpCommand::PASV => pasv::handle_pasv_command(session, arg).await,
            FtpCommand::EPSV => pasv::handle_epsv_command(session, arg).await,
            FtpCommand::PORT => port::handle_port_command(session, arg).await,
            FtpCommand::EPRT => port::handle_eprt_command(session, arg).await,
        }
    }
}
