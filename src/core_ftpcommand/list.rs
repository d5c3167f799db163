use crate::list_formatter::ListFormatter;
use crate::session::Session;
use std::io;

/// Strips leading `ls` style flags such as `-la` so only the path remains.
pub fn parse_list_param(param: &str) -> &str {
    if !param.starts_with('-') {
        return param;
    }
    match param.split_once(' ') {
        Some((_, rest)) => rest.trim_start(),
        None => "",
    }
}

pub async fn handle_list_command(session: &mut Session, arg: &str) -> io::Result<()> {
    send_listing(session, arg, true).await
}

pub async fn handle_nlst_command(session: &mut Session, arg: &str) -> io::Result<()> {
    send_listing(session, arg, false).await
}

async fn send_listing(session: &mut Session, arg: &str, detailed: bool) -> io::Result<()> {
    if !session.has_data_socket() {
        return session.write_message(425, "Data connection failed").await;
    }

    let path = session.build_path(parse_list_param(arg));
    let files = match session.driver().dir_contents(&path).await {
        Ok(files) => files,
        Err(e) => {
            session.logger().print(format!("Listing {} failed: {}", path, e));
            session.close_data_socket().await;
            let (code, message) = e.to_ftp_response();
            return session.write_message(code, message).await;
        }
    };

    let formatter = ListFormatter::new(files);
    let listing = if detailed {
        formatter.detailed()
    } else {
        formatter.short()
    };

    session
        .write_message(150, "Opening ASCII mode data connection for file list")
        .await?;
    if let Err(e) = session.send_outofband_data(listing.as_bytes()).await? {
        session.logger().print(format!("Listing transfer failed: {}", e));
        let (code, message) = e.to_ftp_response();
        session.write_message(code, message).await?;
    }
    Ok(())
}
