use crate::session::Session;
use std::io::{self, SeekFrom};
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

/// Handles the STOR (Store) FTP command.
pub async fn handle_stor_command(session: &mut Session, arg: &str) -> io::Result<()> {
    store(session, arg).await
}

/// APPE is STOR with the driver told to append.
pub async fn handle_appe_command(session: &mut Session, arg: &str) -> io::Result<()> {
    session.append_data = true;
    store(session, arg).await
}

/// Receives the upload into an anonymous spool file, then hands it to the driver.
async fn store(session: &mut Session, arg: &str) -> io::Result<()> {
    let target = session.build_path(arg);
    let append = std::mem::take(&mut session.append_data);
    session.last_file_pos = 0;

    if !session.has_data_socket() {
        return session.write_message(425, "Data connection failed").await;
    }

    let mut spool = match open_spool_file().await {
        Ok(file) => file,
        Err(e) => {
            session
                .logger()
                .print(format!("Cannot create spool file: {}", e));
            session.close_data_socket().await;
            return session.write_message(450, "error during transfer").await;
        }
    };

    session.write_message(150, "Data transfer starting").await?;

    let received = match session.receive_outofband_stream(&mut spool).await {
        Ok(received) => received,
        Err(e) => {
            session
                .logger()
                .print(format!("STOR {} aborted: {}", target, e));
            return session.write_message(450, "error during transfer").await;
        }
    };
    session
        .logger()
        .print(format!("Received {} bytes for {}", received, target));

    if let Err(e) = spool.seek(SeekFrom::Start(0)).await {
        session.logger().print(format!("Spool rewind failed: {}", e));
        return session.write_message(450, "error during transfer").await;
    }

    match session
        .driver()
        .put_file(&target, Box::new(spool), append)
        .await
    {
        Ok(written) => {
            session
                .write_message(226, &format!("Closing data connection, sent {} bytes", written))
                .await
        }
        Err(e) => {
            session.logger().print(format!("STOR {} failed: {}", target, e));
            session.write_message(550, "Action not taken").await
        }
    }
}

async fn open_spool_file() -> io::Result<File> {
    let file = tokio::task::spawn_blocking(tempfile::tempfile).await??;
    Ok(File::from_std(file))
}
