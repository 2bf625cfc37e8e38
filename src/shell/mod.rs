//! Interactive session shell
//!
//! A line-oriented UI over [`SessionClient`]. The shell loop is the client's
//! control loop: it is the only place commands are issued and operation
//! results are applied.

pub mod commands;
pub mod handlers;

use log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::session::SessionClient;
pub use commands::{Command, parse_command};
pub use handlers::{CommandResult, CommandStatus, handle_command};

const MAX_LINE_LENGTH: usize = 512;

/// Runs the shell until QUIT or end of input.
///
/// Input lines are read on a separate task and forwarded over a channel so the
/// loop never blocks on the reader while operations complete.
pub async fn run<R, W>(mut client: SessionClient, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let (line_tx, mut lines) = mpsc::channel::<String>(16);
    let reader = tokio::spawn(read_lines(input, line_tx));

    let mut states = client.state_stream();
    let mut login_failures = client.login_failures();
    let mut sign_up_failures = client.sign_up_failures();

    write_line(&mut output, commands::USAGE).await?;

    loop {
        // State lines come before the failure they led to, and both before
        // the next result or command.
        tokio::select! {
            biased;

            Some(state) = states.recv() => {
                write_line(&mut output, &handlers::render_state(&state)).await?;
            }
            Some(event) = login_failures.recv() => {
                write_line(&mut output, &handlers::render_login_failure(&event)).await?;
            }
            Some(event) = sign_up_failures.recv() => {
                write_line(&mut output, &handlers::render_sign_up_failure(&event)).await?;
            }
            () = client.process_next() => {}
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("Input closed");
                    break;
                };
                if line.len() > MAX_LINE_LENGTH {
                    write_line(&mut output, "Command too long").await?;
                    continue;
                }

                let result = handle_command(&mut client, parse_command(&line));
                if let Some(message) = result.message {
                    write_line(&mut output, &message).await?;
                }
                if result.status == CommandStatus::Quit {
                    break;
                }
            }
        }
    }

    reader.abort();
    output.flush().await
}

async fn read_lines<R>(input: R, lines: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
                if lines.send(trimmed).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
