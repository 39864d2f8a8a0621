//! External command delivery.
//!
//! Runs an operator-supplied command with stdout and stderr sharing one
//! pipe, optionally feeding a payload on stdin. Writing stdin and draining
//! output are multiplexed on the calling task, so a chatty child cannot
//! deadlock against a large payload. Unix only.

use std::io::ErrorKind;
use std::os::fd::OwnedFd;
use std::process::Stdio;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::pipe;
use tokio::process::{Child, ChildStdin, Command};

use crate::traits::{CapturedOutput, NotifyError};

/// Spawn `argv` with stdout and stderr on one pipe and stdin piped.
fn spawn_merged(argv: &[String]) -> Result<(Child, pipe::Receiver), NotifyError> {
    let (program, args) = argv.split_first().ok_or_else(|| {
        NotifyError::Launch(std::io::Error::new(ErrorKind::InvalidInput, "empty command"))
    })?;

    let (reader, writer) = std::io::pipe().map_err(NotifyError::Launch)?;
    let stderr_writer = writer.try_clone().map_err(NotifyError::Launch)?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(writer)
        .stderr(stderr_writer)
        .kill_on_drop(true);
    let child = command.spawn().map_err(NotifyError::Launch)?;
    // Command still owns both write ends; EOF only arrives once they are gone.
    drop(command);

    let output =
        pipe::Receiver::from_owned_fd(OwnedFd::from(reader)).map_err(NotifyError::Pipe)?;
    Ok((child, output))
}

/// Write the payload, if any, then close stdin by dropping it.
async fn feed_stdin(stdin: Option<ChildStdin>, payload: Option<&[u8]>) -> std::io::Result<()> {
    let (Some(mut stdin), Some(bytes)) = (stdin, payload) else {
        return Ok(());
    };
    match stdin.write_all(bytes).await {
        // The child exited or closed its input without reading everything.
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Run `argv` to completion and return its merged output.
///
/// With `payload`, the bytes are written to stdin and stdin is closed;
/// without it, stdin is closed before anything is written. A child that
/// exits without reading its input is not an error. The exit status is
/// returned, never checked. There is no timeout.
pub async fn run_command(
    argv: &[String],
    payload: Option<&[u8]>,
) -> Result<CapturedOutput, NotifyError> {
    let (mut child, mut output) = spawn_merged(argv)?;

    let feed = feed_stdin(child.stdin.take(), payload);

    let mut captured = Vec::new();
    let (fed, drained) = tokio::join!(feed, output.read_to_end(&mut captured));
    fed.map_err(NotifyError::Pipe)?;
    drained.map_err(NotifyError::Pipe)?;

    let status = child.wait().await.map_err(NotifyError::Pipe)?;
    tracing::debug!(exit_code = ?status.code(), bytes = captured.len(), "command exited");

    let text = String::from_utf8(captured)?;
    Ok(CapturedOutput { text, status })
}
