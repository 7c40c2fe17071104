// src/exec/capture.rs

//! Pipe draining with optional pass-through to the console.
//!
//! Each child pipe is drained on its own Tokio task into its own buffer.
//! When forwarding is on, every chunk is written (and flushed) to the
//! forward target before it is appended to the buffer, so a person watching
//! the terminal sees output as it happens.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{ChildStderr, ChildStdout};

const CHUNK_SIZE: usize = 8 * 1024;

/// Copy `reader` to end-of-stream, teeing into `forward` when present.
///
/// Memory grows with the total output size; nothing is windowed.
pub async fn drain<R, W>(mut reader: R, mut forward: Option<W>) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if let Some(target) = forward.as_mut() {
            target.write_all(&chunk[..n]).await?;
            target.flush().await?;
        }
        captured.extend_from_slice(&chunk[..n]);
    }

    Ok(captured)
}

/// Drain two streams concurrently and join them.
///
/// Returns the stdout bytes followed by the stderr bytes. When both drains
/// fail, the stdout error is the one reported.
pub async fn drain_pair<RO, RE, WO, WE>(
    stdout: RO,
    stderr: RE,
    stdout_forward: Option<WO>,
    stderr_forward: Option<WE>,
) -> io::Result<Vec<u8>>
where
    RO: AsyncRead + Unpin + Send + 'static,
    RE: AsyncRead + Unpin + Send + 'static,
    WO: AsyncWrite + Unpin + Send + 'static,
    WE: AsyncWrite + Unpin + Send + 'static,
{
    let out_task = tokio::spawn(drain(stdout, stdout_forward));
    let err_task = tokio::spawn(drain(stderr, stderr_forward));

    let (out_res, err_res) = tokio::join!(out_task, err_task);
    let out = flatten_join(out_res);
    let err = flatten_join(err_res);

    let mut captured = out?;
    captured.extend_from_slice(&err?);
    Ok(captured)
}

/// Drain a child's stdout/stderr, forwarding to this process's own
/// stdout/stderr when `forward` is set.
pub async fn drain_child_pipes(
    stdout: ChildStdout,
    stderr: ChildStderr,
    forward: bool,
) -> io::Result<Vec<u8>> {
    if forward {
        drain_pair(
            stdout,
            stderr,
            Some(tokio::io::stdout()),
            Some(tokio::io::stderr()),
        )
        .await
    } else {
        drain_pair(
            stdout,
            stderr,
            None::<tokio::io::Stdout>,
            None::<tokio::io::Stderr>,
        )
        .await
    }
}

fn flatten_join(res: Result<io::Result<Vec<u8>>, tokio::task::JoinError>) -> io::Result<Vec<u8>> {
    match res {
        Ok(inner) => inner,
        Err(join_err) => Err(io::Error::other(join_err)),
    }
}
