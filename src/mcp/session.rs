//! The read-eval-respond loop
//!
//! One line is read, decoded, dispatched and answered before the next line
//! is read. Output is written only here, and every response is flushed
//! before control returns to reading: the client waits on output and has no
//! other readiness signal.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use super::McpServer;
use super::protocol::{self, JsonRpcResponse};
use crate::ocr::ScreenReader;

/// Counters reported when the session ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub lines_read: usize,
    pub rejected_lines: usize,
    pub responses_written: usize,
}

/// Longest request line accepted, newline excluded
pub const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Serve requests from `input` until end-of-stream.
///
/// Undecodable lines are logged and skipped; they are never answered. Only
/// I/O errors on the streams themselves end the session early.
pub async fn run<R, I, O>(server: &McpServer<R>, input: I, output: &mut O) -> io::Result<SessionStats>
where
    R: ScreenReader,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    run_with_line_limit(server, input, output, MAX_LINE_BYTES).await
}

/// [`run`] with an explicit line length cap. Longer lines are discarded up
/// to their newline without being buffered.
pub async fn run_with_line_limit<R, I, O>(
    server: &McpServer<R>,
    mut input: I,
    output: &mut O,
    max_line_bytes: usize,
) -> io::Result<SessionStats>
where
    R: ScreenReader,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut stats = SessionStats::default();
    let mut buf = Vec::new();
    let limit = max_line_bytes as u64 + 1;

    loop {
        buf.clear();
        if (&mut input).take(limit).read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        stats.lines_read += 1;

        if buf.len() > max_line_bytes && buf.last() != Some(&b'\n') {
            warn!(limit = max_line_bytes, "Skipping request line over the size limit");
            stats.rejected_lines += 1;
            skip_rest_of_line(&mut input).await?;
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(['\n', '\r']),
            Err(e) => {
                warn!(error = %e, "Skipping line that is not valid UTF-8");
                stats.rejected_lines += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let request = match protocol::decode_request(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "JSON parse error: invalid request format");
                stats.rejected_lines += 1;
                continue;
            }
        };
        debug!(method = %request.method, id = ?request.id, "request");

        let Some(response) = server.handle_request(request).await else {
            continue;
        };
        if write_response(output, &response).await? {
            stats.responses_written += 1;
        }
    }

    Ok(stats)
}

/// Consume input up to and including the next newline (or end-of-stream)
async fn skip_rest_of_line<I>(input: &mut I) -> io::Result<()>
where
    I: AsyncBufRead + Unpin,
{
    let mut scratch = Vec::with_capacity(8 * 1024);
    loop {
        scratch.clear();
        let n = (&mut *input).take(8 * 1024).read_until(b'\n', &mut scratch).await?;
        if n == 0 || scratch.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

/// Serve on the process's stdin/stdout
pub async fn serve_stdio<R: ScreenReader>(server: &McpServer<R>) -> io::Result<SessionStats> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    info!("Waiting for MCP requests on stdin...");
    let stats = run(server, stdin, &mut stdout).await?;
    info!(
        lines = stats.lines_read,
        rejected = stats.rejected_lines,
        responses = stats.responses_written,
        "stdin closed, session finished"
    );
    Ok(stats)
}

/// Write one response line and flush. Returns `false` if the response could
/// not be encoded, in which case nothing is written.
async fn write_response<O>(output: &mut O, response: &JsonRpcResponse) -> io::Result<bool>
where
    O: AsyncWrite + Unpin,
{
    let line = match protocol::encode_response(response) {
        Ok(line) => line,
        Err(e) => {
            error!(error = %e, "Dropping response that could not be encoded");
            return Ok(false);
        }
    };

    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(true)
}
