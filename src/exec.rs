//! Subprocess execution: spawn the tool, feed stdin, drain stdout/stderr.
//!
//! ## Pipe-buffer deadlock
//!
//! The input stream, output stream, and diagnostic stream of the child are
//! driven as three concurrently-polled activities. This is a correctness
//! requirement, not an optimisation: writing the whole document before
//! reading anything deadlocks as soon as the child produces more output
//! than an OS pipe buffer holds (the child blocks writing, we block
//! writing input). The join point is process exit *plus* stream EOF —
//! both output pipes can still hold buffered data after the child exits.
//!
//! One invocation is exactly one subprocess execution; there is no retry
//! and no process reuse.

use crate::error::PandocError;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured streams and exit status of one finished subprocess.
#[derive(Debug)]
pub(crate) struct RawOutcome {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

/// Execute `executable` with `args`, supplying `input` on its stdin, and
/// capture everything it writes until it terminates.
///
/// Every element of `args` reaches the child as a discrete argument — no
/// shell ever sees the command, so values with spaces or metacharacters
/// need no quoting.
pub(crate) async fn run(
    executable: &str,
    args: &[String],
    input: &str,
) -> Result<RawOutcome, PandocError> {
    debug!(executable, ?args, input_bytes = input.len(), "spawning");

    let mut child = Command::new(executable)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| PandocError::Launch {
            executable: executable.to_string(),
            source,
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| PandocError::Internal("child stdin handle missing".into()))?;
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| PandocError::Internal("child stdout handle missing".into()))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| PandocError::Internal("child stderr handle missing".into()))?;

    let feed = async move {
        // The child may exit without reading all of its input (`--help`
        // does), so a broken pipe here is not an error.
        if let Err(err) = stdin.write_all(input.as_bytes()).await {
            debug!(%err, "child stopped reading before end of input");
        }
        // stdin drops here, closing the pipe: EOF for the child.
    };
    let drain_out = async move {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).await.map(|_| buf)
    };
    let drain_err = async move {
        let mut buf = Vec::new();
        stderr.read_to_end(&mut buf).await.map(|_| buf)
    };

    let ((), out, err, status) = tokio::join!(feed, drain_out, drain_err, child.wait());

    let status = status.map_err(|e| {
        PandocError::Internal(format!("failed waiting for {executable}: {e}"))
    })?;
    let out = out.map_err(|e| {
        PandocError::Internal(format!("failed capturing {executable} output: {e}"))
    })?;
    let err = err.map_err(|e| {
        PandocError::Internal(format!("failed capturing {executable} diagnostics: {e}"))
    })?;

    debug!(
        ?status,
        stdout_bytes = out.len(),
        stderr_bytes = err.len(),
        "child terminated"
    );

    Ok(RawOutcome {
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
        status,
    })
}

/// Interpret a finished subprocess into the caller-visible result.
///
/// Exit status is the sole success/failure discriminant. Diagnostic text on
/// a zero exit is a warning, not an error — pandoc routinely warns on
/// stderr while succeeding. When the caller configured an explicit output
/// destination the converted content went to that file, so the returned
/// text is empty on success.
pub(crate) fn classify(outcome: RawOutcome, writes_to_file: bool) -> Result<String, PandocError> {
    if outcome.status.success() {
        if !outcome.stderr.is_empty() {
            warn!(diagnostics = %outcome.stderr.trim_end(), "tool reported warnings");
        }
        if writes_to_file {
            Ok(String::new())
        } else {
            Ok(outcome.stdout)
        }
    } else {
        Err(PandocError::Conversion {
            status: outcome.status,
            stderr: outcome.stderr,
        })
    }
}
