//! Error types for the pandoc-pipe library.
//!
//! Each variant maps to one phase of a conversion, so a caller can tell
//! *when* things went wrong from the variant alone:
//!
//! * [`PandocError::UnsupportedOption`] — configuration time, before any
//!   process is spawned.
//! * [`PandocError::InvalidValue`] — configuration time; the value has a
//!   shape that cannot be rendered as a command-line token.
//! * [`PandocError::Launch`] — process-start time; the executable is missing
//!   or not startable.
//! * [`PandocError::Conversion`] — run time; pandoc itself exited with a
//!   non-zero status (or was killed by a signal) and its stderr is carried
//!   verbatim so the caller can read pandoc's own diagnostics.
//!
//! Warnings that pandoc prints on stderr while still exiting 0 are *not*
//! errors and never surface through this type.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All errors returned by the pandoc-pipe library.
#[derive(Debug, Error)]
pub enum PandocError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The requested option is not in the discovered option vocabulary.
    #[error("pandoc does not support the option '--{}'\nRun `pandoc --help` to see what the installed pandoc accepts.", .option.replace('_', "-"))]
    UnsupportedOption { option: String },

    /// The option value has a shape that cannot be rendered as command-line
    /// tokens (a mapping, or a sequence with non-scalar elements).
    #[error("invalid value for option '--{}': {detail}", .option.replace('_', "-"))]
    InvalidValue { option: String, detail: String },

    // ── Process errors ────────────────────────────────────────────────────
    /// The pandoc executable could not be started.
    #[error("failed to launch '{executable}': {source}\nIs pandoc installed and on PATH?")]
    Launch {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// pandoc ran but terminated unsuccessfully. `stderr` is pandoc's own
    /// diagnostic output, unmodified.
    #[error("pandoc failed ({status}):\n{stderr}")]
    Conversion { status: ExitStatus, stderr: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A document file could not be read.
    #[error("failed to read document '{}': {source}", .path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Introspection errors ──────────────────────────────────────────────
    /// `pandoc --version` output did not match the expected shape.
    #[error("could not parse pandoc version output: {detail}")]
    Introspection { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_option_display_shows_flag_form() {
        let e = PandocError::UnsupportedOption {
            option: "self_contained".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("--self-contained"), "got: {msg}");
    }

    #[test]
    fn invalid_value_display_names_option_and_detail() {
        let e = PandocError::InvalidValue {
            option: "metadata".into(),
            detail: "mappings cannot be rendered".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("--metadata"));
        assert!(msg.contains("mappings cannot be rendered"));
    }

    #[cfg(unix)]
    #[test]
    fn conversion_display_carries_stderr_verbatim() {
        use std::os::unix::process::ExitStatusExt;
        let e = PandocError::Conversion {
            status: ExitStatus::from_raw(256), // exit code 1
            stderr: "Could not find data file missing.bib\n".into(),
        };
        assert!(e.to_string().contains("missing.bib"));
    }
}
