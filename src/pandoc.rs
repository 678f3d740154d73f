//! Fluent conversion front end.
//!
//! [`Pandoc`] is the caller-facing surface: name options one by one, then
//! hand over a document and get the converted text back. Typed accessors
//! exist for the options almost every conversion touches; everything else
//! the installed pandoc supports goes through the generic [`Pandoc::set`],
//! validated against the discovered vocabulary at configuration time so an
//! unknown name fails before any process is spawned.
//!
//! One `Pandoc` owns one configuration. The configuration is immutable for
//! the lifetime of a `convert` call, and independent instances may convert
//! in parallel — they share nothing but the read-only option registry.

use crate::command::{CommandBuilder, OptionValue};
use crate::error::PandocError;
use crate::exec;
use crate::options::{OptionRegistry, ToolInfo, PANDOC};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

macro_rules! flag_option {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> Result<&mut Self, PandocError> {
            self.set(stringify!($name), OptionValue::Flag)
        }
    };
}

macro_rules! scalar_option {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: impl Into<String>) -> Result<&mut Self, PandocError> {
            self.set(stringify!($name), value.into())
        }
    };
}

/// A configurable pandoc conversion.
///
/// # Example
/// ```rust,no_run
/// use pandoc_pipe::Pandoc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), pandoc_pipe::PandocError> {
///     let mut converter = Pandoc::new().await?;
///     converter.from("markdown")?.to("html")?;
///     let html = converter.convert("Hello *world*").await?;
///     assert_eq!(html, "<p>Hello <em>world</em></p>\n");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Pandoc {
    executable: String,
    builder: CommandBuilder,
}

impl Pandoc {
    /// Create a converter bound to the `pandoc` on PATH.
    ///
    /// The first call in a process runs `pandoc --help` once to discover
    /// the option vocabulary; later calls reuse the shared registry.
    pub async fn new() -> Result<Self, PandocError> {
        let registry = OptionRegistry::shared().await?;
        Ok(Self {
            executable: PANDOC.to_string(),
            builder: CommandBuilder::new(registry),
        })
    }

    /// Create a converter bound to a specific executable.
    ///
    /// Discovers that executable's own option vocabulary, so a vendored or
    /// differently-versioned pandoc validates against what it actually
    /// accepts.
    pub async fn with_executable(executable: impl Into<String>) -> Result<Self, PandocError> {
        let executable = executable.into();
        let registry = Arc::new(OptionRegistry::discover(&executable).await?);
        Ok(Self {
            executable,
            builder: CommandBuilder::new(registry),
        })
    }

    /// Set any option the installed pandoc supports.
    ///
    /// `name` is accepted as `--some-option`, `some-option`, or
    /// `some_option`. Fails with [`PandocError::UnsupportedOption`] at
    /// configuration time when the name is not in the vocabulary, and with
    /// [`PandocError::InvalidValue`] when the value shape cannot be
    /// rendered.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<&mut Self, PandocError> {
        self.builder.add(name, value)?;
        Ok(self)
    }

    scalar_option! {
        /// Input format (`--from`).
        from
    }
    scalar_option! {
        /// Output format (`--to`).
        to
    }
    scalar_option! {
        /// Write the result to this file instead of returning it (`--output`).
        ///
        /// With an output destination configured, a successful
        /// [`convert`](Self::convert) returns empty text.
        output
    }
    scalar_option! {
        /// JSON filter executable to run (`--filter`); call repeatedly to
        /// chain filters in order.
        filter
    }
    scalar_option! {
        /// Lua filter script to run (`--lua-filter`).
        lua_filter
    }
    scalar_option! {
        /// Bibliography file for citation processing (`--bibliography`).
        bibliography
    }
    scalar_option! {
        /// Citation style file (`--csl`).
        csl
    }
    scalar_option! {
        /// Metadata entry as `KEY[:VALUE]` (`--metadata`); call repeatedly
        /// for multiple entries.
        metadata
    }
    scalar_option! {
        /// Template variable as `KEY[:VALUE]` (`--variable`).
        variable
    }
    scalar_option! {
        /// Custom template file (`--template`).
        template
    }
    scalar_option! {
        /// Override the user data directory (`--data-dir`).
        data_dir
    }

    flag_option! {
        /// Produce a standalone document (`--standalone`).
        standalone
    }
    flag_option! {
        /// Process citations (`--citeproc`).
        citeproc
    }
    flag_option! {
        /// Include a table of contents (`--toc`).
        toc
    }
    flag_option! {
        /// Number section headings (`--number-sections`).
        number_sections
    }
    flag_option! {
        /// Ask pandoc for its usage text (`--help`).
        help
    }

    /// Whether an explicit output destination has been configured.
    pub fn writes_to_file(&self) -> bool {
        self.builder.writes_to_file()
    }

    /// The argument vector this configuration renders to.
    pub fn args(&self) -> Vec<String> {
        self.builder.render()
    }

    /// Convert a document supplied inline.
    ///
    /// Spawns one pandoc process, streams `document` to its stdin, and
    /// blocks until the process has exited and both output streams are
    /// drained. On success returns the converted text — empty when an
    /// explicit output destination was configured, because pandoc wrote
    /// the content there itself.
    pub async fn convert(&self, document: &str) -> Result<String, PandocError> {
        let argv = self.builder.render();
        info!(executable = %self.executable, args = ?argv, "converting document");
        let outcome = exec::run(&self.executable, &argv, document).await?;
        exec::classify(outcome, self.builder.writes_to_file())
    }

    /// Convert a document read from `path`.
    pub async fn convert_file(&self, path: impl AsRef<Path>) -> Result<String, PandocError> {
        let path = path.as_ref();
        let document =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| PandocError::DocumentRead {
                    path: path.to_path_buf(),
                    source,
                })?;
        self.convert(&document).await
    }

    /// Version and data directory of the `pandoc` on PATH.
    ///
    /// Probed by running `pandoc --version` once per process and cached;
    /// independent of any configuration.
    pub async fn info() -> Result<ToolInfo, PandocError> {
        ToolInfo::shared().await
    }
}
