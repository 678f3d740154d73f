//! # pandoc-pipe
//!
//! Programmatic front end to [pandoc](https://pandoc.org): build a
//! conversion by naming options, hand over a document, and get the
//! converted text back — without knowing pandoc's command-line grammar.
//!
//! ## Pipeline Overview
//!
//! ```text
//! options ──▶ registry ──▶ argv ──▶ subprocess ──▶ outcome
//! (name,value) (validate)  (render)  (feed stdin,    (stdout text
//!                                     drain pipes)    or error)
//! ```
//!
//! 1. Each `(name, value)` pair is validated against the option vocabulary
//!    discovered from the installed pandoc's own `--help` output, so an
//!    unknown option fails at configuration time, before any process runs.
//! 2. The entries render into an argument vector in exactly the order they
//!    were requested — pandoc's behaviour depends on flag order.
//! 3. One subprocess per conversion: the document is streamed to stdin
//!    while stdout and stderr drain concurrently, so output larger than a
//!    pipe buffer cannot deadlock the pair of processes.
//! 4. Exit status decides the outcome. Zero yields the captured output
//!    (or empty text when the conversion wrote to a configured output
//!    file); anything else yields [`PandocError::Conversion`] carrying
//!    pandoc's stderr verbatim.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pandoc_pipe::Pandoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pandoc_pipe::PandocError> {
//!     let mut converter = Pandoc::new().await?;
//!     converter
//!         .from("markdown")?
//!         .to("html")?
//!         .standalone()?
//!         .metadata("lang=en")?;
//!     let html = converter.convert("Hello *world*").await?;
//!     println!("{html}");
//!     Ok(())
//! }
//! ```
//!
//! Options with no typed accessor go through [`Pandoc::set`], which accepts
//! anything the installed pandoc's `--help` lists:
//!
//! ```rust,no_run
//! # use pandoc_pipe::Pandoc;
//! # #[tokio::main]
//! # async fn main() -> Result<(), pandoc_pipe::PandocError> {
//! let mut converter = Pandoc::new().await?;
//! converter.set("shift-heading-level-by", "1")?;
//! converter.set("filter", vec!["behead.lua", "caps.lua"])?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `do-pandoc` binary (clap + anyhow + serde_yaml + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pandoc-pipe = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod command;
pub mod error;
pub mod metadata;
pub mod options;
pub mod pandoc;

mod exec;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use command::{CommandBuilder, OptionEntry, OptionValue};
pub use error::PandocError;
pub use options::{OptionRegistry, ToolInfo, PANDOC};
pub use pandoc::Pandoc;
