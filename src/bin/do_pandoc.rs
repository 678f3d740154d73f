//! CLI binary for pandoc-pipe.
//!
//! A thin shim over the library crate: reads the conversion configuration
//! out of the input document's own YAML metadata and runs pandoc with it.

use anyhow::{bail, Context, Result};
use clap::Parser;
use pandoc_pipe::{metadata, OptionValue, Pandoc};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert report.md with the options in its own `pandoc:` metadata block
  do-pandoc report.md

  # The document decides where output goes; nothing is printed when it
  # names an output file
  do-pandoc thesis.md

  # Use a vendored pandoc build
  do-pandoc --executable ./bin/pandoc report.md

METADATA FORMAT:
  The input document declares its own conversion in a YAML header:

    ---
    title: Quarterly report
    pandoc:
      from: markdown
      to: html
      standalone: true
      filter:
        - filters/number-figures.lua
      output: report.html
    ---

  Option names are the installed pandoc's own long options (dashes or
  underscores both work). `true` sets a bare flag, `false` and `null`
  drop the option, and a sequence repeats the flag once per element,
  in order.
"#;

/// Run pandoc on a document using the configuration stored in the document itself.
#[derive(Parser, Debug)]
#[command(
    name = "do-pandoc",
    version,
    about = "Run pandoc on a document using the configuration stored in the document itself",
    long_about = "Reads the YAML metadata of the input document, takes the options under its \
`pandoc:` key, and runs pandoc on the document with exactly those options. The converted \
text goes to stdout unless the metadata names an `output:` file.",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to convert; its YAML metadata must contain a `pandoc:` mapping.
    input: PathBuf,

    /// Pandoc executable to invoke.
    #[arg(long, env = "DO_PANDOC_EXECUTABLE", default_value = "pandoc")]
    executable: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DO_PANDOC_VERBOSE")]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long, env = "DO_PANDOC_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load the document and its embedded configuration ─────────────────
    let document = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("cannot read {}", cli.input.display()))?;

    let yaml = metadata::extract_metadata(&document);
    let meta: serde_json::Value =
        serde_yaml::from_str(&yaml).context("document metadata is not valid YAML")?;

    let Some(options) = meta.get("pandoc") else {
        bail!(
            "unsure what to do: no `pandoc:` mapping in the metadata of {}",
            cli.input.display()
        );
    };
    let Some(options) = options.as_object() else {
        bail!("the `pandoc:` metadata entry must be a mapping of option names to values");
    };

    // ── Configure and run the conversion ─────────────────────────────────
    let mut converter = Pandoc::with_executable(&cli.executable)
        .await
        .context("failed to query pandoc for its supported options")?;

    for (name, value) in options {
        let value = OptionValue::from_json(name, value)?;
        converter.set(name, value)?;
    }

    let output = converter
        .convert(&document)
        .await
        .context("conversion failed")?;

    // With an `output:` destination pandoc wrote the file itself and
    // `output` is empty; printing would only add a stray newline.
    if !converter.writes_to_file() {
        io::stdout()
            .write_all(output.as_bytes())
            .context("failed to write to stdout")?;
    }

    Ok(())
}
