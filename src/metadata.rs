//! Metadata extraction: pull YAML header blocks out of a document.
//!
//! Pandoc-flavoured markdown can carry any number of metadata blocks,
//! each delimited by a `---` line and closed by `---` or `...`. This
//! module collects every block and splices them into a single YAML
//! document, which is how `do-pandoc` reads a conversion configuration
//! out of the document it is about to convert.
//!
//! The core never interprets this data; it is just the configuration blob
//! consumed by the CLI glue.

use crate::error::PandocError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// A YAML metadata block: `---` line through the next `---` or `...` line.
static METADATA_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^---[ \t\r]*$(.*?)^(?:---|\.\.\.)[ \t\r]*$").unwrap());

/// Collect every YAML metadata block in `document` into one YAML document.
///
/// Blocks are concatenated in order of appearance. With no metadata
/// present the result is an empty YAML document (`---\n\n...`).
pub fn extract_metadata(document: &str) -> String {
    let blocks: Vec<&str> = METADATA_BLOCK
        .captures_iter(document)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .collect();
    format!("---\n{}\n...", blocks.join("\n"))
}

/// Read `path` and extract its metadata blocks.
pub async fn extract_metadata_file(path: impl AsRef<Path>) -> Result<String, PandocError> {
    let path = path.as_ref();
    let document =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PandocError::DocumentRead {
                path: path.to_path_buf(),
                source,
            })?;
    Ok(extract_metadata(&document))
}
