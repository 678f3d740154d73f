//! Option discovery and tool introspection.
//!
//! pandoc's flag set changes across versions, so the permissible option
//! vocabulary is never hardcoded here. An [`OptionRegistry`] populates
//! itself by running the tool's own `--help` mode and scanning the text for
//! flag-like tokens; a hardcoded table would silently go stale the moment
//! the installed pandoc is upgraded.
//!
//! Once populated a registry is read-only, so one instance can be shared
//! across any number of concurrent conversions without synchronization.
//! [`OptionRegistry::shared`] is the process-wide instance for the `pandoc`
//! on PATH, built at most once per process.

use crate::error::PandocError;
use crate::exec;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Default executable name, resolved through PATH.
pub const PANDOC: &str = "pandoc";

/// Flag-like token in help output: two dashes, letters and internal dashes.
static FLAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--[a-zA-Z][a-zA-Z-]*").unwrap());

/// Dotted version tuple on the first line of `--version` output.
static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)+").unwrap());

/// Normalize an option name to its identifier form.
///
/// Accepts `--self-contained`, `self-contained`, or `self_contained` and
/// returns `self_contained`.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim_start_matches('-').replace('-', "_")
}

/// The set of option names the external tool accepts.
#[derive(Debug)]
pub struct OptionRegistry {
    options: HashSet<String>,
}

impl OptionRegistry {
    /// Discover the option vocabulary of `executable` by running its help
    /// mode and scanning the output.
    pub async fn discover(executable: &str) -> Result<Self, PandocError> {
        let outcome = exec::run(executable, &["--help".to_string()], "").await?;
        let registry = Self::from_help_text(&outcome.stdout);
        debug!(
            executable,
            options = registry.len(),
            "discovered option vocabulary"
        );
        Ok(registry)
    }

    /// Build a registry from help text alone.
    pub fn from_help_text(help: &str) -> Self {
        let options = FLAG_PATTERN
            .find_iter(help)
            .map(|m| normalize_name(m.as_str()))
            .collect();
        Self { options }
    }

    /// Build a registry from a fixed vocabulary, bypassing discovery.
    ///
    /// Intended for offline validation and tests; normal callers should let
    /// the registry populate itself from the live tool.
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let options = names
            .into_iter()
            .map(|n| normalize_name(n.as_ref()))
            .collect();
        Self { options }
    }

    /// Whether `name` (in any accepted form) is a registered option.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains(&normalize_name(name))
    }

    /// Confirm `name` is registered. `name` must already be normalized.
    pub(crate) fn validate(&self, name: &str) -> Result<(), PandocError> {
        if self.options.contains(name) {
            Ok(())
        } else {
            Err(PandocError::UnsupportedOption {
                option: name.to_string(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Process-wide registry for the `pandoc` on PATH, populated on first
    /// use and shared read-only thereafter.
    pub async fn shared() -> Result<Arc<Self>, PandocError> {
        static SHARED: OnceCell<Arc<OptionRegistry>> = OnceCell::const_new();
        SHARED
            .get_or_try_init(|| async { OptionRegistry::discover(PANDOC).await.map(Arc::new) })
            .await
            .map(Arc::clone)
    }
}

/// Read-only snapshot of the external tool's version and data directory.
///
/// Obtained by running the tool's `--version` mode: the version tuple comes
/// from the dotted number on the first line, the data directory from the
/// `… data directory:` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Version as an ordered tuple, e.g. `[3, 1, 12, 1]`.
    pub version: Vec<u32>,
    /// The tool's user data directory.
    pub data_dir: PathBuf,
}

impl ToolInfo {
    /// Run `executable --version` and parse the result.
    pub async fn probe(executable: &str) -> Result<Self, PandocError> {
        let outcome = exec::run(executable, &["--version".to_string()], "").await?;
        Self::parse(&outcome.stdout)
    }

    /// Cached snapshot for the `pandoc` on PATH, probed at most once per
    /// process and immutable thereafter.
    pub async fn shared() -> Result<Self, PandocError> {
        static SHARED: OnceCell<ToolInfo> = OnceCell::const_new();
        SHARED
            .get_or_try_init(|| async { ToolInfo::probe(PANDOC).await })
            .await
            .map(Clone::clone)
    }

    fn parse(text: &str) -> Result<Self, PandocError> {
        let first_line = text.lines().next().unwrap_or_default();
        let version_str = VERSION_PATTERN
            .find(first_line)
            .map(|m| m.as_str())
            .ok_or_else(|| PandocError::Introspection {
                detail: format!("no version number on first line {first_line:?}"),
            })?;
        let version = version_str
            .split('.')
            .map(|part| {
                part.parse::<u32>().map_err(|_| PandocError::Introspection {
                    detail: format!("non-numeric version component in {version_str:?}"),
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        // Both "User data directory:" (pandoc ≥ 2.7) and the older
        // "Default user data directory:" spellings appear in the wild.
        let data_dir = text
            .lines()
            .find_map(|line| line.split_once("data directory:"))
            .map(|(_, rest)| rest.trim())
            .filter(|dir| !dir.is_empty())
            .ok_or_else(|| PandocError::Introspection {
                detail: "no data directory line in --version output".into(),
            })?;

        Ok(Self {
            version,
            data_dir: PathBuf::from(data_dir),
        })
    }
}
