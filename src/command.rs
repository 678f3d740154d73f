//! Command construction: ordered option entries and argv rendering.
//!
//! A [`CommandBuilder`] accumulates `(name, value)` pairs in the exact order
//! they were requested and renders them into an argument vector following
//! pandoc's flag grammar. Order is significant — pandoc applies filters and
//! metadata in the order they appear on the command line — so the builder
//! never reorders or deduplicates entries.
//!
//! Every token in the rendered vector is handed to the child process as a
//! discrete argument. No shell is involved, so paths with spaces need no
//! quoting at this layer.

use crate::error::PandocError;
use crate::options::{normalize_name, OptionRegistry};
use serde_json::Value;
use std::sync::Arc;

/// The value attached to one requested option.
///
/// The shapes mirror what pandoc's grammar can express: a bare flag, a
/// single scalar, or the same flag repeated once per element. [`Nil`] and
/// `Bool(false)` entries are dropped at render time, which lets callers pass
/// optional values through without branching.
///
/// [`Nil`]: OptionValue::Nil
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Bare flag with no value (`--standalone`).
    Flag,
    /// `true` renders as a bare flag; `false` drops the entry entirely.
    Bool(bool),
    /// Scalar string, rendered as `--flag` followed by the value token.
    Str(String),
    /// Scalar number, stringified verbatim.
    Number(serde_json::Number),
    /// Ordered sequence: one `--flag value` pair per element, in order.
    Repeated(Vec<String>),
    /// Explicit no-op; the entry produces no tokens.
    Nil,
}

impl OptionValue {
    /// Convert a dynamically-typed value into an [`OptionValue`].
    ///
    /// This is the bridge from configuration blobs (YAML metadata, JSON) to
    /// the typed shapes the builder can render. Mappings and sequences with
    /// non-scalar elements have no command-line representation and fail with
    /// [`PandocError::InvalidValue`] naming `option`.
    pub fn from_json(option: &str, value: &Value) -> Result<Self, PandocError> {
        match value {
            Value::Null => Ok(OptionValue::Nil),
            Value::Bool(b) => Ok(OptionValue::Bool(*b)),
            Value::Number(n) => Ok(OptionValue::Number(n.clone())),
            Value::String(s) => Ok(OptionValue::Str(s.clone())),
            Value::Array(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => elements.push(s.clone()),
                        Value::Number(n) => elements.push(n.to_string()),
                        Value::Bool(b) => elements.push(b.to_string()),
                        other => {
                            return Err(PandocError::InvalidValue {
                                option: normalize_name(option),
                                detail: format!("sequence element {other} is not a scalar"),
                            })
                        }
                    }
                }
                Ok(OptionValue::Repeated(elements))
            }
            Value::Object(_) => Err(PandocError::InvalidValue {
                option: normalize_name(option),
                detail: "mappings cannot be rendered as a command-line value".into(),
            }),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Number(serde_json::Number::from(v))
    }
}

impl From<u64> for OptionValue {
    fn from(v: u64) -> Self {
        OptionValue::Number(serde_json::Number::from(v))
    }
}

impl From<()> for OptionValue {
    fn from(_: ()) -> Self {
        OptionValue::Flag
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::Repeated(v)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(v: Vec<&str>) -> Self {
        OptionValue::Repeated(v.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => OptionValue::Nil,
        }
    }
}

/// One requested option: a normalized identifier plus its value.
#[derive(Debug, Clone)]
pub struct OptionEntry {
    /// Normalized identifier (`self_contained` for `--self-contained`).
    pub name: String,
    pub value: OptionValue,
}

/// Accumulates option entries for one conversion and renders the argv.
///
/// A builder is exclusively owned by one conversion request. Entries can
/// only be appended; there is no removal once configuration has started.
#[derive(Debug)]
pub struct CommandBuilder {
    registry: Arc<OptionRegistry>,
    entries: Vec<OptionEntry>,
    writes_to_file: bool,
}

impl CommandBuilder {
    pub fn new(registry: Arc<OptionRegistry>) -> Self {
        Self {
            registry,
            entries: Vec::new(),
            writes_to_file: false,
        }
    }

    /// Append an option entry, validating `name` against the registry.
    ///
    /// `name` is accepted in flag form (`--self-contained`), dashed form
    /// (`self-contained`), or identifier form (`self_contained`).
    /// Fails with [`PandocError::UnsupportedOption`] before any process is
    /// spawned when the name is not in the vocabulary.
    pub fn add(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<(), PandocError> {
        let name = normalize_name(name);
        self.registry.validate(&name)?;
        let value = value.into();

        // An explicit output destination means pandoc writes the result
        // itself; the classifier then returns empty text on success.
        if name == "output" && !matches!(value, OptionValue::Nil | OptionValue::Bool(false)) {
            self.writes_to_file = true;
        }

        self.entries.push(OptionEntry { name, value });
        Ok(())
    }

    /// Whether an explicit output destination has been configured.
    pub fn writes_to_file(&self) -> bool {
        self.writes_to_file
    }

    /// The entries accumulated so far, in request order.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Render the accumulated entries into an argument vector.
    ///
    /// Rendering rules:
    /// * identifier → flag: underscores become dashes, `--` prefix
    /// * [`OptionValue::Flag`] / `Bool(true)` → the flag token alone
    /// * `Bool(false)` / [`OptionValue::Nil`] → no tokens
    /// * scalar → flag token followed by the value token
    /// * [`OptionValue::Repeated`] → one flag/value pair per element, in order
    pub fn render(&self) -> Vec<String> {
        let mut argv = Vec::new();
        for entry in &self.entries {
            let flag = format!("--{}", entry.name.replace('_', "-"));
            match &entry.value {
                OptionValue::Flag | OptionValue::Bool(true) => argv.push(flag),
                OptionValue::Bool(false) | OptionValue::Nil => {}
                OptionValue::Str(s) => {
                    argv.push(flag);
                    argv.push(s.clone());
                }
                OptionValue::Number(n) => {
                    argv.push(flag);
                    argv.push(n.to_string());
                }
                OptionValue::Repeated(elements) => {
                    for element in elements {
                        argv.push(flag.clone());
                        argv.push(element.clone());
                    }
                }
            }
        }
        argv
    }
}
