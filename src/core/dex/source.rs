//! Bulk dataset sources.
//!
//! A source hands back the whole dataset as text: a JSON object keyed by
//! stringified id, one record per key. The parser is lenient in the ways the
//! hand-maintained data files need: `//` and `/* */` comments, trailing
//! commas, and field names in any letter case.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::LoadError;
use super::types::Pokemon;

/// Supplies the raw dataset blob.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Name used in log lines and error messages.
    fn name(&self) -> String;

    /// Read the complete dataset text.
    async fn read(&self) -> Result<String, LoadError>;
}

/// Reads the dataset from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => LoadError::SourceNotFound {
                    path: self.path.clone(),
                },
                _ => LoadError::Io(e),
            })
    }
}

/// Parse the dataset text into records.
///
/// Record ids come from the records themselves; the object keys are only
/// checked for agreement and a mismatch is logged, not rejected.
pub fn parse_dataset(text: &str, source_name: &str) -> Result<Vec<Pokemon>, LoadError> {
    let malformed = |reason: String| LoadError::Malformed {
        source_name: source_name.to_string(),
        reason,
    };

    let cleaned = strip_trailing_commas(&strip_comments(text));
    let value: Value = serde_json::from_str(&cleaned).map_err(|e| malformed(e.to_string()))?;

    let Value::Object(entries) = lowercase_keys(value) else {
        return Err(malformed("top-level value must be an object keyed by id".to_string()));
    };

    let mut records = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let record: Pokemon =
            serde_json::from_value(entry).map_err(|e| malformed(format!("record '{key}': {e}")))?;
        if key.trim() != record.id.to_string() {
            log::warn!(
                "Dataset key '{}' does not match record id {} ({})",
                key,
                record.id,
                record.name
            );
        }
        records.push(record);
    }

    Ok(records)
}

/// Index records by id. Later duplicates replace earlier ones.
pub(crate) fn index_by_id(records: Vec<Pokemon>) -> HashMap<u32, Pokemon> {
    let mut by_id = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(previous) = by_id.insert(record.id, record) {
            log::warn!("Duplicate record id {} ({}) replaced", previous.id, previous.name);
        }
    }
    by_id
}

/// Lowercase every object key, recursively.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Remove `//` line comments and `/* */` block comments outside strings.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    // keep line numbers in parse errors meaningful
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas that directly precede a closing `}` or `]`.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
