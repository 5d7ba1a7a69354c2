//! Manual definition loading and validation.

use std::io::ErrorKind;
use std::path::Path;

use serde_yaml::Value;
use tracing::{error, warn};

use unidoc_shared::{ManualDefinition, REQUIRED_FIELDS, Result, UnidocError};

/// Read and validate one manual definition file.
///
/// Every failure is logged here with its specific reason; callers only need
/// to count it.
pub fn load_definition(path: &Path) -> Result<ManualDefinition> {
    let result = std::fs::read_to_string(path)
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => UnidocError::DefinitionNotFound {
                path: path.to_path_buf(),
            },
            _ => UnidocError::io(path, e),
        })
        .and_then(|content| parse_definition(path, &content));

    match &result {
        Err(err @ UnidocError::EmptyDefinition { .. }) => warn!("{err}"),
        Err(err) => error!("{err}"),
        Ok(_) => {}
    }
    result
}

/// Parse definition text. `path` is only used for error context.
pub fn parse_definition(path: &Path, content: &str) -> Result<ManualDefinition> {
    let syntax = |message: String| UnidocError::Syntax {
        path: path.to_path_buf(),
        message,
    };
    let empty = || UnidocError::EmptyDefinition {
        path: path.to_path_buf(),
    };

    if content.trim().is_empty() {
        return Err(empty());
    }

    let value: Value = serde_yaml::from_str(content).map_err(|e| syntax(e.to_string()))?;

    let mapping = match &value {
        Value::Null => return Err(empty()),
        Value::Mapping(m) if m.is_empty() => return Err(empty()),
        Value::Sequence(s) if s.is_empty() => return Err(empty()),
        Value::String(s) if s.is_empty() => return Err(empty()),
        Value::Bool(false) => return Err(empty()),
        Value::Number(n) if n.as_f64() == Some(0.0) => return Err(empty()),
        Value::Mapping(m) => m,
        _ => return Err(syntax("expected a mapping at the top level".into())),
    };

    let missing = missing_fields(mapping);
    if !missing.is_empty() {
        return Err(UnidocError::MissingFields {
            path: path.to_path_buf(),
            fields: missing,
        });
    }

    if let Some(message) = chapter_shape_error(mapping) {
        return Err(syntax(message));
    }

    serde_yaml::from_value(value).map_err(|e| syntax(e.to_string()))
}

/// Check `chapters` before typed decoding so a bad entry is named by position.
fn chapter_shape_error(mapping: &serde_yaml::Mapping) -> Option<String> {
    let Value::Sequence(entries) = mapping.get("chapters")? else {
        return Some("chapters: expected a list".into());
    };

    entries.iter().enumerate().find_map(|(i, entry)| match entry {
        Value::String(_) | Value::Mapping(_) => None,
        _ => Some(format!(
            "chapters[{}]: expected a component path or a `chapter:` record",
            i + 1
        )),
    })
}

/// Required keys that are absent or `null`, in [`REQUIRED_FIELDS`] order.
fn missing_fields(mapping: &serde_yaml::Mapping) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| mapping.get(*key).is_none_or(Value::is_null))
        .collect()
}
