//! Domain types shared across unidoc crates.

use serde::{Deserialize, Deserializer, Serialize, de};

/// Keys every manual definition must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "author", "date", "chapters"];

/// Path prefix that marks a component path as already rooted at the docs dir.
pub const COMPONENTS_PREFIX: &str = "content/components/";

// ---------------------------------------------------------------------------
// ManualDefinition
// ---------------------------------------------------------------------------

/// One manual, as declared in `<docs>/manuals/<identity>.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualDefinition {
    /// Manual title.
    #[serde(deserialize_with = "string_field")]
    pub title: String,
    /// Author line.
    #[serde(deserialize_with = "string_field")]
    pub author: String,
    /// Publication date, kept as written.
    #[serde(deserialize_with = "string_field")]
    pub date: String,
    /// Optional one-line description (empty when absent).
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    /// Ordered chapter list; order here is output order.
    pub chapters: Vec<ChapterRef>,
}

// ---------------------------------------------------------------------------
// ChapterRef
// ---------------------------------------------------------------------------

/// A single entry of a manual's `chapters` list.
///
/// ```yaml
/// chapters:
///   - intro.md                 # Path
///   - chapter: setup.md        # Named
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterRef {
    /// Bare component path.
    Path(String),
    /// Record holding the component path under `chapter`.
    Named {
        #[serde(default)]
        chapter: Option<String>,
    },
}

impl ChapterRef {
    /// The component path this entry points at. Empty when the record form
    /// has no usable `chapter` value.
    pub fn path_spec(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Named { chapter } => chapter.as_deref().unwrap_or(""),
        }
    }
}

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

/// Metadata must be a YAML string. Unquoted numbers and booleans are rejected
/// because the parsed value loses its written form (`2024.10` → `2024.1`).
fn string_field<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    string_text(value)
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(String::new());
    }
    string_text(value)
}

fn string_text<E: de::Error>(value: serde_yaml::Value) -> std::result::Result<String, E> {
    match value {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Err(E::custom(format!(
            "expected a string, found number {n}; quote the value to keep it as written"
        ))),
        serde_yaml::Value::Bool(b) => Err(E::custom(format!(
            "expected a string, found boolean {b}; quote the value to keep it as written"
        ))),
        _ => Err(E::custom("expected a string value")),
    }
}
