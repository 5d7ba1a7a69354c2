//! Frontmatter rendering and fragment concatenation for assembled manuals.
//!
//! An assembled manual is a fixed YAML frontmatter block followed by every
//! component fragment in chapter order, each fragment followed by a blank line.

use tracing::debug;

use unidoc_shared::ManualDefinition;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How metadata values are written into the quoted frontmatter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontmatterStyle {
    /// Values are interpolated as-is. A `"` or line break in a value yields
    /// a header that downstream YAML parsers reject.
    #[default]
    Verbatim,
    /// Backslashes, quotes, and line breaks are escaped.
    Escaped,
}

impl FrontmatterStyle {
    /// Style for the `escape_frontmatter` config flag.
    pub fn from_flag(escape: bool) -> Self {
        if escape { Self::Escaped } else { Self::Verbatim }
    }
}

// ---------------------------------------------------------------------------
// Frontmatter
// ---------------------------------------------------------------------------

/// Build the leading metadata block, including the blank line after it.
///
/// ```text
/// ---
/// title: "<title>"
/// author: "<author>"
/// date: "<date>"
/// description: "<description>"
/// ---
///
/// ```
pub fn build_frontmatter(def: &ManualDefinition, style: FrontmatterStyle) -> String {
    let value = |s: &str| match style {
        FrontmatterStyle::Verbatim => s.to_string(),
        FrontmatterStyle::Escaped => escape_yaml_string(s),
    };

    let mut fm = String::from("---\n");
    fm.push_str(&format!("title: \"{}\"\n", value(&def.title)));
    fm.push_str(&format!("author: \"{}\"\n", value(&def.author)));
    fm.push_str(&format!("date: \"{}\"\n", value(&def.date)));
    fm.push_str(&format!("description: \"{}\"\n", value(&def.description)));
    fm.push_str("---\n\n");
    fm
}

/// Escape special characters in a double-quoted YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

// ---------------------------------------------------------------------------
// Concatenation
// ---------------------------------------------------------------------------

/// Join the header and fragments into the final manual text.
pub fn concat_manual<S: AsRef<str>>(header: &str, fragments: &[S]) -> String {
    let body_len: usize = fragments.iter().map(|f| f.as_ref().len() + 2).sum();
    let mut out = String::with_capacity(header.len() + body_len);
    out.push_str(header);
    for fragment in fragments {
        out.push_str(fragment.as_ref());
        out.push_str("\n\n");
    }

    debug!(fragments = fragments.len(), len = out.len(), "manual text assembled");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(title: &str) -> ManualDefinition {
        ManualDefinition {
            title: title.into(),
            author: "A".into(),
            date: "2024-01-01".into(),
            description: String::new(),
            chapters: vec![],
        }
    }

    #[test]
    fn frontmatter_fixed_layout() {
        let fm = build_frontmatter(&definition("Guide"), FrontmatterStyle::Verbatim);
        assert_eq!(
            fm,
            "---\ntitle: \"Guide\"\nauthor: \"A\"\ndate: \"2024-01-01\"\ndescription: \"\"\n---\n\n"
        );
    }

    #[test]
    fn verbatim_keeps_quotes() {
        let fm = build_frontmatter(&definition("The \"Best\" Guide"), FrontmatterStyle::Verbatim);
        assert!(fm.contains("title: \"The \"Best\" Guide\"\n"));
    }

    #[test]
    fn escaped_quotes_and_newlines() {
        let fm = build_frontmatter(
            &definition("The \"Best\"\nGuide \\ v2"),
            FrontmatterStyle::Escaped,
        );
        assert!(fm.contains(r#"title: "The \"Best\"\nGuide \\ v2""#));
        assert_eq!(fm.lines().count(), 7);
    }

    #[test]
    fn concat_separates_fragments_with_blank_line() {
        let out = concat_manual("HEADER\n\n", &["# Intro", "", "# Setup"]);
        assert_eq!(out, "HEADER\n\n# Intro\n\n\n\n# Setup\n\n");
    }

    #[test]
    fn concat_without_fragments_is_header() {
        let out = concat_manual::<&str>("HEADER\n\n", &[]);
        assert_eq!(out, "HEADER\n\n");
    }
}
