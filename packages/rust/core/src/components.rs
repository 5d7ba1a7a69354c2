//! Component fragment resolution.
//!
//! A chapter path is either relative to `<docs>/content/components/`, or, when
//! it already starts with `content/components/`, relative to `<docs>/`.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, error, warn};

use unidoc_shared::{AssemblyConfig, COMPONENTS_PREFIX, Result, UnidocError};

/// Map a chapter path spec to the component file on disk.
pub fn component_path(config: &AssemblyConfig, path_spec: &str) -> PathBuf {
    if path_spec.starts_with(COMPONENTS_PREFIX) {
        config.docs_dir.join(path_spec)
    } else {
        config.components_dir().join(path_spec)
    }
}

/// Load a component's content, trimmed of surrounding whitespace.
///
/// A blank file resolves to `Ok("")`; a missing or unreadable one is an error.
pub fn resolve_component(config: &AssemblyConfig, path_spec: &str) -> Result<String> {
    let full_path = component_path(config, path_spec);

    let content = match std::fs::read_to_string(&full_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let err = UnidocError::ComponentNotFound { path: full_path };
            error!("{err}");
            return Err(err);
        }
        Err(e) => {
            error!(path = %full_path.display(), error = %e, "error reading component");
            return Err(UnidocError::io(full_path, e));
        }
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        warn!(path = %full_path.display(), "empty component file");
        return Ok(String::new());
    }

    debug!(path = %full_path.display(), len = trimmed.len(), "component loaded");
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn temp_docs() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "unidoc-components-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(dir.join("content/components/shared")).unwrap();
        dir
    }

    fn config(docs: &Path) -> AssemblyConfig {
        AssemblyConfig::new(docs, docs.join("out"))
    }

    #[test]
    fn prefixed_and_short_paths_resolve_alike() {
        let docs = temp_docs();
        std::fs::write(docs.join("content/components/x.md"), "# X\n").unwrap();
        let cfg = config(&docs);

        let short = resolve_component(&cfg, "x.md").unwrap();
        let full = resolve_component(&cfg, "content/components/x.md").unwrap();
        assert_eq!(short, "# X");
        assert_eq!(short, full);

        let _ = std::fs::remove_dir_all(&docs);
    }

    #[test]
    fn nested_short_path() {
        let docs = temp_docs();
        std::fs::write(docs.join("content/components/shared/note.md"), "note").unwrap();

        let got = resolve_component(&config(&docs), "shared/note.md").unwrap();
        assert_eq!(got, "note");

        let _ = std::fs::remove_dir_all(&docs);
    }

    #[test]
    fn content_is_trimmed() {
        let docs = temp_docs();
        std::fs::write(docs.join("content/components/pad.md"), "\n\n  # Pad\n\n\n").unwrap();

        assert_eq!(resolve_component(&config(&docs), "pad.md").unwrap(), "# Pad");

        let _ = std::fs::remove_dir_all(&docs);
    }

    #[test]
    fn blank_file_is_empty_not_error() {
        let docs = temp_docs();
        std::fs::write(docs.join("content/components/blank.md"), " \n\t\n").unwrap();

        assert_eq!(resolve_component(&config(&docs), "blank.md").unwrap(), "");

        let _ = std::fs::remove_dir_all(&docs);
    }

    #[test]
    fn missing_file_is_error() {
        let docs = temp_docs();

        let err = resolve_component(&config(&docs), "nope.md").unwrap_err();
        assert!(matches!(err, UnidocError::ComponentNotFound { .. }));

        let _ = std::fs::remove_dir_all(&docs);
    }

    #[test]
    fn directory_is_unreadable() {
        let docs = temp_docs();

        let err = resolve_component(&config(&docs), "shared").unwrap_err();
        assert!(matches!(err, UnidocError::Io { .. }));

        let _ = std::fs::remove_dir_all(&docs);
    }
}
