//! Error types for unidoc.
//!
//! Library crates use [`UnidocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all unidoc operations.
///
/// Every failure below the run level is local to one manual: the pipeline
/// records it against that manual and moves on to the next definition.
#[derive(Debug, thiserror::Error)]
pub enum UnidocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The manuals directory does not exist.
    #[error("manuals directory not found: {}", path.display())]
    ManualsDirMissing { path: PathBuf },

    /// A definition file vanished between discovery and read.
    #[error("manual file not found: {}", path.display())]
    DefinitionNotFound { path: PathBuf },

    /// The definition parsed to nothing (empty file, `~`, `{}`).
    #[error("empty configuration in {}", path.display())]
    EmptyDefinition { path: PathBuf },

    /// One or more required keys are absent.
    #[error("missing required fields in {}: {}", path.display(), fields.join(", "))]
    MissingFields {
        path: PathBuf,
        fields: Vec<&'static str>,
    },

    /// Malformed YAML, or a value of the wrong shape.
    #[error("YAML parsing error in {}: {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    /// The definition declares `chapters: []`.
    #[error("no chapters defined for {manual}")]
    NoChapters { manual: String },

    /// A chapter's component file does not exist.
    #[error("component file not found: {}", path.display())]
    ComponentNotFound { path: PathBuf },

    /// Every chapter of one manual that failed to resolve.
    #[error("failed to load components for {manual}: {}", paths.join(", "))]
    MissingComponents { manual: String, paths: Vec<String> },

    /// Writing an assembled manual to one of its destinations failed.
    #[error("error writing assembled manual {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UnidocError>;

impl UnidocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a failed destination write.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
