//! Shared types, error model, and configuration for unidoc.
//!
//! This crate is the foundation depended on by all other unidoc crates.
//! It provides:
//! - [`UnidocError`] — the unified error type
//! - Domain types ([`ManualDefinition`], [`ChapterRef`])
//! - Configuration ([`AppConfig`], [`AssemblyConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AssemblyConfig, AssemblySettings, CONFIG_FILE_NAME, NextStepsConfig, PathsConfig,
    init_config, load_config, load_config_from, user_config_path,
};
pub use error::{Result, UnidocError};
pub use types::{COMPONENTS_PREFIX, ChapterRef, ManualDefinition, REQUIRED_FIELDS};
