//! Application configuration for unidoc.
//!
//! Project config lives at `./unidoc.toml`, with `~/.unidoc/unidoc.toml` as a
//! per-user fallback. CLI flags override config file values, which override
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnidocError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "unidoc.toml";

/// Per-user config directory name under the home directory.
const CONFIG_DIR_NAME: &str = ".unidoc";

// ---------------------------------------------------------------------------
// Config structs (matching unidoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Assembly behaviour.
    #[serde(default)]
    pub assembly: AssemblySettings,

    /// Commands suggested after a successful run.
    #[serde(default)]
    pub next_steps: NextStepsConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Documentation root (holds `manuals/` and `content/components/`).
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Directory receiving `<identity>.md` files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".into()
}
fn default_output_dir() -> String {
    "assembled".into()
}

/// `[assembly]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblySettings {
    /// Manual definition file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Escape `"`, `\` and line breaks in frontmatter values.
    #[serde(default)]
    pub escape_frontmatter: bool,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            escape_frontmatter: false,
        }
    }
}

fn default_extension() -> String {
    "yml".into()
}

/// `[next_steps]` section. Display only; unidoc never runs these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStepsConfig {
    /// Static site build command.
    #[serde(default = "default_site_step")]
    pub site: String,

    /// PDF render command.
    #[serde(default = "default_pdf_step")]
    pub pdf: String,
}

impl Default for NextStepsConfig {
    fn default() -> Self {
        Self {
            site: default_site_step(),
            pdf: default_pdf_step(),
        }
    }
}

fn default_site_step() -> String {
    "mkdocs serve".into()
}
fn default_pdf_step() -> String {
    "pandoc assembled/manual-name.md -o manual-name.pdf".into()
}

// ---------------------------------------------------------------------------
// Assembly config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime assembly configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Documentation root.
    pub docs_dir: PathBuf,
    /// Output directory for assembled manuals.
    pub output_dir: PathBuf,
    /// Manual definition extension (no dot).
    pub extension: String,
    /// Whether frontmatter values are escaped.
    pub escape_frontmatter: bool,
}

impl AssemblyConfig {
    /// Config rooted at `docs_dir`, writing to `output_dir`, with defaults
    /// for everything else.
    pub fn new(docs_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let settings = AssemblySettings::default();
        Self {
            docs_dir: docs_dir.into(),
            output_dir: output_dir.into(),
            extension: settings.extension,
            escape_frontmatter: settings.escape_frontmatter,
        }
    }

    /// `<docs>/manuals`
    pub fn manuals_dir(&self) -> PathBuf {
        self.docs_dir.join("manuals")
    }

    /// `<docs>/content/components`
    pub fn components_dir(&self) -> PathBuf {
        self.docs_dir.join("content").join("components")
    }
}

impl From<&AppConfig> for AssemblyConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            docs_dir: PathBuf::from(&config.paths.docs_dir),
            output_dir: PathBuf::from(&config.paths.output_dir),
            extension: config.assembly.extension.trim_start_matches('.').to_string(),
            escape_frontmatter: config.assembly.escape_frontmatter,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the per-user config file (`~/.unidoc/unidoc.toml`).
pub fn user_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| UnidocError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the application config.
///
/// An explicit path must exist. Without one, `./unidoc.toml` is tried, then
/// the per-user file; defaults are returned if neither exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    match user_config_path() {
        Ok(path) if path.exists() => load_config_from(&path),
        _ => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| UnidocError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        UnidocError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file at `path`. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(UnidocError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| UnidocError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| UnidocError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");
    Ok(())
}

fn validate_config(config: &AppConfig) -> Result<()> {
    let ext = config.assembly.extension.trim_start_matches('.');
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return Err(UnidocError::config(format!(
            "invalid manual extension '{}'",
            config.assembly.extension
        )));
    }
    Ok(())
}
