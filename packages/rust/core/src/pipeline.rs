//! End-to-end run: discover definitions → assemble each → summarise.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, instrument};

use unidoc_shared::{AssemblyConfig, Result, UnidocError};

use crate::assembler::{self, ManualOutcome, manual_identity};
use crate::definition::load_definition;

/// Progress callback for reporting pipeline status.
pub trait AssemblyReporter: Send + Sync {
    /// Called once discovery has finished.
    fn discovered(&self, count: usize);
    /// Called before a manual is processed.
    fn manual_started(&self, identity: &str, current: usize, total: usize);
    /// Called before each chapter's component is resolved.
    fn chapter_loading(&self, identity: &str, path_spec: &str);
    /// Called when a run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl AssemblyReporter for SilentReporter {
    fn discovered(&self, _count: usize) {}
    fn manual_started(&self, _identity: &str, _current: usize, _total: usize) {}
    fn chapter_loading(&self, _identity: &str, _path_spec: &str) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// A manual that failed at any stage.
#[derive(Debug, Clone, Serialize)]
pub struct ManualFailure {
    pub identity: String,
    pub definition: PathBuf,
    pub reason: String,
}

/// Result of a full run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of definition files found.
    pub discovered: usize,
    pub succeeded: Vec<ManualOutcome>,
    pub failed: Vec<ManualFailure>,
}

impl RunSummary {
    /// At least one manual was found and every one of them succeeded.
    pub fn is_success(&self) -> bool {
        self.discovered > 0 && self.failed.is_empty()
    }
}

/// Per-manual status from [`check`] or [`list`].
#[derive(Debug, Clone, Serialize)]
pub struct ManualStatus {
    pub identity: String,
    pub definition: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Declared chapters for `list`, resolved chapters for `check`.
    pub chapters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ManualStatus {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// List manual definition files directly inside `<docs>/manuals`, sorted.
pub fn discover(config: &AssemblyConfig) -> Result<Vec<PathBuf>> {
    let manuals_dir = config.manuals_dir();
    if !manuals_dir.is_dir() {
        return Err(UnidocError::ManualsDirMissing { path: manuals_dir });
    }

    let entries =
        std::fs::read_dir(&manuals_dir).map_err(|e| UnidocError::io(&manuals_dir, e))?;

    let ext = OsStr::new(&config.extension);
    let mut manuals = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| UnidocError::io(&manuals_dir, e))?.path();
        if path.is_file() && path.extension() == Some(ext) {
            manuals.push(path);
        }
    }
    manuals.sort();

    info!("found {} manual definition(s)", manuals.len());
    Ok(manuals)
}

/// Discovery where a missing manuals directory just means "nothing found".
fn discover_or_empty(config: &AssemblyConfig) -> Result<Vec<PathBuf>> {
    match discover(config) {
        Err(err @ UnidocError::ManualsDirMissing { .. }) => {
            error!("{err}");
            Ok(Vec::new())
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run the full assembly.
///
/// Every discovered manual is attempted; a failure in one never stops the
/// others. `Err` is reserved for problems outside any single manual.
#[instrument(skip_all, fields(docs = %config.docs_dir.display(), output = %config.output_dir.display()))]
pub fn run(config: &AssemblyConfig, reporter: &dyn AssemblyReporter) -> Result<RunSummary> {
    info!("unidoc manual assembly");

    let manuals = discover_or_empty(config)?;
    reporter.discovered(manuals.len());

    let mut summary = RunSummary {
        discovered: manuals.len(),
        ..RunSummary::default()
    };

    if manuals.is_empty() {
        error!("no manual definition files found");
        reporter.done(&summary);
        return Ok(summary);
    }

    if let Err(e) = std::fs::create_dir_all(&config.output_dir) {
        reporter.done(&summary);
        return Err(UnidocError::io(&config.output_dir, e));
    }

    let total = manuals.len();
    for (i, path) in manuals.iter().enumerate() {
        let identity = manual_identity(path);
        reporter.manual_started(&identity, i + 1, total);

        match assembler::assemble(config, path, reporter) {
            Ok(outcome) => summary.succeeded.push(outcome),
            Err(err) => summary.failed.push(ManualFailure {
                identity,
                definition: path.clone(),
                reason: err.to_string(),
            }),
        }
    }

    info!(
        successful = summary.succeeded.len(),
        failed = summary.failed.len(),
        "assembly complete"
    );
    reporter.done(&summary);
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// Validate every manual and resolve every chapter without writing anything.
#[instrument(skip_all, fields(docs = %config.docs_dir.display()))]
pub fn check(config: &AssemblyConfig, reporter: &dyn AssemblyReporter) -> Result<Vec<ManualStatus>> {
    let manuals = discover_or_empty(config)?;
    reporter.discovered(manuals.len());

    let total = manuals.len();
    let statuses = manuals
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let identity = manual_identity(path);
            reporter.manual_started(&identity, i + 1, total);
            match assembler::prepare(config, path, reporter) {
                Ok(prepared) => ManualStatus {
                    identity,
                    definition: path.clone(),
                    title: Some(prepared.definition.title),
                    chapters: prepared.chapter_count,
                    error: None,
                },
                Err(err) => failed_status(identity, path, err),
            }
        })
        .collect();

    Ok(statuses)
}

/// Parse every manual definition without resolving components.
#[instrument(skip_all, fields(docs = %config.docs_dir.display()))]
pub fn list(config: &AssemblyConfig) -> Result<Vec<ManualStatus>> {
    let manuals = discover_or_empty(config)?;

    Ok(manuals
        .iter()
        .map(|path| {
            let identity = manual_identity(path);
            match load_definition(path) {
                Ok(def) => ManualStatus {
                    identity,
                    definition: path.clone(),
                    chapters: def.chapters.len(),
                    title: Some(def.title),
                    error: None,
                },
                Err(err) => failed_status(identity, path, err),
            }
        })
        .collect())
}

fn failed_status(identity: String, path: &Path, err: UnidocError) -> ManualStatus {
    ManualStatus {
        identity,
        definition: path.to_path_buf(),
        title: None,
        chapters: 0,
        error: Some(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
