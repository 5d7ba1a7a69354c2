//! Manual assembler.
//!
//! Turns one manual definition into its assembled Markdown text and writes
//! that text to both destinations:
//!
//! ```text
//! <output_dir>/<identity>.md    assembled output
//! <docs_dir>/<identity>.md      copy picked up by the site generator
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, instrument, warn};

use unidoc_markdown::{FrontmatterStyle, build_frontmatter, concat_manual};
use unidoc_shared::{AssemblyConfig, ManualDefinition, Result, UnidocError};

use crate::components::resolve_component;
use crate::definition::load_definition;
use crate::pipeline::AssemblyReporter;

/// A manual whose text is fully built but not yet written.
#[derive(Debug, Clone)]
pub struct PreparedManual {
    /// Definition file base name, extension stripped.
    pub identity: String,
    /// The parsed definition.
    pub definition: ManualDefinition,
    /// Frontmatter plus all fragments.
    pub text: String,
    /// Chapters that contributed a fragment.
    pub chapter_count: usize,
    /// Chapter entries skipped for an empty path spec.
    pub skipped: usize,
}

/// Output from a successful manual assembly.
#[derive(Debug, Clone, Serialize)]
pub struct ManualOutcome {
    pub identity: String,
    pub title: String,
    /// `<output_dir>/<identity>.md`
    pub output_path: PathBuf,
    /// `<docs_dir>/<identity>.md`
    pub docs_path: PathBuf,
    /// Hex SHA-256 of the assembled text.
    pub sha256: String,
    pub size_bytes: usize,
    pub chapter_count: usize,
}

/// Derive a manual's identity from its definition file name.
pub fn manual_identity(definition_path: &Path) -> String {
    definition_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load a definition and build its text without touching the destinations.
///
/// Chapter failures accumulate: every unresolvable chapter is collected and
/// reported together in one [`UnidocError::MissingComponents`].
#[instrument(skip_all, fields(manual = %definition_path.display()))]
pub fn prepare(
    config: &AssemblyConfig,
    definition_path: &Path,
    reporter: &dyn AssemblyReporter,
) -> Result<PreparedManual> {
    let definition = load_definition(definition_path)?;
    let identity = manual_identity(definition_path);

    info!(title = %definition.title, "assembling manual");

    let header = build_frontmatter(
        &definition,
        FrontmatterStyle::from_flag(config.escape_frontmatter),
    );

    if definition.chapters.is_empty() {
        let err = UnidocError::NoChapters { manual: identity };
        warn!("{err}");
        return Err(err);
    }

    let mut fragments = Vec::with_capacity(definition.chapters.len());
    let mut failed = Vec::new();
    let mut skipped = 0;

    for (i, chapter) in definition.chapters.iter().enumerate() {
        let path_spec = chapter.path_spec();
        if path_spec.is_empty() {
            warn!(manual = %identity, chapter = i + 1, "empty chapter path");
            skipped += 1;
            continue;
        }

        info!("  loading chapter: {path_spec}");
        reporter.chapter_loading(&identity, path_spec);

        match resolve_component(config, path_spec) {
            Ok(content) => fragments.push(content),
            Err(_) => failed.push(path_spec.to_string()),
        }
    }

    if !failed.is_empty() {
        let err = UnidocError::MissingComponents {
            manual: identity,
            paths: failed,
        };
        error!("{err}");
        return Err(err);
    }

    let text = concat_manual(&header, &fragments);
    Ok(PreparedManual {
        identity,
        chapter_count: fragments.len(),
        definition,
        text,
        skipped,
    })
}

/// Assemble one manual and write it to both destinations.
///
/// The output-directory copy is written first. If the docs-root write then
/// fails, the first file is left in place and the manual still fails.
#[instrument(skip_all, fields(manual = %definition_path.display()))]
pub fn assemble(
    config: &AssemblyConfig,
    definition_path: &Path,
    reporter: &dyn AssemblyReporter,
) -> Result<ManualOutcome> {
    let prepared = prepare(config, definition_path, reporter)?;
    let file_name = format!("{}.md", prepared.identity);

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| UnidocError::write(&config.output_dir, e))?;

    let output_path = config.output_dir.join(&file_name);
    write_atomic(&output_path, &prepared.text).inspect_err(|e| error!("{e}"))?;
    info!("✓ assembled: {}", output_path.display());

    let docs_path = config.docs_dir.join(&file_name);
    write_atomic(&docs_path, &prepared.text).inspect_err(|e| error!("{e}"))?;
    info!("✓ copied to docs: {}", docs_path.display());

    let sha256 = hex_digest(&prepared.text);
    debug!(sha256 = %sha256, size = prepared.text.len(), "manual written");

    Ok(ManualOutcome {
        identity: prepared.identity,
        title: prepared.definition.title,
        output_path,
        docs_path,
        sha256,
        size_bytes: prepared.text.len(),
        chapter_count: prepared.chapter_count,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Replace `target` with `content` via a temp file and rename.
fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = dir.join(format!(".{name}.tmp"));

    if let Err(e) = std::fs::write(&temp, content) {
        let _ = std::fs::remove_file(&temp);
        return Err(UnidocError::write(target, e));
    }

    std::fs::rename(&temp, target).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        UnidocError::write(target, e)
    })?;

    debug!(path = %target.display(), size = content.len(), "wrote file");
    Ok(())
}

fn hex_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentReporter;

    const HEADER: &str =
        "---\ntitle: \"Guide\"\nauthor: \"A\"\ndate: \"2024-01-01\"\ndescription: \"\"\n---\n\n";

    fn temp_docs() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "unidoc-assembler-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(dir.join("docs/manuals")).unwrap();
        std::fs::create_dir_all(dir.join("docs/content/components")).unwrap();
        dir
    }

    fn config(root: &Path) -> AssemblyConfig {
        AssemblyConfig::new(root.join("docs"), root.join("assembled"))
    }

    fn write_component(root: &Path, name: &str, content: &str) {
        std::fs::write(root.join("docs/content/components").join(name), content).unwrap();
    }

    fn write_manual(root: &Path, name: &str, yaml: &str) -> PathBuf {
        let path = root.join("docs/manuals").join(name);
        std::fs::write(&path, yaml).unwrap();
        path
    }

    const GUIDE: &str = r#"
title: "Guide"
author: "A"
date: "2024-01-01"
chapters:
  - intro.md
  - chapter: setup.md
"#;

    #[test]
    fn assembles_guide_end_to_end() {
        let root = temp_docs();
        write_component(&root, "intro.md", "# Intro");
        write_component(&root, "setup.md", "# Setup");
        let manual = write_manual(&root, "guide.yml", GUIDE);
        let cfg = config(&root);

        let outcome = assemble(&cfg, &manual, &SilentReporter).unwrap();

        let expected = format!("{HEADER}# Intro\n\n# Setup\n\n");
        assert_eq!(outcome.identity, "guide");
        assert_eq!(outcome.output_path, root.join("assembled/guide.md"));
        assert_eq!(std::fs::read_to_string(&outcome.output_path).unwrap(), expected);
        assert_eq!(std::fs::read_to_string(root.join("docs/guide.md")).unwrap(), expected);
        assert_eq!(outcome.size_bytes, expected.len());
        assert_eq!(outcome.sha256.len(), 64);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn blank_component_leaves_empty_segment() {
        let root = temp_docs();
        write_component(&root, "intro.md", "# Intro");
        write_component(&root, "setup.md", "\n\n");
        let manual = write_manual(&root, "guide.yml", GUIDE);

        let outcome = assemble(&config(&root), &manual, &SilentReporter).unwrap();

        let text = std::fs::read_to_string(outcome.output_path).unwrap();
        assert_eq!(text, format!("{HEADER}# Intro\n\n\n\n"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_components_all_reported_and_nothing_written() {
        let root = temp_docs();
        write_component(&root, "setup.md", "# Setup");
        let manual = write_manual(
            &root,
            "guide.yml",
            "title: G\nauthor: A\ndate: d\nchapters: [intro.md, setup.md, content/components/gone.md]\n",
        );

        let err = assemble(&config(&root), &manual, &SilentReporter).unwrap_err();
        match err {
            UnidocError::MissingComponents { manual, paths } => {
                assert_eq!(manual, "guide");
                assert_eq!(paths, vec!["intro.md", "content/components/gone.md"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!root.join("assembled/guide.md").exists());
        assert!(!root.join("docs/guide.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_chapter_list_rejected() {
        let root = temp_docs();
        let manual = write_manual(&root, "empty.yml", "title: T\nauthor: A\ndate: d\nchapters: []\n");

        let err = assemble(&config(&root), &manual, &SilentReporter).unwrap_err();
        assert!(matches!(err, UnidocError::NoChapters { .. }));
        assert!(!root.join("assembled/empty.md").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_chapter_path_is_skipped() {
        let root = temp_docs();
        write_component(&root, "intro.md", "# Intro");
        let manual = write_manual(
            &root,
            "guide.yml",
            "title: Guide\nauthor: A\ndate: 2024-01-01\nchapters:\n  - chapter: ''\n  - intro.md\n  - title: orphan\n",
        );

        let prepared = prepare(&config(&root), &manual, &SilentReporter).unwrap();
        assert_eq!(prepared.skipped, 2);
        assert_eq!(prepared.chapter_count, 1);
        assert_eq!(prepared.text, format!("{HEADER}# Intro\n\n"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn docs_write_failure_keeps_output_copy() {
        let root = temp_docs();
        write_component(&root, "intro.md", "# Intro");
        write_component(&root, "setup.md", "# Setup");
        let manual = write_manual(&root, "guide.yml", GUIDE);
        // A directory at the docs destination makes the rename fail.
        std::fs::create_dir_all(root.join("docs/guide.md/blocker")).unwrap();

        let err = assemble(&config(&root), &manual, &SilentReporter).unwrap_err();
        assert!(matches!(err, UnidocError::Write { .. }));
        assert!(root.join("assembled/guide.md").is_file());
        assert!(!root.join("docs/.guide.md.tmp").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn reassembly_is_byte_identical() {
        let root = temp_docs();
        write_component(&root, "intro.md", "# Intro");
        write_component(&root, "setup.md", "# Setup");
        let manual = write_manual(&root, "guide.yml", GUIDE);
        let cfg = config(&root);

        let first = assemble(&cfg, &manual, &SilentReporter).unwrap();
        let bytes1 = std::fs::read(&first.output_path).unwrap();
        let second = assemble(&cfg, &manual, &SilentReporter).unwrap();
        let bytes2 = std::fs::read(&second.output_path).unwrap();

        assert_eq!(bytes1, bytes2);
        assert_eq!(first.sha256, second.sha256);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn identity_strips_extension() {
        assert_eq!(manual_identity(Path::new("docs/manuals/user-guide.yml")), "user-guide");
    }
}
