//! Document store.
//!
//! Finds agent documents under the agents directory and classifies each one as
//! active or inactive. The registry never reads the filesystem itself; it only
//! sees the `(path, text, active)` triples produced here.

use crate::context::CorpusContext;
use crate::error::{DexError, Result};
use crate::registry::{Document, Registry};
use globset::GlobSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Markdown documents under one corpus root.
#[derive(Debug)]
pub struct DocumentStore {
    root: PathBuf,
    agents_dir: PathBuf,
    archive_dir: PathBuf,
    inactive_globs: GlobSet,
}

impl DocumentStore {
    pub fn from_context(ctx: &CorpusContext) -> Result<Self> {
        Ok(Self {
            root: ctx.root.clone(),
            agents_dir: ctx.agents_dir.clone(),
            archive_dir: ctx.archive_dir.clone(),
            inactive_globs: ctx.config.inactive_glob_set()?,
        })
    }

    /// Whether the document at `path` should stay out of the registry.
    pub fn is_inactive(&self, path: &Path) -> bool {
        if path.starts_with(&self.archive_dir) {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.inactive_globs.is_match(relative)
    }

    /// Paths of every agent document, sorted.
    pub fn paths(&self) -> Result<Vec<PathBuf>> {
        if !self.agents_dir.is_dir() {
            return Err(DexError::UserError(format!(
                "agents directory '{}' does not exist (run `agentdex init`)",
                self.agents_dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.agents_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                DexError::UserError(format!(
                    "failed to walk '{}': {}",
                    self.agents_dir.display(),
                    e
                ))
            })?;
            if entry.file_type().is_file() && is_agent_document(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Read every agent document.
    pub fn documents(&self) -> Result<Vec<Document>> {
        self.paths()?
            .into_iter()
            .map(|path| {
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    DexError::UserError(format!(
                        "failed to read agent file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                let active = !self.is_inactive(&path);
                Ok(Document { path, text, active })
            })
            .collect()
    }

    /// Read every document and build a registry from the active ones.
    pub fn load_registry(&self) -> Result<Registry> {
        let documents = self.documents()?;
        tracing::debug!(
            dir = %self.agents_dir.display(),
            documents = documents.len(),
            "read agent documents"
        );
        Registry::build(&documents)
    }
}

fn is_agent_document(path: &Path) -> bool {
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));
    let is_readme = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("readme.md"));
    is_markdown && !is_readme
}
