//! Corpus context resolution.
//!
//! Every command works against one corpus root: the directory holding
//! `agentdex.yaml` (optional) and the agents directory. This module loads the
//! config and turns its relative paths into absolute ones.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{DexError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Resolved paths and config for one corpus.
///
/// All paths are absolute.
#[derive(Debug, Clone)]
pub struct CorpusContext {
    /// Corpus root (the `--root` argument or the current directory).
    pub root: PathBuf,

    /// Loaded config (defaults when `agentdex.yaml` is absent).
    pub config: Config,

    /// Directory holding agent documents.
    pub agents_dir: PathBuf,

    /// Cold storage for archived agents.
    pub archive_dir: PathBuf,

    /// Archival ledger file.
    pub ledger_file: PathBuf,

    /// NDJSON audit log.
    pub events_file: PathBuf,
}

impl CorpusContext {
    /// Resolve the context from `root`, or the current directory when `None`.
    pub fn resolve(root: Option<&Path>) -> Result<Self> {
        match root {
            Some(root) => Self::resolve_from(root),
            None => {
                let cwd = env::current_dir().map_err(|e| {
                    DexError::UserError(format!(
                        "failed to get current working directory: {}",
                        e
                    ))
                })?;
                Self::resolve_from(cwd)
            }
        }
    }

    /// Resolve the context from a specific corpus root.
    pub fn resolve_from<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(DexError::UserError(format!(
                "corpus root '{}' is not a directory",
                root.display()
            )));
        }
        let root = root.canonicalize().map_err(|e| {
            DexError::UserError(format!(
                "failed to resolve corpus root '{}': {}",
                root.display(),
                e
            ))
        })?;

        let config = Config::load_or_default(root.join(CONFIG_FILE_NAME))?;
        Ok(Self::with_config(root, config))
    }

    /// Build a context from an already loaded config.
    pub fn with_config(root: PathBuf, config: Config) -> Self {
        let agents_dir = root.join(&config.agents_dir);
        let archive_dir = root.join(&config.archive_dir);
        let ledger_file = root.join(&config.ledger_file);
        let events_file = root.join(&config.events_file);

        Self {
            root,
            config,
            agents_dir,
            archive_dir,
            ledger_file,
            events_file,
        }
    }

    /// Path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Active slot for an agent: `agents_dir/<name>.md`.
    pub fn active_path(&self, name: &str) -> PathBuf {
        self.agents_dir.join(format!("{}.md", name))
    }

    /// Cold-storage copy of an agent: `archive_dir/<name>.md`.
    pub fn archived_path(&self, name: &str) -> PathBuf {
        self.archive_dir.join(format!("{}.md", name))
    }

    /// Where a rolled-back consolidated agent is parked.
    pub fn rolled_back_path(&self, name: &str) -> PathBuf {
        self.archive_dir.join(format!("{}.rolled-back.md", name))
    }

    /// Resolve a path that may be relative to the corpus root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Render `path` relative to the root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
