//! Agent registry.
//!
//! This module provides:
//! - Registry build: parse every active document and index records by name
//! - Lookup by name, enumeration, and trigger matching
//! - A swappable snapshot handle for hot reload
//!
//! Building is all-or-nothing with respect to names: a malformed document is
//! skipped (and recorded in the [`LoadReport`]), but two active documents
//! declaring the same name abort the build, because silently shadowing one
//! definition with another is worse than refusing to start.

use crate::error::{DexError, Result};
use crate::record::AgentRecord;
use std::collections::HashMap;
use std::path::PathBuf;

mod handle;
mod matcher;

pub use handle::RegistryHandle;
pub use matcher::{TriggerMatch, normalize_phrase, phrase_matches};

/// A raw document handed over by the document store.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document lives (used for messages and lint).
    pub path: PathBuf,
    /// Full document text.
    pub text: String,
    /// Whether the store considers this document installed.
    pub active: bool,
}

impl Document {
    /// An active document.
    pub fn active(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            active: true,
        }
    }

    /// An archived or otherwise ignored document.
    pub fn inactive(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            active: false,
        }
    }
}

/// A document that failed to parse and was left out of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub message: String,
}

/// What happened while building a registry.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of records registered.
    pub loaded: usize,
    /// Number of inactive documents that were not considered.
    pub inactive: usize,
    /// Active documents that failed to parse.
    pub skipped: Vec<SkippedDocument>,
}

/// Index of all loaded agent records.
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<String, AgentRecord>,
    report: LoadReport,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a set of documents.
    ///
    /// Inactive documents are ignored. Parse failures are logged and recorded
    /// in the load report. A duplicate name fails the whole build with
    /// [`DexError::DuplicateName`].
    pub fn build(documents: &[Document]) -> Result<Self> {
        let mut registry = Registry::new();

        for doc in documents {
            if !doc.active {
                registry.report.inactive += 1;
                continue;
            }

            let label = doc.path.display().to_string();
            match AgentRecord::parse_labeled(&doc.text, &label) {
                Ok(record) => registry.register(record.with_source(&doc.path))?,
                Err(err) => {
                    tracing::warn!(path = %label, error = %err, "skipping agent document");
                    registry.report.skipped.push(SkippedDocument {
                        path: doc.path.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        registry.report.loaded = registry.records.len();
        tracing::debug!(
            loaded = registry.report.loaded,
            inactive = registry.report.inactive,
            skipped = registry.report.skipped.len(),
            "registry built"
        );
        Ok(registry)
    }

    /// Insert a record, refusing to shadow an existing name.
    pub fn register(&mut self, record: AgentRecord) -> Result<()> {
        if let Some(existing) = self.records.get(record.name()) {
            return Err(DexError::DuplicateName {
                name: record.name().to_string(),
                first: existing.source_label(),
                second: record.source_label(),
            });
        }
        self.records.insert(record.name().to_string(), record);
        self.report.loaded = self.records.len();
        Ok(())
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Result<&AgentRecord> {
        self.records
            .get(name)
            .ok_or_else(|| DexError::agent_not_found(name))
    }

    /// Whether a record with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// All records, sorted by name.
    ///
    /// Callers must not rely on any particular order; sorting only keeps CLI
    /// output stable.
    pub fn all(&self) -> Vec<&AgentRecord> {
        let mut records: Vec<&AgentRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.name().cmp(b.name()));
        records
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Records with a trigger phrase matching `utterance`.
    ///
    /// Every match is returned; picking one is left to the caller.
    pub fn find_by_trigger(&self, utterance: &str) -> Vec<TriggerMatch<'_>> {
        matcher::find_matches(self.all(), utterance)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Report from the build that produced this registry.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }
}
