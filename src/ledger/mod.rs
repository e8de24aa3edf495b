//! Archival ledger.
//!
//! Records consolidation passes (several agents replaced by one, originals
//! moved to cold storage) as structured data, and plans their reversal.
//!
//! # Ledger Format
//!
//! The ledger is a YAML document, by default `.agentdex/ledger.yaml`:
//!
//! ```yaml
//! version: 1
//! entries:
//!   - active: hubspot-api-crm-all
//!     archived:
//!       - hubspot-api-crm
//!       - hubspot-api-automation
//!     reason: consolidation
//!     recorded_at: 2026-01-28T10:00:00Z
//! ```

use crate::error::{DexError, Result};
use crate::registry::Registry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod plan;

pub use plan::{RollbackPlan, RollbackStep, plan_rollback};

const LEDGER_VERSION: u32 = 1;

/// One consolidation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivalEntry {
    /// Record that superseded the originals.
    pub active: String,
    /// Original records moved to cold storage.
    pub archived: Vec<String>,
    /// Renamed copy kept next to the active record for fast rollback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    /// Why the consolidation happened (duplicate, project archived, slimmed...).
    #[serde(default)]
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
    /// Where archived records lived before they were moved, relative to the
    /// corpus root. Only records outside their default active slot appear.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub origins: BTreeMap<String, PathBuf>,
}

/// The full ledger, oldest entry first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    entries: Vec<ArchivalEntry>,
}

fn default_version() -> u32 {
    LEDGER_VERSION
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            version: LEDGER_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger; a missing file is an empty ledger.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            DexError::UserError(format!(
                "failed to read ledger '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a ledger from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let ledger: Ledger = serde_yaml::from_str(yaml)
            .map_err(|e| DexError::UserError(format!("failed to parse ledger YAML: {}", e)))?;
        if ledger.version > LEDGER_VERSION {
            return Err(DexError::UserError(format!(
                "ledger version {} is newer than supported version {}",
                ledger.version, LEDGER_VERSION
            )));
        }
        Ok(ledger)
    }

    /// Serialize the ledger to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DexError::UserError(format!("failed to serialize ledger: {}", e)))
    }

    /// Atomically write the ledger to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::fs::atomic_write_file(path, &self.to_yaml()?)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ArchivalEntry] {
        &self.entries
    }

    /// Append one consolidation, stamped with the current time.
    pub fn record_consolidation(
        &mut self,
        active: &str,
        archived: &[String],
        backup_path: Option<PathBuf>,
        reason: &str,
    ) -> Result<&mut ArchivalEntry> {
        self.record_consolidation_at(active, archived, backup_path, reason, Utc::now())
    }

    /// Append one consolidation with an explicit timestamp.
    pub fn record_consolidation_at(
        &mut self,
        active: &str,
        archived: &[String],
        backup_path: Option<PathBuf>,
        reason: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<&mut ArchivalEntry> {
        let active = active.trim();
        if active.is_empty() {
            return Err(DexError::UserError(
                "consolidation needs the name of the active agent".to_string(),
            ));
        }

        let mut names: Vec<String> = Vec::new();
        for name in archived.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if name == active {
                return Err(DexError::UserError(format!(
                    "'{}' cannot be both the active agent and an archived one",
                    name
                )));
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        if names.is_empty() {
            return Err(DexError::UserError(
                "consolidation needs at least one archived agent".to_string(),
            ));
        }

        self.entries.push(ArchivalEntry {
            active: active.to_string(),
            archived: names,
            backup_path,
            reason: reason.trim().to_string(),
            recorded_at,
            origins: BTreeMap::new(),
        });

        let index = self.entries.len() - 1;
        Ok(&mut self.entries[index])
    }

    /// Most recent entry whose active record is `active`.
    pub fn latest_for(&self, active: &str) -> Option<&ArchivalEntry> {
        self.entries.iter().rev().find(|e| e.active == active)
    }

    /// Plan the rollback of the latest consolidation into `active`.
    ///
    /// Fails with [`DexError::NotFound`] when the ledger has no such entry, or
    /// when the consolidated record is no longer in the registry.
    pub fn plan_rollback_for(&self, active: &str, registry: &Registry) -> Result<RollbackPlan> {
        let entry = self.latest_for(active).ok_or_else(|| DexError::NotFound {
            kind: "ledger entry",
            name: active.to_string(),
        })?;

        if !registry.contains(&entry.active) {
            return Err(DexError::agent_not_found(&entry.active));
        }

        Ok(plan_rollback(entry))
    }

    /// Drop the entry a plan was built from, once its steps have been carried out.
    pub fn apply_rollback(&mut self, plan: &RollbackPlan) -> Result<ArchivalEntry> {
        self.remove_entry(&plan.entry)
    }

    /// Drop the most recent entry equal to `entry`.
    pub fn remove_entry(&mut self, entry: &ArchivalEntry) -> Result<ArchivalEntry> {
        let position = self
            .entries
            .iter()
            .rposition(|e| e == entry)
            .ok_or_else(|| DexError::NotFound {
                kind: "ledger entry",
                name: entry.active.clone(),
            })?;
        Ok(self.entries.remove(position))
    }
}
