//! Rollback planning.
//!
//! A plan is a list of steps for an external executor. Planning never touches
//! the filesystem.

use super::ArchivalEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One reversal step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RollbackStep {
    /// Move an archived record back to active status.
    Restore { name: String },
    /// Take the consolidated record out of the active set.
    RemoveActive { name: String },
    /// Put the backup copy back into the active record's slot.
    RestoreBackup { name: String, backup_path: PathBuf },
}

impl fmt::Display for RollbackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackStep::Restore { name } => write!(f, "restore archived agent '{}'", name),
            RollbackStep::RemoveActive { name } => {
                write!(f, "remove consolidated agent '{}'", name)
            }
            RollbackStep::RestoreBackup { name, backup_path } => write!(
                f,
                "restore backup '{}' as agent '{}'",
                backup_path.display(),
                name
            ),
        }
    }
}

/// Ordered steps that undo one consolidation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollbackPlan {
    /// The ledger entry being undone.
    pub entry: ArchivalEntry,
    pub steps: Vec<RollbackStep>,
}

impl RollbackPlan {
    pub fn restore_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, RollbackStep::Restore { .. }))
            .count()
    }
}

/// Plan the reversal of a consolidation.
///
/// Archived records are restored first (in recorded order) so the corpus is
/// never left without them, then the consolidated record is removed, then
/// the backup (if any) takes its slot.
pub fn plan_rollback(entry: &ArchivalEntry) -> RollbackPlan {
    let mut steps: Vec<RollbackStep> = entry
        .archived
        .iter()
        .map(|name| RollbackStep::Restore { name: name.clone() })
        .collect();

    steps.push(RollbackStep::RemoveActive {
        name: entry.active.clone(),
    });

    if let Some(backup_path) = &entry.backup_path {
        steps.push(RollbackStep::RestoreBackup {
            name: entry.active.clone(),
            backup_path: backup_path.clone(),
        });
    }

    RollbackPlan {
        entry: entry.clone(),
        steps,
    }
}
