//! Rollback and consolidation executor.
//!
//! Turns ledger plans into file moves. Mapping a plan to moves is pure
//! ([`rollback_moves`], [`consolidation_moves`]); executing the moves is the
//! only place agent files are touched. Nothing is ever deleted: records leave
//! the active set by moving into the archive directory.
//!
//! A move whose source is gone and whose destination exists counts as already
//! done and is skipped, so an interrupted run can be repeated to finish.

use crate::context::CorpusContext;
use crate::error::{DexError, Result};
use crate::fs::move_file_no_clobber;
use crate::ledger::{ArchivalEntry, RollbackPlan, RollbackStep};
use crate::registry::Registry;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One file move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMove {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Human-readable step this move carries out.
    pub description: String,
}

impl fmt::Display for FileMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.description,
            self.from.display(),
            self.to.display()
        )
    }
}

impl FileMove {
    fn is_done(&self) -> bool {
        !self.from.exists() && self.to.exists()
    }
}

/// Moves actually performed.
#[derive(Debug, Default, Serialize)]
pub struct ExecutionReport {
    pub applied: Vec<FileMove>,
    /// Moves found already done, typically by an earlier interrupted run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<FileMove>,
}

/// Where the registered file for `name` lives, falling back to its active slot.
fn current_path(ctx: &CorpusContext, registry: &Registry, name: &str) -> PathBuf {
    registry
        .get(name)
        .ok()
        .and_then(|record| record.source.clone())
        .unwrap_or_else(|| ctx.active_path(name))
}

/// File moves that carry out a rollback plan, in plan order.
pub fn rollback_moves(
    ctx: &CorpusContext,
    registry: &Registry,
    plan: &RollbackPlan,
) -> Vec<FileMove> {
    plan.steps
        .iter()
        .map(|step| {
            let (from, to) = match step {
                RollbackStep::Restore { name } => {
                    let to = match plan.entry.origins.get(name) {
                        Some(origin) => ctx.resolve_path(origin),
                        None => ctx.active_path(name),
                    };
                    (ctx.archived_path(name), to)
                }
                RollbackStep::RemoveActive { name } => (
                    current_path(ctx, registry, name),
                    ctx.rolled_back_path(name),
                ),
                RollbackStep::RestoreBackup { name, backup_path } => {
                    (ctx.resolve_path(backup_path), ctx.active_path(name))
                }
            };
            FileMove {
                from,
                to,
                description: step.to_string(),
            }
        })
        .collect()
}

/// File moves that archive the originals of a consolidation.
pub fn consolidation_moves(
    ctx: &CorpusContext,
    registry: &Registry,
    entry: &ArchivalEntry,
) -> Vec<FileMove> {
    entry
        .archived
        .iter()
        .map(|name| FileMove {
            from: current_path(ctx, registry, name),
            to: ctx.archived_path(name),
            description: format!("archive agent '{}'", name),
        })
        .collect()
}

/// Perform `moves` in order, stopping at the first failure.
///
/// Destinations are never overwritten.
pub fn execute_moves(root: &Path, moves: &[FileMove]) -> Result<ExecutionReport> {
    let mut report = ExecutionReport::default();
    run_moves(root, moves, &mut report)?;
    Ok(report)
}

/// Like [`execute_moves`], but leaves what was done in `report` when a move
/// fails so the caller can undo it.
fn run_moves(root: &Path, moves: &[FileMove], report: &mut ExecutionReport) -> Result<()> {
    for (index, file_move) in moves.iter().enumerate() {
        if file_move.is_done() {
            tracing::info!(step = index + 1, "already done: {}", file_move.description);
            report.skipped.push(file_move.clone());
            continue;
        }
        if let Err(e) = move_file_no_clobber(&file_move.from, &file_move.to) {
            return Err(DexError::UserError(format!(
                "stopped at step {} of {} ({}): {}\n{} step(s) were applied before the failure",
                index + 1,
                moves.len(),
                file_move.description,
                e,
                report.applied.len()
            )));
        }
        tracing::info!(
            from = %file_move.from.strip_prefix(root).unwrap_or(&file_move.from).display(),
            to = %file_move.to.strip_prefix(root).unwrap_or(&file_move.to).display(),
            "{}",
            file_move.description
        );
        report.applied.push(file_move.clone());
    }

    Ok(())
}

/// Undo applied moves, newest first.
pub fn revert_moves(root: &Path, applied: &[FileMove]) -> Result<()> {
    for file_move in applied.iter().rev() {
        move_file_no_clobber(&file_move.to, &file_move.from).map_err(|e| {
            DexError::UserError(format!(
                "failed to undo '{}': {}",
                file_move.description, e
            ))
        })?;
        tracing::info!(
            path = %file_move.from.strip_prefix(root).unwrap_or(&file_move.from).display(),
            "undone: {}",
            file_move.description
        );
    }
    Ok(())
}

/// Move a consolidation's originals into the archive directory. On failure,
/// `report` holds the moves applied so far.
pub fn apply_consolidation(
    ctx: &CorpusContext,
    registry: &Registry,
    entry: &ArchivalEntry,
    report: &mut ExecutionReport,
) -> Result<()> {
    run_moves(&ctx.root, &consolidation_moves(ctx, registry, entry), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Ledger, plan_rollback};
    use crate::store::DocumentStore;
    use crate::test_support::{agent_doc, create_test_corpus, write_agent};
    use tempfile::TempDir;

    fn setup() -> (TempDir, CorpusContext) {
        let temp = create_test_corpus();
        let ctx = CorpusContext::resolve_from(temp.path()).unwrap();
        (temp, ctx)
    }

    fn load(ctx: &CorpusContext) -> Registry {
        DocumentStore::from_context(ctx)
            .unwrap()
            .load_registry()
            .unwrap()
    }

    fn execute_rollback(
        ctx: &CorpusContext,
        registry: &Registry,
        plan: &RollbackPlan,
    ) -> Result<ExecutionReport> {
        execute_moves(&ctx.root, &rollback_moves(ctx, registry, plan))
    }

    fn consolidate(
        ctx: &CorpusContext,
        registry: &Registry,
        entry: &ArchivalEntry,
    ) -> Result<ExecutionReport> {
        let mut report = ExecutionReport::default();
        apply_consolidation(ctx, registry, entry, &mut report)?;
        Ok(report)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_consolidate_then_rollback_restores_corpus() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "hubspot-api-crm.md", &agent_doc("hubspot-api-crm", &[], &[]));
        write_agent(
            temp.path(),
            "hubspot-api-automation.md",
            &agent_doc("hubspot-api-automation", &[], &[]),
        );
        write_agent(
            temp.path(),
            "hubspot-api-crm-all.md",
            &agent_doc("hubspot-api-crm-all", &[], &[]),
        );

        let mut ledger = Ledger::new();
        let entry = ledger
            .record_consolidation(
                "hubspot-api-crm-all",
                &names(&["hubspot-api-crm", "hubspot-api-automation"]),
                None,
                "duplicate",
            )
            .unwrap()
            .clone();

        let registry = load(&ctx);
        let report = consolidate(&ctx, &registry, &entry).unwrap();
        assert_eq!(report.applied.len(), 2);

        let registry = load(&ctx);
        assert_eq!(registry.names(), vec!["hubspot-api-crm-all"]);

        let plan = ledger
            .plan_rollback_for("hubspot-api-crm-all", &registry)
            .unwrap();
        let report = execute_rollback(&ctx, &registry, &plan).unwrap();
        assert_eq!(report.applied.len(), 3);
        ledger.apply_rollback(&plan).unwrap();

        let registry = load(&ctx);
        assert_eq!(
            registry.names(),
            vec!["hubspot-api-automation", "hubspot-api-crm"]
        );
        assert!(ctx.rolled_back_path("hubspot-api-crm-all").exists());
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn test_rollback_restores_backup_into_active_slot() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "erd-builder.md", &agent_doc("erd-builder", &["slim"], &[]));
        write_agent(
            temp.path(),
            "erd-builder.bak.md",
            &agent_doc("erd-builder", &["full"], &[]),
        );
        write_agent(
            temp.path(),
            "archive/erd-builder-legacy.md",
            &agent_doc("erd-builder-legacy", &[], &[]),
        );

        let entry = ArchivalEntry {
            active: "erd-builder".to_string(),
            archived: names(&["erd-builder-legacy"]),
            backup_path: Some(PathBuf::from("agents/erd-builder.bak.md")),
            reason: "slimmed".to_string(),
            recorded_at: chrono::Utc::now(),
            origins: Default::default(),
        };
        let registry = load(&ctx);
        execute_rollback(&ctx, &registry, &plan_rollback(&entry)).unwrap();

        let registry = load(&ctx);
        assert_eq!(registry.get("erd-builder").unwrap().triggers(), ["full"]);
        assert!(registry.contains("erd-builder-legacy"));
        assert!(!temp.path().join("agents/erd-builder.bak.md").exists());
    }

    #[test]
    fn test_restore_refuses_to_overwrite_and_stops() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "a.md", &agent_doc("a", &[], &[]));
        write_agent(temp.path(), "b.md", &agent_doc("b", &[], &[]));
        write_agent(temp.path(), "archive/b.md", &agent_doc("b", &[], &[]));

        let entry = ArchivalEntry {
            active: "a".to_string(),
            archived: names(&["b"]),
            backup_path: None,
            reason: String::new(),
            recorded_at: chrono::Utc::now(),
            origins: Default::default(),
        };
        let registry = load(&ctx);
        let err = execute_rollback(&ctx, &registry, &plan_rollback(&entry)).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("stopped at step 1 of 2"));
        assert!(message.contains("0 step(s) were applied"));
        // The consolidated agent was not touched.
        assert!(temp.path().join("agents/a.md").exists());
    }

    #[test]
    fn test_moves_follow_registered_source() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "team/nested-agent.md", &agent_doc("nested-agent", &[], &[]));
        let registry = load(&ctx);

        let entry = ArchivalEntry {
            active: "other".to_string(),
            archived: names(&["nested-agent"]),
            backup_path: None,
            reason: String::new(),
            recorded_at: chrono::Utc::now(),
            origins: Default::default(),
        };
        let moves = consolidation_moves(&ctx, &registry, &entry);

        assert_eq!(moves[0].from, ctx.agents_dir.join("team/nested-agent.md"));
        assert_eq!(moves[0].to, ctx.archived_path("nested-agent"));
    }

    fn entry(active: &str, archived: &[&str]) -> ArchivalEntry {
        ArchivalEntry {
            active: active.to_string(),
            archived: names(archived),
            backup_path: None,
            reason: String::new(),
            recorded_at: chrono::Utc::now(),
            origins: Default::default(),
        }
    }

    #[test]
    fn test_interrupted_rollback_finishes_on_rerun() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "merged.md", &agent_doc("merged", &[], &[]));
        write_agent(temp.path(), "archive/old-one.md", &agent_doc("old-one", &[], &[]));
        write_agent(temp.path(), "archive/old-two.md", &agent_doc("old-two", &[], &[]));
        let stray = write_agent(temp.path(), "old-two.md", &agent_doc("old-two", &[], &[]));

        let plan = plan_rollback(&entry("merged", &["old-one", "old-two"]));
        let err = execute_rollback(&ctx, &load(&ctx), &plan).unwrap_err();
        assert!(err.to_string().contains("stopped at step 2 of 3"));
        assert!(err.to_string().contains("1 step(s) were applied"));

        std::fs::remove_file(stray).unwrap();
        let report = execute_rollback(&ctx, &load(&ctx), &plan).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.applied.len(), 2);
        assert_eq!(load(&ctx).names(), vec!["old-one", "old-two"]);
        assert!(ctx.rolled_back_path("merged").exists());
    }

    #[test]
    fn test_rerun_after_remove_active_restores_backup() {
        let (temp, ctx) = setup();
        // Restore and RemoveActive already happened; only the backup is left.
        write_agent(temp.path(), "legacy.md", &agent_doc("legacy", &[], &[]));
        write_agent(
            temp.path(),
            "archive/slim.rolled-back.md",
            &agent_doc("slim", &["slim"], &[]),
        );
        write_agent(temp.path(), "slim.bak.md", &agent_doc("slim", &["full"], &[]));

        let mut slimmed = entry("slim", &["legacy"]);
        slimmed.backup_path = Some(PathBuf::from("agents/slim.bak.md"));
        let report = execute_rollback(&ctx, &load(&ctx), &plan_rollback(&slimmed)).unwrap();

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.applied.len(), 1);
        assert_eq!(load(&ctx).get("slim").unwrap().triggers(), ["full"]);
    }

    #[test]
    fn test_restore_returns_record_to_its_origin() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "other.md", &agent_doc("other", &[], &[]));
        write_agent(temp.path(), "team/nested-agent.md", &agent_doc("nested-agent", &[], &[]));

        let mut nested = entry("other", &["nested-agent"]);
        nested.origins.insert(
            "nested-agent".to_string(),
            PathBuf::from("agents/team/nested-agent.md"),
        );
        consolidate(&ctx, &load(&ctx), &nested).unwrap();
        assert!(ctx.archived_path("nested-agent").exists());

        execute_rollback(&ctx, &load(&ctx), &plan_rollback(&nested)).unwrap();

        assert!(ctx.agents_dir.join("team/nested-agent.md").exists());
        assert!(!ctx.active_path("nested-agent").exists());
    }

    #[test]
    fn test_revert_moves_undoes_partial_run() {
        let (temp, ctx) = setup();
        write_agent(temp.path(), "first.md", &agent_doc("first", &[], &[]));
        write_agent(temp.path(), "second.md", &agent_doc("second", &[], &[]));
        write_agent(temp.path(), "archive/second.md", &agent_doc("second", &[], &[]));

        let merged = entry("merged", &["first", "second"]);
        let mut report = ExecutionReport::default();
        assert!(apply_consolidation(&ctx, &load(&ctx), &merged, &mut report).is_err());
        assert_eq!(report.applied.len(), 1);
        assert!(!ctx.active_path("first").exists());

        revert_moves(&ctx.root, &report.applied).unwrap();

        assert!(ctx.active_path("first").exists());
        assert!(!ctx.archived_path("first").exists());
    }
}
