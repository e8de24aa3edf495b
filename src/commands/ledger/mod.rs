//! Implementation of the `agentdex ledger` commands.
//!
//! - `record`: append a consolidation, optionally archiving the originals
//! - `list`: show recorded consolidations
//! - `rollback`: print the reversal plan, optionally carrying it out
//!
//! `record --apply` saves the entry before moving anything, and undoes the
//! moves (and the entry) if one fails. `rollback --apply` drops the entry only
//! after every move succeeds; re-running an interrupted rollback skips the
//! steps already done.


use super::{load_corpus, print_json};
use crate::cli::{GlobalArgs, LedgerAction, LedgerCommand, LedgerRecordArgs, LedgerRollbackArgs};
use crate::error::{DexError, Result};
use crate::events::{Event, EventAction, append_event, append_event_best_effort};
use crate::context::CorpusContext;
use crate::executor::{self, ExecutionReport};
use crate::ledger::{ArchivalEntry, Ledger, RollbackPlan, plan_rollback};
use crate::registry::Registry;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Dispatch ledger subcommands.
pub fn dispatch_ledger(global: &GlobalArgs, ledger_cmd: LedgerCommand) -> Result<()> {
    match ledger_cmd.action {
        LedgerAction::Record(args) => cmd_ledger_record(global, args),
        LedgerAction::List => cmd_ledger_list(global),
        LedgerAction::Rollback(args) => cmd_ledger_rollback(global, args),
    }
}

/// Execute `agentdex ledger record`.
pub fn cmd_ledger_record(global: &GlobalArgs, args: LedgerRecordArgs) -> Result<()> {
    let (ctx, registry) = load_corpus(global)?;

    if !registry.contains(args.active.trim()) {
        return Err(DexError::agent_not_found(args.active.trim()));
    }
    if let Some(backup) = &args.backup
        && !ctx.resolve_path(backup).is_file()
    {
        return Err(DexError::UserError(format!(
            "backup file '{}' does not exist",
            backup.display()
        )));
    }

    let mut ledger = Ledger::load(&ctx.ledger_file)?;
    let entry = {
        let entry = ledger.record_consolidation(
            &args.active,
            &args.archived,
            args.backup.clone(),
            &args.reason,
        )?;
        if args.apply {
            entry.origins = origins_of(&ctx, &registry, &entry.archived)?;
        }
        entry.clone()
    };

    // Saved first, so the moves below are never untracked.
    ledger.save(&ctx.ledger_file)?;

    if args.apply {
        let report = archive_originals(&ctx, &registry, &mut ledger, &entry)?;
        for file_move in &report.applied {
            println!(
                "Archived: {} -> {}",
                ctx.display_path(&file_move.from),
                ctx.display_path(&file_move.to)
            );
        }
    }

    let event = Event::new(EventAction::Consolidate)
        .with_agent(&entry.active)
        .with_details(json!({
            "archived": entry.archived,
            "backup_path": entry.backup_path,
            "reason": entry.reason,
            "applied": args.apply,
        }));
    append_event(&ctx.events_file, &event)?;

    if global.json {
        return print_json(&entry);
    }

    println!(
        "Recorded consolidation of {} into '{}'.",
        entry.archived.join(", "),
        entry.active
    );
    if !args.apply {
        println!("The archived agents were not moved; pass --apply to move them into cold storage.");
    }
    Ok(())
}

/// Root-relative locations of archived records that live outside their
/// default active slot. Every name must be registered.
fn origins_of(
    ctx: &CorpusContext,
    registry: &Registry,
    archived: &[String],
) -> Result<BTreeMap<String, PathBuf>> {
    let mut origins = BTreeMap::new();
    for name in archived {
        let record = registry.get(name)?;
        if let Some(source) = &record.source
            && *source != ctx.active_path(name)
        {
            let relative = source.strip_prefix(&ctx.root).unwrap_or(source);
            origins.insert(name.clone(), relative.to_path_buf());
        }
    }
    Ok(origins)
}

/// Move a recorded consolidation's originals into the archive directory.
///
/// On failure the applied moves are undone and the entry is dropped from the
/// saved ledger. If undoing fails too, the entry stays so the moves can be
/// rolled back.
fn archive_originals(
    ctx: &CorpusContext,
    registry: &Registry,
    ledger: &mut Ledger,
    entry: &ArchivalEntry,
) -> Result<ExecutionReport> {
    let mut report = ExecutionReport::default();
    let Err(err) = executor::apply_consolidation(ctx, registry, entry, &mut report) else {
        return Ok(report);
    };

    if let Err(undo_err) = executor::revert_moves(&ctx.root, &report.applied) {
        return Err(DexError::UserError(format!(
            "{}\n{}\nthe ledger entry was kept; run `agentdex ledger rollback {} --apply` \
             to restore the archived agents",
            err, undo_err, entry.active
        )));
    }
    ledger.remove_entry(entry)?;
    ledger.save(&ctx.ledger_file)?;
    Err(err)
}

/// Plan the rollback for `active`, resuming one that already parked the
/// consolidated agent.
fn plan_for(
    ctx: &CorpusContext,
    registry: &Registry,
    ledger: &Ledger,
    active: &str,
) -> Result<RollbackPlan> {
    match ledger.plan_rollback_for(active, registry) {
        Err(DexError::NotFound { kind: "agent", .. })
            if ctx.rolled_back_path(active).exists() =>
        {
            let entry = ledger.latest_for(active).ok_or_else(|| DexError::NotFound {
                kind: "ledger entry",
                name: active.to_string(),
            })?;
            tracing::info!(agent = %active, "resuming an interrupted rollback");
            Ok(plan_rollback(entry))
        }
        planned => planned,
    }
}

/// Execute `agentdex ledger list`.
pub fn cmd_ledger_list(global: &GlobalArgs) -> Result<()> {
    let ctx = crate::context::CorpusContext::resolve(global.root.as_deref())?;
    let ledger = Ledger::load(&ctx.ledger_file)?;

    if global.json {
        return print_json(ledger.entries());
    }

    if ledger.entries().is_empty() {
        println!("No consolidations recorded.");
        return Ok(());
    }

    for entry in ledger.entries() {
        println!(
            "{}  {} <- {}",
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            entry.active,
            entry.archived.join(", ")
        );
        if !entry.reason.is_empty() {
            println!("    reason: {}", entry.reason);
        }
        if let Some(backup) = &entry.backup_path {
            println!("    backup: {}", backup.display());
        }
    }
    Ok(())
}

/// Execute `agentdex ledger rollback`.
pub fn cmd_ledger_rollback(global: &GlobalArgs, args: LedgerRollbackArgs) -> Result<()> {
    let (ctx, registry) = load_corpus(global)?;
    let mut ledger = Ledger::load(&ctx.ledger_file)?;
    let plan = plan_for(&ctx, &registry, &ledger, args.active.trim())?;
    let moves = executor::rollback_moves(&ctx, &registry, &plan);

    if !args.apply {
        if global.json {
            return print_json(&json!({ "plan": plan, "moves": moves, "applied": false }));
        }
        println!("Rollback plan for '{}':", plan.entry.active);
        for (i, file_move) in moves.iter().enumerate() {
            println!("  {}. {}", i + 1, file_move.description);
            println!(
                "     {} -> {}",
                ctx.display_path(&file_move.from),
                ctx.display_path(&file_move.to)
            );
        }
        println!();
        println!("Dry run: nothing was moved. Re-run with --apply to execute.");
        return Ok(());
    }

    let report = executor::execute_moves(&ctx.root, &moves)?;
    ledger.apply_rollback(&plan)?;
    ledger.save(&ctx.ledger_file)?;

    let event = Event::new(EventAction::Rollback)
        .with_agent(&plan.entry.active)
        .with_details(json!({
            "restored": plan.entry.archived,
            "steps": report.applied.len(),
            "recorded_at": plan.entry.recorded_at,
        }));
    append_event_best_effort(&ctx.events_file, &event);

    if global.json {
        return print_json(&json!({ "plan": plan, "moves": report.applied, "applied": true }));
    }

    for file_move in &report.skipped {
        println!("Already done: {}", file_move.description);
    }
    for file_move in &report.applied {
        println!("Done: {}", file_move.description);
    }
    println!();
    println!(
        "Rolled back '{}': {} agent(s) restored.",
        plan.entry.active,
        plan.restore_count()
    );
    Ok(())
}
