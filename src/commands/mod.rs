//! Command implementations for agentdex.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the corpus loading they share.

mod init;
mod ledger;
mod lint;
mod list;
mod match_cmd;
mod related;
mod show;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Command, GlobalArgs};
use crate::context::CorpusContext;
use crate::error::{DexError, Result};
use crate::registry::Registry;
use crate::store::DocumentStore;
use serde::Serialize;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Command::Init(args) => init::cmd_init(&global, args),
        Command::List => list::cmd_list(&global),
        Command::Show(args) => show::cmd_show(&global, args),
        Command::Match(args) => match_cmd::cmd_match(&global, args),
        Command::Related(args) => related::cmd_related(&global, args),
        Command::Lint => lint::cmd_lint(&global),
        Command::Ledger(ledger_cmd) => ledger::dispatch_ledger(&global, ledger_cmd),
    }
}

/// Resolve the corpus and build its registry.
pub(crate) fn load_corpus(global: &GlobalArgs) -> Result<(CorpusContext, Registry)> {
    let ctx = CorpusContext::resolve(global.root.as_deref())?;
    let registry = DocumentStore::from_context(&ctx)?.load_registry()?;
    Ok((ctx, registry))
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DexError::UserError(format!("failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
