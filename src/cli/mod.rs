//! CLI argument parsing for agentdex.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// agentdex: registry, router and linter for Markdown agent definitions.
///
/// A corpus is a directory of Markdown documents with YAML front-matter:
/// - each document defines one agent (name, triggers, related agents, ...)
/// - archived agents live in cold storage and are never loaded
/// - consolidations are recorded in a ledger so they can be rolled back
#[derive(Parser, Debug)]
#[command(name = "agentdex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Corpus root (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands for agentdex.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a corpus in the root directory.
    ///
    /// Writes a default agentdex.yaml and creates the agents and archive
    /// directories.
    Init(InitArgs),

    /// List active agents.
    #[command(alias = "ls")]
    List,

    /// Show one agent's metadata and body.
    Show(ShowArgs),

    /// Find agents whose trigger phrases match an utterance.
    Match(MatchArgs),

    /// Show an agent's related agents, flagging unknown references.
    Related(RelatedArgs),

    /// Check the corpus for dangling references, orphans and style problems.
    ///
    /// Exits with code 2 when issues are found.
    Lint,

    /// Archival ledger commands.
    ///
    /// Record consolidations and roll them back.
    Ledger(LedgerCommand),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing agentdex.yaml.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Agent name, or a path to an agent document.
    pub name: String,

    /// Print the document re-rendered from its parsed front-matter.
    #[arg(long)]
    pub markdown: bool,
}

/// Arguments for the `match` command.
#[derive(Parser, Debug)]
pub struct MatchArgs {
    /// Utterance to route (multiple words are joined with spaces).
    #[arg(required = true, num_args = 1..)]
    pub utterance: Vec<String>,
}

impl MatchArgs {
    pub fn joined(&self) -> String {
        self.utterance.join(" ")
    }
}

/// Arguments for the `related` command.
#[derive(Parser, Debug)]
pub struct RelatedArgs {
    /// Agent name.
    pub name: String,
}

/// Ledger subcommands.
#[derive(Parser, Debug)]
pub struct LedgerCommand {
    #[command(subcommand)]
    pub action: LedgerAction,
}

/// Available ledger actions.
#[derive(Subcommand, Debug)]
pub enum LedgerAction {
    /// Record a consolidation of several agents into one.
    Record(LedgerRecordArgs),

    /// List recorded consolidations.
    List,

    /// Plan (and optionally apply) the rollback of a consolidation.
    Rollback(LedgerRollbackArgs),
}

/// Arguments for `ledger record`.
#[derive(Parser, Debug)]
pub struct LedgerRecordArgs {
    /// Agent that supersedes the originals.
    #[arg(long)]
    pub active: String,

    /// Original agents moved to cold storage.
    #[arg(long, value_delimiter = ',', required = true)]
    pub archived: Vec<String>,

    /// Renamed backup copy of the active agent, relative to the corpus root.
    #[arg(long)]
    pub backup: Option<PathBuf>,

    /// Why the agents were consolidated.
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Also move the archived agents into the archive directory.
    #[arg(long)]
    pub apply: bool,
}

/// Arguments for `ledger rollback`.
#[derive(Parser, Debug)]
pub struct LedgerRollbackArgs {
    /// Consolidated agent whose latest consolidation is undone.
    pub active: String,

    /// Perform the file moves and remove the ledger entry.
    ///
    /// Without this flag the plan is only printed.
    #[arg(long)]
    pub apply: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
