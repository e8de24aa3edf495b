//! agentdex: registry, router and linter for Markdown agent definitions.
//!
//! A corpus of agent definitions is a directory of Markdown documents, each
//! with a YAML front-matter block. This crate loads them into a [`registry`],
//! routes utterances to agents by trigger phrase, resolves and lints the
//! related-agent graph, and keeps an archival [`ledger`] of consolidations
//! together with the plans that undo them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod executor;
pub mod exit_codes;
pub mod fs;
pub mod ledger;
pub mod lint;
pub mod logging;
pub mod record;
pub mod registry;
pub mod related;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
