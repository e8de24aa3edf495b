//! Implementation of the `agentdex init` command.
//!
//! Creates the corpus layout in the root directory:
//! 1. `agentdex.yaml` with default settings (kept unless `--force`)
//! 2. the agents directory
//! 3. the archive directory
//!
//! Running it again is harmless: existing directories and agents are untouched.

use crate::cli::{GlobalArgs, InitArgs};
use crate::config::Config;
use crate::context::CorpusContext;
use crate::error::{DexError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::atomic_write_file;
use serde_json::json;
use std::path::{Path, PathBuf};

/// What `init` did.
#[derive(Debug)]
pub(crate) struct InitOutcome {
    pub ctx: CorpusContext,
    pub config_written: bool,
    pub created_dirs: Vec<PathBuf>,
}

/// Lay out a corpus at `root`.
pub(crate) fn init_corpus(root: &Path, force: bool) -> Result<InitOutcome> {
    if !root.is_dir() {
        return Err(DexError::UserError(format!(
            "corpus root '{}' is not a directory",
            root.display()
        )));
    }

    // An existing config decides the layout unless it is being replaced.
    let config_path = root.join(crate::config::CONFIG_FILE_NAME);
    let config_written = force || !config_path.exists();
    if config_written {
        atomic_write_file(&config_path, &Config::default().to_yaml()?)?;
    }

    let ctx = CorpusContext::resolve_from(root)?;
    let mut created_dirs = Vec::new();

    for dir in [&ctx.agents_dir, &ctx.archive_dir] {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                DexError::UserError(format!(
                    "failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
            created_dirs.push(dir.clone());
        }
    }

    let event = Event::new(EventAction::Init).with_details(json!({
        "config_written": config_written,
        "agents_dir": ctx.config.agents_dir,
        "archive_dir": ctx.config.archive_dir,
    }));
    append_event(&ctx.events_file, &event)?;

    Ok(InitOutcome {
        ctx,
        config_written,
        created_dirs,
    })
}

/// Execute the `agentdex init` command.
pub fn cmd_init(global: &GlobalArgs, args: InitArgs) -> Result<()> {
    let root = match &global.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().map_err(|e| {
            DexError::UserError(format!("failed to get current working directory: {}", e))
        })?,
    };

    let outcome = init_corpus(&root, args.force)?;

    println!("Initialized agent corpus in {}", outcome.ctx.root.display());
    println!();
    if outcome.config_written {
        println!("Wrote {}", crate::config::CONFIG_FILE_NAME);
    } else {
        println!(
            "Kept existing {} (use --force to overwrite)",
            crate::config::CONFIG_FILE_NAME
        );
    }
    for dir in &outcome.created_dirs {
        println!("Created {}/", outcome.ctx.display_path(dir));
    }
    println!();
    println!("Add agent definitions as Markdown files, then run `agentdex lint`.");

    Ok(())
}
