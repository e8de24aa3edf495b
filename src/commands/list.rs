//! Implementation of the `agentdex list` command.

use super::{load_corpus, print_json};
use crate::cli::GlobalArgs;
use crate::error::Result;
use serde_json::json;

/// Execute the `agentdex list` command.
pub fn cmd_list(global: &GlobalArgs) -> Result<()> {
    let (ctx, registry) = load_corpus(global)?;
    let records = registry.all();

    if global.json {
        let rows: Vec<_> = records
            .iter()
            .map(|r| {
                json!({
                    "name": r.name(),
                    "description": r.description(),
                    "model": r.metadata.model,
                    "tools": r.tools(),
                    "triggers": r.triggers(),
                    "source": r.source.as_deref().map(|p| ctx.display_path(p)),
                })
            })
            .collect();
        return print_json(&rows);
    }

    if records.is_empty() {
        println!("No agents found in {}", ctx.display_path(&ctx.agents_dir));
        return Ok(());
    }

    let width = records.iter().map(|r| r.name().len()).max().unwrap_or(0);
    for record in &records {
        let model = record
            .model_tier()
            .map(|tier| tier.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<width$}  {:<8}  {:>2} tools  {}",
            record.name(),
            model,
            record.tools().len(),
            first_line(record.description()),
            width = width
        );
    }

    let report = registry.load_report();
    println!();
    println!(
        "{} agent(s), {} inactive document(s), {} skipped",
        report.loaded,
        report.inactive,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!(
            "  skipped {}: {}",
            ctx.display_path(&skipped.path),
            skipped.message
        );
    }

    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
