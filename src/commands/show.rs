//! Implementation of the `agentdex show` command.
//!
//! Displays an agent's metadata, resolved related agents and body. The
//! argument is an agent name, or a path to a document (parsed on its own,
//! without building the registry).

use super::{load_corpus, print_json};
use crate::cli::{GlobalArgs, ShowArgs};
use crate::context::CorpusContext;
use crate::error::Result;
use crate::record::AgentRecord;
use crate::registry::Registry;
use crate::related::{self, RelatedTarget};
use serde_json::json;
use std::path::Path;

/// Execute the `agentdex show` command.
pub fn cmd_show(global: &GlobalArgs, args: ShowArgs) -> Result<()> {
    let as_path = Path::new(&args.name);
    if args.name.ends_with(".md") && as_path.is_file() {
        let record = AgentRecord::load(as_path)?;
        return render(global, &args, &record, None);
    }

    let (ctx, registry) = load_corpus(global)?;
    let record = registry.get(&args.name)?;
    render(global, &args, record, Some((&ctx, &registry)))
}

fn render(
    global: &GlobalArgs,
    args: &ShowArgs,
    record: &AgentRecord,
    corpus: Option<(&CorpusContext, &Registry)>,
) -> Result<()> {
    if args.markdown {
        print!("{}", record.to_markdown()?);
        return Ok(());
    }

    let source = record.source.as_deref().map(|p| match corpus {
        Some((ctx, _)) => ctx.display_path(p),
        None => p.display().to_string(),
    });

    if global.json {
        let related: Vec<_> = record
            .related_agents()
            .into_iter()
            .map(|r| {
                let known = corpus.is_some_and(|(_, registry)| registry.contains(&r.name));
                json!({ "name": r.name, "reason": r.reason, "known": known })
            })
            .collect();
        return print_json(&json!({
            "name": record.name(),
            "description": record.description(),
            "model": record.metadata.model,
            "model_tier": record.model_tier().map(|t| t.to_string()),
            "tools": record.tools(),
            "triggers": record.triggers(),
            "async": record.metadata.async_policy,
            "related_agents": related,
            "extra": record.metadata.extra,
            "source": source,
            "body": record.body,
        }));
    }

    println!("================================================================================");
    println!("{}", record.name());
    println!("================================================================================");
    println!();

    if !record.description().is_empty() {
        println!("Description: {}", record.description());
    }
    if let Some(tier) = record.model_tier() {
        println!("Model:       {}", tier);
    }
    if !record.tools().is_empty() {
        println!("Tools:       {}", record.tools().join(", "));
    }
    if let Some(policy) = &record.metadata.async_policy {
        println!("Async:       {}", policy.mode);
    }
    if let Some(source) = &source {
        println!("Source:      {}", source);
    }

    if !record.triggers().is_empty() {
        println!();
        println!("Triggers:");
        for trigger in record.triggers() {
            println!("  - {}", trigger);
        }
    }

    match corpus {
        Some((_, registry)) => {
            let edges = related::edges(registry, record);
            if !edges.is_empty() {
                println!();
                println!("Related agents:");
                for edge in edges {
                    match edge.target {
                        RelatedTarget::Resolved(target) => {
                            println!("  - {}  {}", target.name(), edge.reason)
                        }
                        RelatedTarget::Dangling(name) => {
                            println!("  - {}  {}  (unknown agent)", name, edge.reason)
                        }
                    }
                }
            }
        }
        None => {
            let related = record.related_agents();
            if !related.is_empty() {
                println!();
                println!("Related agents:");
                for r in related {
                    println!("  - {}  {}", r.name, r.reason);
                }
            }
        }
    }

    println!();
    println!("--------------------------------------------------------------------------------");
    print!("{}", record.body);
    if !record.body.ends_with('\n') {
        println!();
    }

    Ok(())
}
