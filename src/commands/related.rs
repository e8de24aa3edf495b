//! Implementation of the `agentdex related` command.

use super::{load_corpus, print_json};
use crate::cli::{GlobalArgs, RelatedArgs};
use crate::error::Result;
use crate::related::related_to;
use serde_json::json;

/// Execute the `agentdex related` command.
///
/// Unknown targets are reported as warnings; only an unknown source agent is
/// an error.
pub fn cmd_related(global: &GlobalArgs, args: RelatedArgs) -> Result<()> {
    let (_ctx, registry) = load_corpus(global)?;
    let related = related_to(&registry, &args.name)?;

    if global.json {
        let resolved: Vec<_> = related
            .resolved
            .iter()
            .map(|(record, reason)| json!({ "name": record.name(), "reason": reason }))
            .collect();
        return print_json(&json!({
            "agent": args.name,
            "resolved": resolved,
            "warnings": related.warnings,
        }));
    }

    if related.resolved.is_empty() && related.warnings.is_empty() {
        println!("{} declares no related agents", args.name);
        return Ok(());
    }

    for (record, reason) in &related.resolved {
        if reason.is_empty() {
            println!("{}", record.name());
        } else {
            println!("{}  {}", record.name(), reason);
        }
    }
    for warning in &related.warnings {
        eprintln!("warning: {}", warning);
    }

    Ok(())
}
