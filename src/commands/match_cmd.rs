//! Implementation of the `agentdex match` command.

use super::{load_corpus, print_json};
use crate::cli::{GlobalArgs, MatchArgs};
use crate::error::Result;
use serde_json::json;

/// Execute the `agentdex match` command.
///
/// Every matching agent is listed; choosing among them is left to the caller.
pub fn cmd_match(global: &GlobalArgs, args: MatchArgs) -> Result<()> {
    let (_ctx, registry) = load_corpus(global)?;
    let utterance = args.joined();
    let matches = registry.find_by_trigger(&utterance);

    if global.json {
        let rows: Vec<_> = matches
            .iter()
            .map(|m| json!({ "name": m.record.name(), "phrases": m.phrases }))
            .collect();
        return print_json(&rows);
    }

    if matches.is_empty() {
        println!("No agent triggers match \"{}\"", utterance);
        return Ok(());
    }

    for m in &matches {
        println!("{}", m.record.name());
        for phrase in &m.phrases {
            println!("  matched: {}", phrase);
        }
    }

    Ok(())
}
