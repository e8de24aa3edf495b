//! Trigger phrase matching.
//!
//! An utterance matches a trigger phrase when, after lowercasing and
//! whitespace normalization, it contains the whole phrase ("so what happened
//! on slack? today" matches "what happened on Slack?"). A fragment of a phrase
//! is not enough: "slack" alone matches nothing.

use crate::record::AgentRecord;

/// A record whose triggers matched an utterance.
#[derive(Debug, Clone)]
pub struct TriggerMatch<'a> {
    pub record: &'a AgentRecord,
    /// The declared phrases that matched, in declaration order.
    pub phrases: Vec<&'a str>,
}

/// Lowercase, collapse whitespace runs, and trim.
pub fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `utterance` contains `phrase`.
pub fn phrase_matches(phrase: &str, utterance: &str) -> bool {
    let phrase = normalize_phrase(phrase);
    let utterance = normalize_phrase(utterance);
    if phrase.is_empty() || utterance.is_empty() {
        return false;
    }
    utterance.contains(&phrase)
}

pub(super) fn find_matches<'a>(
    records: Vec<&'a AgentRecord>,
    utterance: &str,
) -> Vec<TriggerMatch<'a>> {
    if normalize_phrase(utterance).is_empty() {
        return Vec::new();
    }

    records
        .into_iter()
        .filter_map(|record| {
            let phrases: Vec<&str> = record
                .triggers()
                .iter()
                .map(String::as_str)
                .filter(|p| phrase_matches(p, utterance))
                .collect();
            (!phrases.is_empty()).then_some(TriggerMatch { record, phrases })
        })
        .collect()
}
