//! Individual lint checks.

use super::{Issue, IssueSeverity, LintReport};
use crate::registry::{Registry, normalize_phrase};
use crate::related::{self, RelatedTarget};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static KEBAB_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid kebab-case regex"));

/// Report documents that were left out of the registry.
pub fn check_skipped_documents(registry: &Registry, report: &mut LintReport) {
    for skipped in &registry.load_report().skipped {
        let path = skipped.path.display().to_string();
        report.issues.push(
            Issue::new(
                IssueSeverity::Error,
                "parse_error",
                &path,
                &skipped.message,
            )
            .with_remediation("Fix the front-matter block; the agent is not loaded until then"),
        );
    }
}

/// Report related-agent edges whose target is not registered.
pub fn check_dangling_references(registry: &Registry, report: &mut LintReport) {
    for record in registry.all() {
        // `related_to` only fails for unknown sources, and `record` is registered.
        let Ok(related) = related::related_to(registry, record.name()) else {
            continue;
        };
        for warning in related.warnings {
            report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "dangling_reference",
                    &warning.from,
                    &warning.to_string(),
                )
                .with_remediation(&format!(
                    "Add an agent named '{}' or remove the reference",
                    warning.target
                )),
            );
            report.dangling.push(warning);
        }
    }
}

/// Report records that no other record references.
pub fn check_orphans(registry: &Registry, report: &mut LintReport) {
    let mut referenced: HashSet<&str> = HashSet::new();

    for record in registry.all() {
        for edge in related::edges(registry, record) {
            if let RelatedTarget::Resolved(target) = edge.target
                && target.name() != record.name()
            {
                referenced.insert(target.name());
            }
        }
    }

    for record in registry.all() {
        if referenced.contains(record.name()) {
            continue;
        }
        report.orphans.push(record.name().to_string());
        report.issues.push(
            Issue::new(
                IssueSeverity::Warning,
                "orphan",
                record.name(),
                &format!("'{}' is not referenced by any other agent", record.name()),
            )
            .with_remediation("Link it from a related agent's table, or archive it if unused"),
        );
    }
}

/// Report names that break the kebab-case convention.
pub fn check_name_style(registry: &Registry, report: &mut LintReport) {
    for record in registry.all() {
        if !KEBAB_REGEX.is_match(record.name()) {
            report.issues.push(Issue::new(
                IssueSeverity::Warning,
                "non_kebab_name",
                record.name(),
                &format!("name '{}' is not kebab-case", record.name()),
            ));
        }
    }
}

/// Report records whose file name differs from their declared name.
pub fn check_name_matches_file(registry: &Registry, report: &mut LintReport) {
    for record in registry.all() {
        let Some(stem) = record
            .source
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
        else {
            continue;
        };
        if stem != record.name() {
            report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "name_mismatch",
                    record.name(),
                    &format!(
                        "declared name '{}' differs from file name '{}'",
                        record.name(),
                        stem
                    ),
                )
                .with_remediation(&format!("Rename the file to {}.md", record.name())),
            );
        }
    }
}

/// Report records without a description.
pub fn check_missing_descriptions(registry: &Registry, report: &mut LintReport) {
    for record in registry.all() {
        if record.description().trim().is_empty() {
            report.issues.push(Issue::new(
                IssueSeverity::Warning,
                "missing_description",
                record.name(),
                &format!("'{}' has no description", record.name()),
            ));
        }
    }
}

/// Report trigger phrases claimed by more than one record.
pub fn check_duplicate_triggers(registry: &Registry, report: &mut LintReport) {
    let mut owners: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for record in registry.all() {
        let mut seen: HashSet<String> = HashSet::new();
        for phrase in record.triggers() {
            let normalized = normalize_phrase(phrase);
            if !normalized.is_empty() && seen.insert(normalized.clone()) {
                owners.entry(normalized).or_default().push(record.name());
            }
        }
    }

    for (phrase, names) in owners {
        if names.len() < 2 {
            continue;
        }
        report.issues.push(
            Issue::new(
                IssueSeverity::Warning,
                "duplicate_trigger",
                &phrase,
                &format!("trigger \"{}\" is declared by {}", phrase, names.join(", ")),
            )
            .with_remediation("Keep the phrase on one agent, or consolidate the agents"),
        );
    }
}
