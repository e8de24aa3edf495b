//! Corpus consistency checks.
//!
//! Lint is read-only. It reports:
//! - Documents that failed to parse during the load
//! - Dangling related-agent references (target not in the registry)
//! - Orphans (records no other record points at)
//! - Names that are not kebab-case, or that differ from the file name
//! - Records without a description
//! - Trigger phrases declared by more than one record
//!
//! Dangling references and orphans are maintenance signals, not corruption:
//! every other operation keeps working when they are present.

mod checks;
mod display;

use crate::related::DanglingReferenceWarning;
use crate::registry::Registry;
use serde::Serialize;

pub use checks::*;
pub use display::print_report;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Worth fixing, nothing is broken.
    Warning,
    /// A document is unusable until it is edited.
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A detected issue with a recommended fix.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    /// Category of the issue (e.g. `dangling_reference`).
    pub category: String,
    /// Agent name or document path the issue is about.
    pub subject: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Issue {
    pub fn new(severity: IssueSeverity, category: &str, subject: &str, description: &str) -> Self {
        Self {
            severity,
            category: category.to_string(),
            subject: subject.to_string(),
            description: description.to_string(),
            remediation: None,
        }
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }
}

/// Which optional checks to run.
#[derive(Debug, Clone, Copy)]
pub struct LintOptions {
    pub orphans: bool,
    pub dangling: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            orphans: true,
            dangling: true,
        }
    }
}

/// Result of a lint pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    /// Every unresolved related-agent edge.
    pub dangling: Vec<DanglingReferenceWarning>,
    /// Names of records with no inbound reference from another record.
    pub orphans: Vec<String>,
    /// All findings, including the two lists above.
    pub issues: Vec<Issue>,
}

impl LintReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    pub fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Run every check against the registry.
pub fn lint(registry: &Registry, options: LintOptions) -> LintReport {
    let mut report = LintReport::default();

    check_skipped_documents(registry, &mut report);
    if options.dangling {
        check_dangling_references(registry, &mut report);
    }
    if options.orphans {
        check_orphans(registry, &mut report);
    }
    check_name_style(registry, &mut report);
    check_name_matches_file(registry, &mut report);
    check_missing_descriptions(registry, &mut report);
    check_duplicate_triggers(registry, &mut report);

    report
}
