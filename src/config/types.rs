//! Config sub-sections and default value functions.

use serde::{Deserialize, Serialize};

/// Which lint checks run and how their findings affect the exit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Report records no other record references.
    #[serde(default = "default_true")]
    pub orphans: bool,

    /// Report related-agent references to unknown names.
    #[serde(default = "default_true")]
    pub dangling: bool,

    /// Exit with the lint-failure code when only warnings were found.
    #[serde(default = "default_true")]
    pub fail_on_warnings: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            orphans: true,
            dangling: true,
            fail_on_warnings: true,
        }
    }
}

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_agents_dir() -> String {
    "agents".to_string()
}

pub(super) fn default_archive_dir() -> String {
    "agents/archive".to_string()
}

pub(super) fn default_ledger_file() -> String {
    ".agentdex/ledger.yaml".to_string()
}

pub(super) fn default_events_file() -> String {
    ".agentdex/events.ndjson".to_string()
}

pub fn default_inactive_globs() -> Vec<String> {
    vec![
        "**/*.bak.md".to_string(),
        "**/*.archived.md".to_string(),
        "**/_*.md".to_string(),
    ]
}
