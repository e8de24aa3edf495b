//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// File name of the config at the corpus root.
pub const CONFIG_FILE_NAME: &str = "agentdex.yaml";

/// Configuration for an agent corpus.
///
/// Paths are relative to the corpus root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Layout
    // =========================================================================
    /// Directory holding agent documents (default: "agents").
    #[serde(default = "default_agents_dir")]
    pub agents_dir: String,

    /// Cold storage for archived agents (default: "agents/archive").
    ///
    /// Documents under it are never loaded into the registry.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Glob patterns (relative to the corpus root) marking inactive documents.
    #[serde(default = "default_inactive_globs")]
    pub inactive_globs: Vec<String>,

    // =========================================================================
    // State
    // =========================================================================
    /// Archival ledger (default: ".agentdex/ledger.yaml").
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,

    /// NDJSON audit log of ledger mutations (default: ".agentdex/events.ndjson").
    #[serde(default = "default_events_file")]
    pub events_file: String,

    // =========================================================================
    // Lint
    // =========================================================================
    #[serde(default)]
    pub lint: LintConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agents_dir: default_agents_dir(),
            archive_dir: default_archive_dir(),
            inactive_globs: default_inactive_globs(),
            ledger_file: default_ledger_file(),
            events_file: default_events_file(),
            lint: LintConfig::default(),
        }
    }
}
