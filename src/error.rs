//! Error types for agentdex.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Content problems (malformed front-matter, duplicate names, unknown names) get
//! their own variants so callers can tell them apart from environment failures.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for agentdex operations.
#[derive(Error, Debug)]
pub enum DexError {
    /// Invalid arguments, unreadable files, or an invalid corpus layout.
    #[error("{0}")]
    UserError(String),

    /// A document's metadata block could not be parsed.
    ///
    /// The document is excluded from the registry; other documents still load.
    #[error("failed to parse '{source_name}': {message}")]
    Parse {
        /// Path or label of the offending document.
        source_name: String,
        /// What was wrong with it.
        message: String,
    },

    /// Two active documents declare the same agent name.
    #[error("duplicate agent name '{name}' (declared by {first} and {second})")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    /// A lookup by name did not resolve.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What was being looked up ("agent", "ledger entry").
        kind: &'static str,
        name: String,
    },

    /// Lint found issues in the corpus.
    #[error("Lint failed: {0}")]
    LintFailure(String),
}

impl DexError {
    /// Shorthand for an unknown agent name.
    pub fn agent_not_found(name: impl Into<String>) -> Self {
        DexError::NotFound {
            kind: "agent",
            name: name.into(),
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DexError::UserError(_) => exit_codes::USER_ERROR,
            DexError::NotFound { .. } => exit_codes::USER_ERROR,
            DexError::LintFailure(_) => exit_codes::LINT_FAILURE,
            DexError::Parse { .. } => exit_codes::REGISTRY_FAILURE,
            DexError::DuplicateName { .. } => exit_codes::REGISTRY_FAILURE,
        }
    }
}

/// Result type alias for agentdex operations.
pub type Result<T> = std::result::Result<T, DexError>;
