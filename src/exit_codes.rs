//! Exit code constants for the agentdex CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown agent, unreadable corpus)
//! - 2: Lint failure (dangling references, orphans, other findings)
//! - 3: Registry failure (duplicate agent names, malformed requested document)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown names, or I/O failure.
pub const USER_ERROR: i32 = 1;

/// Lint reported at least one issue.
pub const LINT_FAILURE: i32 = 2;

/// The registry could not be built.
pub const REGISTRY_FAILURE: i32 = 3;
