//! Implementation of the `agentdex lint` command.

use super::{load_corpus, print_json};
use crate::cli::GlobalArgs;
use crate::error::{DexError, Result};
use crate::lint::{IssueSeverity, LintReport, lint, print_report};

/// Execute the `agentdex lint` command.
///
/// Fails with [`DexError::LintFailure`] (exit code 2) when errors were found,
/// or warnings while `lint.fail_on_warnings` is set.
pub fn cmd_lint(global: &GlobalArgs) -> Result<()> {
    let (ctx, registry) = load_corpus(global)?;
    let report = lint(&registry, ctx.config.lint_options());

    if global.json {
        print_json(&report)?;
    } else {
        print_report(&report, registry.len());
    }

    lint_outcome(&report, ctx.config.lint.fail_on_warnings)
}

/// Map a report to the command result.
pub(crate) fn lint_outcome(report: &LintReport, fail_on_warnings: bool) -> Result<()> {
    let errors = report.count(IssueSeverity::Error);
    let warnings = report.count(IssueSeverity::Warning);

    if errors > 0 || (fail_on_warnings && warnings > 0) {
        return Err(DexError::LintFailure(format!(
            "{} error(s), {} warning(s)",
            errors, warnings
        )));
    }
    Ok(())
}
