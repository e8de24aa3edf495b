//! Display functions for lint reports.

use super::{IssueSeverity, LintReport};

/// Print the lint report.
pub fn print_report(report: &LintReport, agent_count: usize) {
    if !report.has_issues() {
        println!("Corpus is consistent. {} agent(s), no issues detected.", agent_count);
        return;
    }

    println!("Issues detected ({}):", report.issues.len());
    println!();

    for (i, issue) in report.issues.iter().enumerate() {
        println!(
            "  {}. [{}] {} - {}",
            i + 1,
            issue.severity,
            issue.category,
            issue.description
        );
        println!("     Subject: {}", issue.subject);
        if let Some(remediation) = &issue.remediation {
            println!("     Fix:     {}", remediation);
        }
        println!();
    }

    println!(
        "Summary: {} agent(s), {} error(s), {} warning(s), {} dangling reference(s), {} orphan(s).",
        agent_count,
        report.count(IssueSeverity::Error),
        report.count(IssueSeverity::Warning),
        report.dangling.len(),
        report.orphans.len()
    );
}
