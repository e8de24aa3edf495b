//! Tests for command implementations.

use super::*;
use crate::cli::{InitArgs, MatchArgs, RelatedArgs, ShowArgs};
use crate::error::DexError;
use crate::events::{EventAction, read_events};
use crate::exit_codes;
use crate::test_support::{DirGuard, agent_doc, create_test_corpus, write_agent};
use serial_test::serial;
use std::path::Path;

fn global_for(root: &Path) -> GlobalArgs {
    GlobalArgs {
        root: Some(root.to_path_buf()),
        verbose: 0,
        json: false,
    }
}

fn write_linked_pair(root: &Path) {
    write_agent(
        root,
        "slack-ctm-sync.md",
        &agent_doc(
            "slack-ctm-sync",
            &["what happened on Slack"],
            &[("ctm-expert", "CTM questions")],
        ),
    );
    write_agent(
        root,
        "ctm-expert.md",
        &agent_doc("ctm-expert", &[], &[("slack-ctm-sync", "Slack digests")]),
    );
}

#[test]
fn test_init_creates_layout_and_is_idempotent() {
    let temp = tempfile::TempDir::new().unwrap();

    let outcome = init::init_corpus(temp.path(), false).unwrap();
    assert!(outcome.config_written);
    assert_eq!(outcome.created_dirs.len(), 2);
    assert!(temp.path().join("agentdex.yaml").exists());
    assert!(temp.path().join("agents").join("archive").is_dir());

    std::fs::write(temp.path().join("agentdex.yaml"), "agents_dir: agents\n").unwrap();
    let outcome = init::init_corpus(temp.path(), false).unwrap();
    assert!(!outcome.config_written);
    assert!(outcome.created_dirs.is_empty());
    assert_eq!(
        std::fs::read_to_string(temp.path().join("agentdex.yaml")).unwrap(),
        "agents_dir: agents\n"
    );

    let events = read_events(&outcome.ctx.events_file).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.action == EventAction::Init));
}

#[test]
fn test_init_force_rewrites_config() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join("agentdex.yaml"), "agents_dir: defs\n").unwrap();

    let outcome = init::init_corpus(temp.path(), true).unwrap();

    assert!(outcome.config_written);
    assert_eq!(outcome.ctx.config.agents_dir, "agents");
}

#[test]
#[serial]
fn test_init_uses_current_dir_without_root() {
    let temp = tempfile::TempDir::new().unwrap();
    let _guard = DirGuard::new(temp.path());

    init::cmd_init(&GlobalArgs::default(), InitArgs { force: false }).unwrap();

    assert!(temp.path().join("agents").is_dir());
}

#[test]
fn test_read_commands_succeed_on_linked_corpus() {
    let temp = create_test_corpus();
    write_linked_pair(temp.path());
    let global = global_for(temp.path());

    list::cmd_list(&global).unwrap();
    show::cmd_show(
        &global,
        ShowArgs {
            name: "slack-ctm-sync".to_string(),
            markdown: false,
        },
    )
    .unwrap();
    match_cmd::cmd_match(
        &global,
        MatchArgs {
            utterance: vec!["What happened on Slack?".to_string()],
        },
    )
    .unwrap();
    related::cmd_related(
        &global,
        RelatedArgs {
            name: "ctm-expert".to_string(),
        },
    )
    .unwrap();
    lint::cmd_lint(&global).unwrap();
}

#[test]
fn test_json_output_paths() {
    let temp = create_test_corpus();
    write_linked_pair(temp.path());
    let global = GlobalArgs {
        json: true,
        ..global_for(temp.path())
    };

    list::cmd_list(&global).unwrap();
    show::cmd_show(
        &global,
        ShowArgs {
            name: "ctm-expert".to_string(),
            markdown: false,
        },
    )
    .unwrap();
    lint::cmd_lint(&global).unwrap();
}

#[test]
fn test_show_unknown_agent_is_not_found() {
    let temp = create_test_corpus();
    write_linked_pair(temp.path());

    let err = show::cmd_show(
        &global_for(temp.path()),
        ShowArgs {
            name: "ghost".to_string(),
            markdown: false,
        },
    )
    .unwrap_err();

    assert!(matches!(err, DexError::NotFound { .. }));
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn test_show_broken_document_path_is_registry_failure() {
    let temp = create_test_corpus();
    let path = write_agent(temp.path(), "broken.md", "no front-matter");

    let err = show::cmd_show(
        &global_for(temp.path()),
        ShowArgs {
            name: path.display().to_string(),
            markdown: true,
        },
    )
    .unwrap_err();

    assert!(matches!(err, DexError::Parse { .. }));
    assert_eq!(err.exit_code(), exit_codes::REGISTRY_FAILURE);
}

#[test]
fn test_duplicate_names_fail_every_read_command() {
    let temp = create_test_corpus();
    write_agent(temp.path(), "a.md", &agent_doc("same", &[], &[]));
    write_agent(temp.path(), "b.md", &agent_doc("same", &[], &[]));

    let err = list::cmd_list(&global_for(temp.path())).unwrap_err();

    assert!(matches!(err, DexError::DuplicateName { .. }));
    assert_eq!(err.exit_code(), exit_codes::REGISTRY_FAILURE);
}

#[test]
fn test_related_unknown_source_is_not_found() {
    let temp = create_test_corpus();
    write_linked_pair(temp.path());

    let err = related::cmd_related(
        &global_for(temp.path()),
        RelatedArgs {
            name: "ghost".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DexError::NotFound { .. }));
}

#[test]
fn test_lint_fails_on_dangling_reference() {
    let temp = create_test_corpus();
    write_linked_pair(temp.path());
    write_agent(
        temp.path(),
        "erd-builder.md",
        &agent_doc("erd-builder", &[], &[("slack-ctm-sync", ""), ("ghost", "")]),
    );

    let err = lint::cmd_lint(&global_for(temp.path())).unwrap_err();

    assert!(matches!(err, DexError::LintFailure(_)));
    assert_eq!(err.exit_code(), exit_codes::LINT_FAILURE);
}

#[test]
fn test_lint_warnings_pass_when_configured() {
    let temp = create_test_corpus();
    std::fs::write(
        temp.path().join("agentdex.yaml"),
        "lint:\n  fail_on_warnings: false\n",
    )
    .unwrap();
    write_agent(temp.path(), "lonely.md", &agent_doc("lonely", &[], &[]));

    lint::cmd_lint(&global_for(temp.path())).unwrap();
}

#[test]
fn test_lint_outcome_errors_always_fail() {
    use crate::lint::{Issue, IssueSeverity, LintReport};

    let mut report = LintReport::default();
    assert!(lint::lint_outcome(&report, true).is_ok());

    report
        .issues
        .push(Issue::new(IssueSeverity::Error, "parse_error", "x.md", "bad"));
    assert!(lint::lint_outcome(&report, false).is_err());
}
