//! Related-agent resolution.
//!
//! Related-agent edges are hand-maintained hints. They are resolved lazily
//! against the current registry each time they are asked for, and a target
//! that does not resolve becomes a [`DanglingReferenceWarning`] instead of an
//! error.

use crate::error::Result;
use crate::record::AgentRecord;
use crate::registry::Registry;
use serde::Serialize;
use std::fmt;

/// Where a related-agent edge points.
#[derive(Debug, Clone)]
pub enum RelatedTarget<'a> {
    /// The target is registered.
    Resolved(&'a AgentRecord),
    /// The target name is not in the registry.
    Dangling(String),
}

/// One declared edge, resolved.
#[derive(Debug, Clone)]
pub struct RelatedEdge<'a> {
    pub target: RelatedTarget<'a>,
    pub reason: String,
}

/// A related-agent edge whose target is missing from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReferenceWarning {
    /// Record declaring the edge.
    pub from: String,
    /// Name that did not resolve.
    pub target: String,
    pub reason: String,
}

impl fmt::Display for DanglingReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' references unknown agent '{}'",
            self.from, self.target
        )
    }
}

/// The outcome of [`related_to`].
#[derive(Debug, Clone, Default)]
pub struct RelatedAgents<'a> {
    /// Resolved targets with the declared reason, in declaration order.
    pub resolved: Vec<(&'a AgentRecord, String)>,
    /// One warning per target that did not resolve.
    pub warnings: Vec<DanglingReferenceWarning>,
}

/// Resolve every edge declared by `record`.
pub fn edges<'a>(registry: &'a Registry, record: &AgentRecord) -> Vec<RelatedEdge<'a>> {
    record
        .related_agents()
        .into_iter()
        .map(|related| {
            let target = match registry.get(&related.name) {
                Ok(found) => RelatedTarget::Resolved(found),
                Err(_) => RelatedTarget::Dangling(related.name),
            };
            RelatedEdge {
                target,
                reason: related.reason,
            }
        })
        .collect()
}

/// Related agents declared by the record named `name`.
///
/// Fails only when `name` itself is unknown. Unresolvable targets are
/// reported as warnings and left out of the resolved list.
pub fn related_to<'a>(registry: &'a Registry, name: &str) -> Result<RelatedAgents<'a>> {
    let record = registry.get(name)?;
    let mut result = RelatedAgents::default();

    for edge in edges(registry, record) {
        match edge.target {
            RelatedTarget::Resolved(target) => result.resolved.push((target, edge.reason)),
            RelatedTarget::Dangling(target) => {
                tracing::debug!(from = %name, target = %target, "dangling related-agent reference");
                result.warnings.push(DanglingReferenceWarning {
                    from: name.to_string(),
                    target,
                    reason: edge.reason,
                });
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DexError;
    use crate::registry::Document;
    use crate::test_support::agent_doc;

    fn doc(name: &str, related: &[(&str, &str)]) -> Document {
        Document::active(format!("agents/{}.md", name), agent_doc(name, &[], related))
    }

    fn registry(docs: Vec<Document>) -> Registry {
        Registry::build(&docs).unwrap()
    }

    #[test]
    fn dangling_target_is_a_warning_not_an_error() {
        let registry = registry(vec![doc("slack-ctm-sync", &[("ctm-expert", "CTM questions")])]);

        let related = related_to(&registry, "slack-ctm-sync").unwrap();

        assert!(related.resolved.is_empty());
        assert_eq!(
            related.warnings,
            vec![DanglingReferenceWarning {
                from: "slack-ctm-sync".to_string(),
                target: "ctm-expert".to_string(),
                reason: "CTM questions".to_string(),
            }]
        );
    }

    #[test]
    fn resolved_and_dangling_are_split() {
        let registry = registry(vec![
            doc(
                "slack-ctm-sync",
                &[("erd-builder", "data models"), ("ghost", "gone")],
            ),
            doc("erd-builder", &[]),
        ]);

        let related = related_to(&registry, "slack-ctm-sync").unwrap();

        assert_eq!(related.resolved.len(), 1);
        assert_eq!(related.resolved[0].0.name(), "erd-builder");
        assert_eq!(related.resolved[0].1, "data models");
        assert_eq!(related.warnings.len(), 1);
        assert_eq!(related.warnings[0].target, "ghost");
    }

    #[test]
    fn unknown_source_is_not_found() {
        let registry = registry(vec![doc("erd-builder", &[])]);
        let err = related_to(&registry, "nope").unwrap_err();
        assert!(matches!(err, DexError::NotFound { .. }));
    }

    #[test]
    fn edges_are_tagged() {
        let registry = registry(vec![
            doc("a-agent", &[("b-agent", ""), ("missing", "")]),
            doc("b-agent", &[]),
        ]);
        let record = registry.get("a-agent").unwrap();

        let tagged = edges(&registry, record);

        assert!(matches!(tagged[0].target, RelatedTarget::Resolved(r) if r.name() == "b-agent"));
        assert!(matches!(&tagged[1].target, RelatedTarget::Dangling(n) if n == "missing"));
    }

    #[test]
    fn warning_display_names_both_ends() {
        let warning = DanglingReferenceWarning {
            from: "a".to_string(),
            target: "b".to_string(),
            reason: String::new(),
        };
        assert_eq!(warning.to_string(), "'a' references unknown agent 'b'");
    }
}
