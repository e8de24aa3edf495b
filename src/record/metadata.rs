//! Front-matter schema for agent definitions.
//!
//! The schema is free-form: only the keys consumers rely on are typed, and
//! every other key lands in `extra` untouched. The advisory keys (`model`,
//! `tools`, `async`) are carried through for the host runtime and never acted
//! on here.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Agent front-matter fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    /// Unique identifier, kebab-case by convention.
    #[serde(default)]
    pub name: String,

    /// One-line summary used for selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Model tier hint (e.g. "sonnet", "deep").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Capability names the agent may use. Accepts a list or a
    /// comma-separated string.
    #[serde(
        default,
        deserialize_with = "deserialize_tool_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tools: Vec<String>,

    /// Phrases or situations that suggest invoking this agent.
    #[serde(
        default,
        deserialize_with = "deserialize_phrases",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub triggers: Vec<String>,

    /// Background/interactive scheduling hint.
    #[serde(
        default,
        rename = "async",
        alias = "async_policy",
        skip_serializing_if = "Option::is_none"
    )]
    pub async_policy: Option<AsyncPolicy>,

    /// Related agents declared in the front-matter itself.
    #[serde(
        default,
        alias = "relatedAgents",
        deserialize_with = "deserialize_related",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub related_agents: Vec<RelatedAgent>,

    /// Any keys not listed above, preserved but uninterpreted.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Scheduling hint for the host runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncPolicy {
    pub mode: AsyncMode,

    /// Operations the agent prefers to run in the background.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefer_background: Vec<String>,

    /// Operations that need synchronous, interactive handling.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub require_sync: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AsyncMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl fmt::Display for AsyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncMode::Always => write!(f, "always"),
            AsyncMode::Auto => write!(f, "auto"),
            AsyncMode::Never => write!(f, "never"),
        }
    }
}

/// An advisory pointer to another agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedAgent {
    /// Name of the referenced agent.
    pub name: String,
    /// Why a reader would pick that agent instead.
    #[serde(default)]
    pub reason: String,
}

impl RelatedAgent {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Coarse tier derived from the free-form `model` hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelTier {
    Fast,
    Balanced,
    Deep,
    /// Use whatever the host session runs.
    Inherit,
    Other(String),
}

impl ModelTier {
    /// Map a model hint to a tier. Matching is case-insensitive.
    pub fn from_hint(hint: &str) -> Self {
        let lowered = hint.trim().to_lowercase();
        match lowered.as_str() {
            "fast" | "haiku" => ModelTier::Fast,
            "balanced" | "sonnet" => ModelTier::Balanced,
            "deep" | "opus" => ModelTier::Deep,
            "inherit" => ModelTier::Inherit,
            _ => ModelTier::Other(hint.trim().to_string()),
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::Fast => write!(f, "fast"),
            ModelTier::Balanced => write!(f, "balanced"),
            ModelTier::Deep => write!(f, "deep"),
            ModelTier::Inherit => write!(f, "inherit"),
            ModelTier::Other(hint) => write!(f, "{}", hint),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedEntry {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        reason: String,
    },
}

fn deserialize_tool_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => s.split(',').map(str::to_string).collect(),
        Some(OneOrMany::Many(v)) => v,
    };

    let mut tools: Vec<String> = Vec::new();
    for tool in raw.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !tools.iter().any(|existing| existing == tool) {
            tools.push(tool.to_string());
        }
    }
    Ok(tools)
}

fn deserialize_phrases<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let phrases = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    };
    Ok(phrases
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

fn deserialize_related<'de, D>(deserializer: D) -> Result<Vec<RelatedAgent>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<RelatedEntry>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            RelatedEntry::Name(name) => RelatedAgent::new(name.trim(), ""),
            RelatedEntry::Full { name, reason } => RelatedAgent::new(name.trim(), reason.trim()),
        })
        .filter(|r| !r.name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_tier_maps_known_hints() {
        assert_eq!(ModelTier::from_hint("haiku"), ModelTier::Fast);
        assert_eq!(ModelTier::from_hint("Sonnet"), ModelTier::Balanced);
        assert_eq!(ModelTier::from_hint("deep"), ModelTier::Deep);
        assert_eq!(ModelTier::from_hint("inherit"), ModelTier::Inherit);
        assert_eq!(
            ModelTier::from_hint("gpt-4o"),
            ModelTier::Other("gpt-4o".to_string())
        );
    }

    #[test]
    fn tools_accept_comma_separated_string() {
        let meta: AgentMetadata =
            serde_yaml::from_str("name: a\ntools: Read, Grep,  Bash, Read\n").unwrap();
        assert_eq!(meta.tools, vec!["Read", "Grep", "Bash"]);
    }

    #[test]
    fn tools_accept_sequence() {
        let meta: AgentMetadata =
            serde_yaml::from_str("name: a\ntools:\n  - Read\n  - WebFetch\n").unwrap();
        assert_eq!(meta.tools, vec!["Read", "WebFetch"]);
    }

    #[test]
    fn single_trigger_string_becomes_one_phrase() {
        let meta: AgentMetadata =
            serde_yaml::from_str("name: a\ntriggers: write an ROI memo\n").unwrap();
        assert_eq!(meta.triggers, vec!["write an ROI memo"]);
    }

    #[test]
    fn async_policy_parses_all_options() {
        let yaml = r#"
name: a
async:
  mode: always
  prefer_background:
    - crawl
  require_sync:
    - approval
"#;
        let meta: AgentMetadata = serde_yaml::from_str(yaml).unwrap();
        let policy = meta.async_policy.unwrap();
        assert_eq!(policy.mode, AsyncMode::Always);
        assert_eq!(policy.prefer_background, vec!["crawl"]);
        assert_eq!(policy.require_sync, vec!["approval"]);
    }

    #[test]
    fn async_policy_mode_defaults_to_auto() {
        let meta: AgentMetadata =
            serde_yaml::from_str("name: a\nasync:\n  require_sync: [review]\n").unwrap();
        assert_eq!(meta.async_policy.unwrap().mode, AsyncMode::Auto);
    }

    #[test]
    fn related_agents_accept_names_and_maps() {
        let yaml = r#"
name: a
related_agents:
  - ctm-expert
  - name: uat-matrix
    reason: test plans
"#;
        let meta: AgentMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            meta.related_agents,
            vec![
                RelatedAgent::new("ctm-expert", ""),
                RelatedAgent::new("uat-matrix", "test plans"),
            ]
        );
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let yaml = "name: a\ncolor: blue\nowner:\n  team: revops\n";
        let meta: AgentMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(meta.extra.len(), 2);
        assert!(meta.extra.contains_key("color"));
        assert!(meta.extra.contains_key("owner"));
    }
}
