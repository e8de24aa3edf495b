//! Agent definition records.
//!
//! Agent definitions are Markdown documents with a YAML front-matter block
//! followed by a free-text body (the prompt handed to the host assistant).
//! Parsing supports:
//!
//! - A handful of interpreted keys (`name`, `description`, `model`, `tools`,
//!   `triggers`, `async`, `related_agents`)
//! - Round-trip preservation of every other key (uninterpreted)
//! - Exact preservation of the body, line endings included
//! - A "Related Agents" table or list inside the body
//!
//! # Document Format
//!
//! ```text
//! ---
//! name: slack-ctm-sync
//! description: Summarize Slack activity for the CTM team
//! model: sonnet
//! tools: Read, Grep
//! triggers:
//!   - what happened on Slack?
//! ---
//!
//! You are a Slack digest writer...
//!
//! ## Related Agents
//! | Agent | When to use |
//! |-------|-------------|
//! | `ctm-expert` | CTM product questions |
//! ```

use crate::error::{DexError, Result};
use std::path::PathBuf;

mod io;
mod metadata;
mod related;

pub use metadata::{AgentMetadata, AsyncMode, AsyncPolicy, ModelTier, RelatedAgent};
pub use related::parse_related_section;

/// A parsed agent definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRecord {
    /// The parsed front-matter.
    pub metadata: AgentMetadata,
    /// Everything after the closing `---` line, preserved exactly.
    pub body: String,
    /// Path of the document this record came from, if it was loaded from disk.
    pub source: Option<PathBuf>,
}

impl AgentRecord {
    /// Parse an agent definition from its text.
    ///
    /// Fails with [`DexError::Parse`] when the metadata block is missing or
    /// malformed, or when it does not declare a `name`. No partial record is
    /// produced.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_labeled(text, "<document>")
    }

    /// Parse with a label (usually the path) used in error messages.
    pub fn parse_labeled(text: &str, label: &str) -> Result<Self> {
        let parse_error = |message: String| DexError::Parse {
            source_name: label.to_string(),
            message,
        };

        let (header, body) = split_front_matter(text).map_err(|m| parse_error(m.to_string()))?;

        let metadata: AgentMetadata = serde_yaml::from_str(header)
            .map_err(|e| parse_error(format!("invalid front-matter: {}", e)))?;

        if metadata.name.trim().is_empty() {
            return Err(parse_error(
                "front-matter does not declare a `name`".to_string(),
            ));
        }

        Ok(Self {
            metadata,
            body: body.to_string(),
            source: None,
        })
    }

    /// Attach the originating path.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The record's unique name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// One-line summary, empty when the document has none.
    pub fn description(&self) -> &str {
        self.metadata.description.as_deref().unwrap_or("")
    }

    /// Trigger phrases in declaration order.
    pub fn triggers(&self) -> &[String] {
        &self.metadata.triggers
    }

    /// Advisory tool allow-list.
    pub fn tools(&self) -> &[String] {
        &self.metadata.tools
    }

    /// Advisory model tier, if a model was declared.
    pub fn model_tier(&self) -> Option<ModelTier> {
        self.metadata.model.as_deref().map(ModelTier::from_hint)
    }

    /// Declared related agents: front-matter entries first, then the body's
    /// "Related Agents" section. The first declaration of a target wins.
    pub fn related_agents(&self) -> Vec<RelatedAgent> {
        let mut merged: Vec<RelatedAgent> = Vec::new();
        let declared = self.metadata.related_agents.iter().cloned();
        for entry in declared.chain(parse_related_section(&self.body)) {
            if !merged.iter().any(|e| e.name == entry.name) {
                merged.push(entry);
            }
        }
        merged
    }

    /// Label used in messages: the source path, or the name.
    pub fn source_label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => self.metadata.name.clone(),
        }
    }
}

/// Split a document into its YAML header and body.
///
/// The first line must be `---`; the header runs until the next line that is
/// exactly `---` (trailing whitespace and `\r` tolerated). The body starts on
/// the line after the closing delimiter.
fn split_front_matter(text: &str) -> std::result::Result<(&str, &str), &'static str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let first = lines.next().ok_or("document is empty")?;
    if trim_line_ending(first).trim_end() != "---" {
        return Err("document must start with a '---' front-matter delimiter");
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if trim_line_ending(line).trim_end() == "---" {
            return Ok((&text[header_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err("missing closing '---' front-matter delimiter")
}

fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}
