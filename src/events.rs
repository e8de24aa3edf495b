//! Audit log for ledger mutations.
//!
//! Every consolidation recorded and every rollback applied appends one event to
//! an NDJSON file (default `.agentdex/events.ndjson`), one JSON object per line.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`init`, `consolidate`, `rollback`)
//! - `actor`: `user@HOST`
//! - `agent`: the consolidated (active) agent, when there is one
//! - `details`: action-specific object

use crate::error::{DexError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Corpus scaffolding created
    Init,
    /// Consolidation recorded in the ledger
    Consolidate,
    /// Consolidation rolled back
    Rollback,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Consolidate => write!(f, "consolidate"),
            EventAction::Rollback => write!(f, "rollback"),
        }
    }
}

/// One audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub details: Value,
}

impl Event {
    /// A new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            agent: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_agent(mut self, name: impl Into<String>) -> Self {
        self.agent = Some(name.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DexError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append `event` to the log at `path`, creating the file and its directory.
pub fn append_event(path: &Path, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    if let Some(dir) = path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            DexError::UserError(format!(
                "failed to create events directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            DexError::UserError(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            DexError::UserError(format!(
                "failed to write event to '{}': {}",
                path.display(),
                e
            ))
        })
}

/// Append an event, logging a warning on failure.
pub fn append_event_best_effort(path: &Path, event: &Event) {
    if let Err(e) = append_event(path, event) {
        tracing::warn!(error = %e, action = %event.action, "failed to append audit event");
    }
}

/// Read every event from the log. A missing file yields no events.
#[cfg(test)]
pub(crate) fn read_events(path: &Path) -> Result<Vec<Event>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).map_err(|e| {
        DexError::UserError(format!(
            "failed to read events file '{}': {}",
            path.display(),
            e
        ))
    })?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                DexError::UserError(format!(
                    "invalid event on line {} of '{}': {}",
                    i + 1,
                    path.display(),
                    e
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Consolidate).with_agent("hubspot-api-crm-all");

        assert_eq!(event.action, EventAction::Consolidate);
        assert_eq!(event.agent.as_deref(), Some("hubspot-api-crm-all"));
        assert!(event.actor.contains('@'));
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::new(EventAction::Rollback)
            .with_agent("a")
            .with_details(json!({"steps": 3}));

        let line = event.to_ndjson_line().unwrap();

        assert!(!line.contains('\n'));
        assert!(line.contains("\"rollback\""));
        let parsed: Event = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.details["steps"], 3);
    }

    #[test]
    fn test_event_without_agent_omits_field() {
        let line = Event::new(EventAction::Init).to_ndjson_line().unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert!(parsed.get("agent").is_none());
    }

    #[test]
    fn test_append_creates_file_and_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".agentdex").join("events.ndjson");

        append_event(&path, &Event::new(EventAction::Init)).unwrap();
        append_event(&path, &Event::new(EventAction::Consolidate).with_agent("a")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert_eq!(content.lines().count(), 2);

        let events = read_events(&path).unwrap();
        assert_eq!(events[0].action, EventAction::Init);
        assert_eq!(events[1].agent.as_deref(), Some("a"));
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(read_events(&temp.path().join("none.ndjson")).unwrap().is_empty());
    }

    #[test]
    fn test_event_action_display() {
        assert_eq!(EventAction::Init.to_string(), "init");
        assert_eq!(EventAction::Consolidate.to_string(), "consolidate");
        assert_eq!(EventAction::Rollback.to_string(), "rollback");
    }
}
