//! File I/O for agent definitions.

use super::AgentRecord;
use crate::error::{DexError, Result};
use std::path::Path;

impl AgentRecord {
    /// Load and parse an agent definition from disk.
    ///
    /// Read failures are user errors; malformed content is a parse error
    /// labeled with the path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DexError::UserError(format!(
                "failed to read agent file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse_labeled(&content, &path.display().to_string())?.with_source(path))
    }

    /// Render the record back into document form.
    ///
    /// Key order follows the schema, unknown keys follow in sorted order. The
    /// body is appended unchanged.
    pub fn to_markdown(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.metadata).map_err(|e| {
            DexError::UserError(format!(
                "failed to serialize front-matter for '{}': {}",
                self.metadata.name, e
            ))
        })?;

        let mut output = String::new();
        output.push_str("---\n");
        output.push_str(&yaml);
        output.push_str("---\n");
        output.push_str(&self.body);
        Ok(output)
    }
}
