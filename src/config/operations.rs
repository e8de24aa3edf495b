//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{DexError, Result};
use crate::lint::LintOptions;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DexError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| DexError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DexError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `agents_dir`, `archive_dir`, `ledger_file` must be non-empty
    /// - every `inactive_globs` entry must compile
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("agents_dir", &self.agents_dir),
            ("archive_dir", &self.archive_dir),
            ("ledger_file", &self.ledger_file),
        ] {
            if value.trim().is_empty() {
                return Err(DexError::UserError(format!(
                    "config validation failed: {} must not be empty",
                    field
                )));
            }
        }

        self.inactive_glob_set()?;
        Ok(())
    }

    /// Compile `inactive_globs` into a matcher.
    pub fn inactive_glob_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.inactive_globs {
            let glob = Glob::new(pattern).map_err(|e| {
                DexError::UserError(format!(
                    "config validation failed: invalid inactive_globs pattern '{}': {}",
                    pattern, e
                ))
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| {
            DexError::UserError(format!(
                "config validation failed: invalid inactive_globs: {}",
                e
            ))
        })
    }

    /// Lint checks selected by this config.
    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            orphans: self.lint.orphans,
            dangling: self.lint.dangling,
        }
    }
}
