//! Swappable registry snapshots.
//!
//! A long-lived process that reloads edited documents builds a complete new
//! registry first and then swaps a single `Arc`, so readers holding the old
//! snapshot keep a consistent view and never see a half-built one.

use super::{Document, Registry};
use crate::error::Result;
use std::sync::{Arc, RwLock};

/// Shared handle to the current registry snapshot.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    current: Arc<RwLock<Arc<Registry>>>,
}

impl RegistryHandle {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// The current snapshot. It stays valid even if a reload happens later.
    pub fn load(&self) -> Arc<Registry> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poison| poison.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a fully built registry.
    pub fn replace(&self, registry: Registry) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        *guard = Arc::new(registry);
    }

    /// Rebuild from documents and swap only if the build succeeds.
    ///
    /// On failure (e.g. a duplicate name) the previous snapshot stays in place.
    pub fn reload(&self, documents: &[Document]) -> Result<Arc<Registry>> {
        let registry = Registry::build(documents)?;
        self.replace(registry);
        Ok(self.load())
    }
}
