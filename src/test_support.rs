use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Render a minimal agent document.
pub(crate) fn agent_doc(name: &str, triggers: &[&str], related: &[(&str, &str)]) -> String {
    let mut doc = format!("---\nname: {}\ndescription: {} agent\n", name, name);
    if !triggers.is_empty() {
        doc.push_str("triggers:\n");
        for trigger in triggers {
            doc.push_str(&format!("  - \"{}\"\n", trigger));
        }
    }
    if !related.is_empty() {
        doc.push_str("related_agents:\n");
        for (target, reason) in related {
            doc.push_str(&format!("  - name: {}\n    reason: \"{}\"\n", target, reason));
        }
    }
    doc.push_str("---\n\nYou are the ");
    doc.push_str(name);
    doc.push_str(" agent.\n");
    doc
}

/// A corpus root in a temp directory with `agents/` and `agents/archive/`.
pub(crate) fn create_test_corpus() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("agents").join("archive")).unwrap();
    temp_dir
}

/// Write an agent document under `agents/` (or a nested path) and return its path.
pub(crate) fn write_agent(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join("agents").join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
