//! Key-value collaborator for the local backend.
//!
//! Models browser-style durable string storage: synchronous get/set/remove,
//! persisted across restarts, not shared across processes in real time. Each
//! key is independently readable; corruption of one never blocks the others.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Well-known storage keys. Logical names, stable across versions.
pub mod keys {
    pub const COURSES: &str = "studykeep_courses";
    pub const NOTES: &str = "studykeep_notes";
    pub const DAILY_ENTRIES: &str = "studykeep_daily_entries";
    pub const STORAGE_MODE: &str = "studykeep_storage_mode";
    pub const STORAGE_INITIALIZED: &str = "studykeep_storage_initialized";
    pub const PREVIOUSLY_AUTHENTICATED: &str = "studykeep_previously_authenticated";
    pub const REVIEW_CHECKPOINT: &str = "studykeep_review_session";
}

/// Synchronous durable string storage.
///
/// Writes are best-effort: an I/O failure is logged and degrades to "key
/// absent" on the next read rather than propagating.
pub trait KvStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed store: one file per key under a directory, so a corrupt or
/// unreadable key never affects its neighbors.
#[derive(Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Default location under the platform user-data directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("studykeep")
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read kv key, treating as absent");
                None
            },
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::write(self.key_path(key), value) {
            tracing::warn!(key, error = %e, "failed to write kv key");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => {},
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => tracing::warn!(key, error = %e, "failed to remove kv key"),
        }
    }
}

/// In-memory store for tests and ephemeral embedding hosts.
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().map(|m| m.get(key).cloned()).unwrap_or_else(|e| {
            tracing::warn!(key, "kv lock poisoned: {e}");
            None
        })
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut m) = self.map.lock() {
            m.insert(key.to_owned(), value.to_owned());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut m) = self.map.lock() {
            m.remove(key);
        }
    }
}
