use crate::parser::LogFormat;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Metadata for a registered log file.
///
/// Immutable once created: there is no update operation, entries are
/// only inserted and removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFileInfo {
    /// Opaque identifier, unique within the registry
    pub id: String,
    /// Sanitized display name, unique case-insensitively
    pub name: String,
    /// Cleaned filesystem path
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub format: LogFormat,
    pub registered_at: DateTime<Utc>,
}

impl LogFileInfo {
    pub fn new(id: String, name: String, path: &str, format: LogFormat) -> Self {
        Self {
            id,
            name,
            path: clean_path(path),
            format,
            registered_at: Utc::now(),
        }
    }
}

/// Lexical path cleanup: collapses redundant separators and drops `.`
/// components. Does not touch the filesystem.
fn clean_path(path: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in Path::new(path).components() {
        match comp {
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read registry file {path}: {source}")]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("registry file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to persist registry to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// On-disk shape: `{ "files": { "<id>": LogFileInfo, ... } }`.
/// A key-unordered mapping, so registration order is not preserved
/// across a save/load cycle.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryDocument {
    files: HashMap<String, LogFileInfo>,
}

#[derive(Serialize)]
struct RegistryDocumentRef<'a> {
    files: &'a HashMap<String, LogFileInfo>,
}

/// Concurrent-safe store of registered log files.
///
/// The in-memory map is the single source of truth; the JSON file on
/// disk exists for durability only and is read exactly once, at load.
/// Reads take the shared lock, mutations take the exclusive lock and
/// rewrite the file wholesale before releasing it.
#[derive(Debug)]
pub struct FileRegistry {
    files: RwLock<HashMap<String, LogFileInfo>>,
    path: PathBuf,
}

impl FileRegistry {
    /// Empty registry persisting to `path`. Nothing is written until
    /// the first mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            path: path.into(),
        }
    }

    /// Load the registry from its persisted document.
    ///
    /// An absent file is an empty registry. An unreadable or malformed
    /// file is an error: starting empty would clobber the document on
    /// the next mutation.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let files = match fs::read(&path) {
            Ok(bytes) => {
                let doc: RegistryDocument = serde_json::from_slice(&bytes)
                    .map_err(|source| StoreError::Malformed {
                        path: path.clone(),
                        source,
                    })?;
                doc.files
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StoreError::Load { path, source }),
        };

        info!(files = files.len(), path = %path.display(), "Registry loaded");
        Ok(Self {
            files: RwLock::new(files),
            path,
        })
    }

    /// Insert under `info.id`, silently overwriting an existing ID.
    ///
    /// IDs are generated fresh so a collision is not expected; only
    /// name uniqueness is checked, by the caller, before insert.
    pub fn add(&self, info: LogFileInfo) {
        let mut files = self.files.write();
        files.insert(info.id.clone(), info);
        self.persist(&files);
    }

    /// Delete the entry if present; a no-op for an unknown ID.
    pub fn remove(&self, id: &str) {
        let mut files = self.files.write();
        files.remove(id);
        self.persist(&files);
    }

    pub fn exists(&self, id: &str) -> bool {
        self.files.read().contains_key(id)
    }

    /// Snapshot of a single entry, cloned out under the shared lock so
    /// callers never hold the lock across file I/O.
    pub fn get(&self, id: &str) -> Option<LogFileInfo> {
        self.files.read().get(id).cloned()
    }

    /// All registered files, in unspecified order.
    pub fn list(&self) -> Vec<LogFileInfo> {
        self.files.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Case-insensitive scan of registered names. Names are sanitized
    /// to ASCII before they reach the store, so ASCII folding is exact.
    pub fn is_name_unique(&self, name: &str) -> bool {
        self.files
            .read()
            .values()
            .all(|f| !f.name.eq_ignore_ascii_case(name))
    }

    /// First free name among `base`, `base-1`, `base-2`, ...
    ///
    /// Each colliding candidate consumes a distinct registered name, so
    /// with N files at most N+1 candidates are probed.
    pub fn unique_name(&self, base: &str) -> String {
        let files = self.files.read();
        let taken = |candidate: &str| {
            files
                .values()
                .any(|f| f.name.eq_ignore_ascii_case(candidate))
        };

        if !taken(base) {
            return base.to_string();
        }
        let mut suffix = 1u64;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Rewrite the persisted document from the map the caller already
    /// holds the write lock on. A write failure is logged and the
    /// in-memory state stays authoritative for the rest of the process
    /// lifetime.
    fn persist(&self, files: &HashMap<String, LogFileInfo>) {
        if let Err(e) = self.save_to_disk(files) {
            error!(path = %self.path.display(), "Registry persistence failed: {e}");
        }
    }

    fn save_to_disk(&self, files: &HashMap<String, LogFileInfo>) -> Result<(), StoreError> {
        let doc = RegistryDocumentRef { files };
        // Serializing the map cannot fail; pretty-print for operators
        let json = serde_json::to_vec_pretty(&doc).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })
    }
}
