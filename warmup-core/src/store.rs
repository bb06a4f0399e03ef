//! Durable key-value storage behind the persistence bridge.
//!
//! The engine only ever talks to a [`KeyValueStore`]; tests use
//! [`MemoryStore`], the application uses [`FileStore`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt state document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    #[error("Store is read-only")]
    ReadOnly,
}

/// String-keyed storage of serialized values.
pub trait KeyValueStore {
    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write several values. Either all become visible or none do.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.set_many(&[(key, value)])
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Raw access for tests that plant corrupt or outdated records.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        for (key, value) in entries {
            self.values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.values.remove(key);
        Ok(())
    }
}

/// Name of the document holding every record of a [`FileStore`].
pub const STATE_FILE: &str = "state.json";

/// A single JSON document, mapping keys to values, inside a state directory.
///
/// Every write replaces the whole document through a temporary sibling and
/// one rename, so a batch lands completely or not at all and a crash never
/// leaves a truncated record behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the state document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    fn check_key(key: &str) -> Result<(), StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(self.path()) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// The current document, or an empty one if it no longer parses. A
    /// corrupt document is unreadable anyway, so writes start over.
    fn document_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_document() {
            Err(StoreError::Json(e)) => {
                tracing::warn!(path = %self.path().display(), error = %e, "replacing corrupt state document");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(document)?;
        let path = self.path();
        let tmp = path.with_extension("json.tmp");

        let written = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            if tmp.is_file() {
                let _ = fs::remove_file(&tmp);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::check_key(key)?;
        Ok(self.read_document()?.remove(key))
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, _) in entries {
            Self::check_key(key)?;
        }

        let mut document = self.document_for_write()?;
        for (key, value) in entries {
            document.insert((*key).to_string(), value.clone());
        }
        self.write_document(&document)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::check_key(key)?;
        let mut document = self.document_for_write()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
