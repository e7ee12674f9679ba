use crate::error::{PersistenceError, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;
use tracing::debug;

/// An editable config tree together with the place it is persisted to.
pub trait ConfigStore {
    fn document(&self) -> &DocumentMut;

    fn document_mut(&mut self) -> &mut DocumentMut;

    /// Re-reads the backing text. On failure the current document is kept.
    fn reload(&mut self) -> Result<(), StoreError>;

    /// Persists the whole document.
    fn save(&mut self) -> Result<(), PersistenceError>;
}

/// A config file on disk. A file that doesn't exist yet reads as empty.
pub struct FileStore {
    path: PathBuf,
    doc: DocumentMut,
}

impl FileStore {
    /// Creates a store for `path` without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            doc: DocumentMut::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn document(&self) -> &DocumentMut {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut DocumentMut {
        &mut self.doc
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        let str = match fs::read_to_string(&self.path) {
            Ok(str) => str,
            Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.doc = str.parse::<DocumentMut>()?;
        debug!("read config from {}", self.path.display());
        Ok(())
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        fs::write(&self.path, self.doc.to_string()).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps the config text in memory. Useful for hosts that manage their own
/// files, and for tests.
#[derive(Default)]
pub struct MemoryStore {
    source: String,
    doc: DocumentMut,
    fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    /// Creates a store whose backing text is `source`. Nothing is parsed
    /// until the first [`reload`](ConfigStore::reload).
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// The text as of the last successful save (or as given).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces the backing text, as if the file was edited by hand.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of saves that went through.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ConfigStore for MemoryStore {
    fn document(&self) -> &DocumentMut {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut DocumentMut {
        &mut self.doc
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        self.doc = self.source.parse::<DocumentMut>()?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Rejected("saves are disabled".to_string()));
        }
        self.source = self.doc.to_string();
        self.saves += 1;
        Ok(())
    }
}
