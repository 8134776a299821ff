// src/fs/mock.rs

use super::FileSystem;
use anyhow::Result;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
    /// Reading this path fails with the given error kind.
    Unreadable(io::ErrorKind),
}

/// In-memory filesystem keyed by exact path.
///
/// Every `read_to_string` call is recorded so tests can assert which
/// configuration files were consulted and in which order.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        // Parent directories exist implicitly.
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            entries.entry(dir.to_path_buf()).or_insert(MockEntry::Dir);
            parent = dir.parent();
        }

        entries.insert(path, MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(path.as_ref().to_path_buf(), MockEntry::Dir);
    }

    pub fn add_unreadable(&self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(path.as_ref().to_path_buf(), MockEntry::Unreadable(kind));
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(path.as_ref());
    }

    /// Paths passed to `read_to_string`, oldest first.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());

        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(path) {
            Some(MockEntry::File(content)) => String::from_utf8(content.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Some(MockEntry::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {:?}", path),
            )),
            Some(MockEntry::Unreadable(kind)) => {
                Err(io::Error::new(*kind, format!("cannot read {:?}", path)))
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(entries.get(path), Some(MockEntry::Dir))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // Paths are stored verbatim; absolute paths are assumed in tests.
        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such path: {:?}", path),
            ))
        }
    }
}
