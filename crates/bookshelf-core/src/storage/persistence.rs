//! Persistence slots
//!
//! A slot is a named text value in device-local key-value storage. The store
//! keeps its whole state as one JSON document in a single slot.
//!
//! Backends:
//! - [`FileStorage`] - one file per slot under a directory, atomic writes
//! - [`MemoryStorage`] - shared in-memory map, for tests and embedding
//!
//! Storage location for files: `~/.local/share/bookshelf/` (configurable via `Config`)

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::Config;

use super::error::{StorageError, StorageResult};

/// Named-slot key-value storage for serialized state
pub trait StateStorage {
    /// Read a slot. Returns `None` if the slot has never been written.
    fn get_item(&self, name: &str) -> StorageResult<Option<String>>;

    /// Replace the content of a slot
    fn set_item(&self, name: &str, value: &str) -> StorageResult<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove_item(&self, name: &str) -> StorageResult<()>;
}

impl<S: StateStorage + ?Sized> StateStorage for Box<S> {
    fn get_item(&self, name: &str) -> StorageResult<Option<String>> {
        (**self).get_item(name)
    }

    fn set_item(&self, name: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(name, value)
    }

    fn remove_item(&self, name: &str) -> StorageResult<()> {
        (**self).remove_item(name)
    }
}

/// File-backed slots: each slot is `<dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create file storage rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create file storage in the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir.clone())
    }

    /// The directory holding slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a slot
    pub fn slot_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_slot_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Check if a slot has been written
    pub fn exists(&self, name: &str) -> bool {
        self.slot_path(name).map(|p| p.exists()).unwrap_or(false)
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, name: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(name)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StorageError::PermissionDenied { path, source: e })
            }
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn set_item(&self, name: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(name)?;
        atomic_write(&path, value.as_bytes())
    }

    fn remove_item(&self, name: &str) -> StorageResult<()> {
        let path = self.slot_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }
}

/// In-memory slots
///
/// Clones share the same underlying map, so a test can hand one clone to a
/// store and inspect or reuse the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently written
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Poisoning is ignored: every critical section is a single map call
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, name: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(name).cloned())
    }

    fn set_item(&self, name: &str, value: &str) -> StorageResult<()> {
        self.lock().insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, name: &str) -> StorageResult<()> {
        self.lock().remove(name);
        Ok(())
    }
}

/// Check that a slot name is usable as a file name
///
/// Allowed: ASCII letters, digits, `-`, `_` and `.`, not starting with a dot.
pub fn validate_slot_name(name: &str) -> StorageResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSlotName(name.to_string()))
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
