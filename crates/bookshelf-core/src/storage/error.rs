//! Storage error handling
//!
//! Provides typed errors for persistence slots with descriptive messages
//! and recovery suggestions. The store itself never surfaces these to its
//! callers; they are logged and the in-memory state stays authoritative.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create the storage directory
    #[error("Failed to create storage directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Slot content cannot be parsed as a state document
    #[error("Invalid document format in slot '{slot}': {details}")]
    InvalidFormat { slot: String, details: String },

    /// Slot holds a document written by an incompatible version
    #[error("Slot '{slot}' has document version {found}, expected {expected}")]
    UnsupportedVersion {
        slot: String,
        found: u32,
        expected: u32,
    },

    /// State could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Slot name cannot be used as a storage key
    #[error("Invalid slot name '{0}'")]
    InvalidSlotName(String),

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Backend-specific failure (e.g. an embedding platform's store)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => StorageError::NotFound { path },
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Whether the slot content itself is unusable (as opposed to I/O failing)
    pub fn is_corrupt_state(&self) -> bool {
        matches!(
            self,
            StorageError::InvalidFormat { .. } | StorageError::UnsupportedVersion { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Check file and directory permissions for the data directory.")
            }
            StorageError::InvalidFormat { .. } | StorageError::UnsupportedVersion { .. } => {
                Some("The starter collection was loaded instead. The next change overwrites the stored document.")
            }
            StorageError::InvalidSlotName(_) => {
                Some("Use a store name made of letters, digits, '-', '_' or '.'.")
            }
            StorageError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
