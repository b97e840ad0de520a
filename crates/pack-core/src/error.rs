//! Error types for pack-core

use std::path::PathBuf;

/// Result type for pack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pack-core operations
///
/// Per-file conflicts are never errors; they surface as skipped changes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pack source path that is neither a file nor a directory
    #[error("Unreadable pack source at {path}")]
    UnreadableSource { path: PathBuf },

    /// Filesystem error from pack-fs
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),

    /// Manifest error from pack-manifest
    #[error(transparent)]
    Manifest(#[from] pack_manifest::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
