//! Filesystem port for persisting the generated document.

use std::path::Path;

use super::BoxError;

/// Provides write access to local storage.
///
/// Abstracting the filesystem lets tests capture the artifact in memory
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), BoxError>;
}
