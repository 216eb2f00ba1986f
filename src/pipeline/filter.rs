//! Inclusion policy for repository entries.

use std::path::Path;

use crate::ports::repo::{EntryKind, RepoEntry};

/// Directory names never descended into.
pub const SKIP_DIRS: &[&str] =
    &["node_modules", ".git", "dist", "build", "__pycache__", "venv", ".idea"];

/// File extensions (with leading dot) never downloaded.
pub const SKIP_EXTENSIONS: &[&str] =
    &[".png", ".jpg", ".jpeg", ".gif", ".pdf", ".ico", ".mp4", ".zip", ".exe", ".dll"];

/// Files larger than this many bytes are skipped.
pub const MAX_FILE_BYTES: u64 = 200_000;

/// Why an entry was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Directory name is on the blocklist.
    BlockedDir,
    /// File extension is on the blocklist.
    BlockedExtension(String),
    /// File exceeds [`MAX_FILE_BYTES`].
    TooLarge(u64),
}

/// Decides whether `entry` takes part in the walk.
///
/// Matching is exact and case-sensitive. Entries that are neither files nor
/// directories pass the filter; the walker ignores them.
///
/// # Errors
///
/// Returns the [`Exclusion`] reason when the entry is filtered out.
pub fn check(entry: &RepoEntry) -> Result<(), Exclusion> {
    match entry.kind {
        EntryKind::Dir if SKIP_DIRS.contains(&entry.name.as_str()) => Err(Exclusion::BlockedDir),
        EntryKind::File => {
            if let Some(ext) = extension(&entry.name) {
                if SKIP_EXTENSIONS.contains(&ext.as_str()) {
                    return Err(Exclusion::BlockedExtension(ext));
                }
            }
            if entry.size > MAX_FILE_BYTES {
                return Err(Exclusion::TooLarge(entry.size));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Dotted extension of `name`; dotfiles like `.gitignore` have none.
#[must_use]
pub fn extension(name: &str) -> Option<String> {
    Path::new(name).extension().and_then(|e| e.to_str()).map(|e| format!(".{e}"))
}
