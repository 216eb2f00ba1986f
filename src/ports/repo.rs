//! Repository host port: directory listings and raw file downloads.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::BoxError;

/// Boxed future type alias used by [`RepoHost`] to keep the trait dyn-compatible.
pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send + 'a>>;

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Parses a repository reference from the last two path segments of `url`.
    ///
    /// Accepts full URLs (`https://github.com/owner/repo`), trailing slashes,
    /// a trailing `.git`, and bare `owner/repo` strings. Returns `None` when
    /// fewer than two segments are present.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., owner, name] => Some(Self { owner: (*owner).to_string(), name: (*name).to_string() }),
            _ => None,
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of a directory-listing entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symlinks, submodules and anything else the host reports.
    #[serde(other)]
    Other,
}

/// One entry returned by a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoEntry {
    /// File or directory name (last path segment).
    pub name: String,
    /// Repository-relative path.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes (zero for directories).
    #[serde(default)]
    pub size: u64,
    /// Raw content URL; absent for directories.
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Lists repository directories and downloads raw file contents.
pub trait RepoHost: Send + Sync {
    /// Lists the entries of `path` (empty string for the root), in host order.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success response or transport failure.
    fn list_dir(&self, repo: &RepoRef, path: &str) -> RepoFuture<'_, Vec<RepoEntry>>;

    /// Downloads the raw text behind a listing entry's `download_url`.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success response or transport failure.
    fn fetch_raw(&self, download_url: &str) -> RepoFuture<'_, String>;
}
