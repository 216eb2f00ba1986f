//! Depth-first walk of a hosted repository into a flat list of files.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::compress::compress_for_path;
use super::filter;
use crate::ports::repo::{EntryKind, RepoEntry, RepoHost, RepoRef};

/// One included file, possibly compressed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// Repository-relative path.
    pub path: String,
    /// Raw or compressed text.
    pub content: String,
}

/// A part of the tree that could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalkFailure {
    /// A directory listing failed; its whole subtree is missing.
    #[error("listing {path:?} failed: {reason}")]
    Traversal {
        /// Directory path (empty for the root).
        path: String,
        /// Failure description from the host.
        reason: String,
    },
    /// A single file download failed; the file is missing.
    #[error("reading {path} failed: {reason}")]
    Fetch {
        /// File path.
        path: String,
        /// Failure description from the host.
        reason: String,
    },
}

/// Everything a walk produced: files in pre-order, plus what was lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Included files in depth-first pre-order.
    pub files: Vec<FileRecord>,
    /// Listing and download failures, in the order they happened.
    pub failures: Vec<WalkFailure>,
}

/// Walks a repository through a [`RepoHost`].
///
/// Uses an explicit stack instead of recursion. A directory's children are
/// pushed in reverse listing order as soon as it is reached, so popping
/// yields the same pre-order a recursive walk would.
pub struct RepositoryWalker<'a> {
    host: &'a dyn RepoHost,
}

impl<'a> RepositoryWalker<'a> {
    /// Creates a walker over `host`.
    #[must_use]
    pub fn new(host: &'a dyn RepoHost) -> Self {
        Self { host }
    }

    /// Walks `repo` from its root.
    ///
    /// Never fails as a whole: a failed listing drops that subtree and a
    /// failed download drops that file, both recorded in
    /// [`WalkOutcome::failures`].
    pub async fn walk(&self, repo: &RepoRef) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut pending: Vec<RepoEntry> = Vec::new();

        self.expand(repo, "", &mut pending, &mut outcome).await;

        while let Some(entry) = pending.pop() {
            if let Err(reason) = filter::check(&entry) {
                trace!(path = %entry.path, ?reason, "excluded");
                continue;
            }
            match entry.kind {
                EntryKind::Dir => self.expand(repo, &entry.path, &mut pending, &mut outcome).await,
                EntryKind::File => match self.fetch(&entry).await {
                    Ok(record) => outcome.files.push(record),
                    Err(failure) => outcome.failures.push(failure),
                },
                EntryKind::Other => trace!(path = %entry.path, "not a file or directory"),
            }
        }

        debug!(
            repo = %repo,
            files = outcome.files.len(),
            failures = outcome.failures.len(),
            "walk finished"
        );
        outcome
    }

    async fn expand(
        &self,
        repo: &RepoRef,
        path: &str,
        pending: &mut Vec<RepoEntry>,
        outcome: &mut WalkOutcome,
    ) {
        match self.host.list_dir(repo, path).await {
            Ok(entries) => pending.extend(entries.into_iter().rev()),
            Err(e) => outcome
                .failures
                .push(WalkFailure::Traversal { path: path.to_string(), reason: e.to_string() }),
        }
    }

    async fn fetch(&self, entry: &RepoEntry) -> Result<FileRecord, WalkFailure> {
        let fail = |reason: String| WalkFailure::Fetch { path: entry.path.clone(), reason };
        let url = entry.download_url.as_deref().ok_or_else(|| fail("no download url".into()))?;
        let text = self.host.fetch_raw(url).await.map_err(|e| fail(e.to_string()))?;
        Ok(FileRecord { path: entry.path.clone(), content: compress_for_path(&entry.path, text) })
    }
}
