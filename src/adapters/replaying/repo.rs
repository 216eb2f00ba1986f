//! Replaying adapter for the `RepoHost` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::format::{FetchRawInput, ListDirInput, REPO_PORT};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::repo::{RepoEntry, RepoFuture, RepoHost, RepoRef};

/// Serves recorded directory listings and downloads from a cassette.
pub struct ReplayingRepoHost {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingRepoHost {
    /// Create a replaying host backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl RepoHost for ReplayingRepoHost {
    fn list_dir(&self, repo: &RepoRef, path: &str) -> RepoFuture<'_, Vec<RepoEntry>> {
        let output =
            next_output(&self.replayer, REPO_PORT, "list_dir", &ListDirInput::new(repo, path));
        Box::pin(async move { replay_result(output, "repo::list_dir") })
    }

    fn fetch_raw(&self, download_url: &str) -> RepoFuture<'_, String> {
        let output = next_output(
            &self.replayer,
            REPO_PORT,
            "fetch_raw",
            &FetchRawInput { url: download_url },
        );
        Box::pin(async move { replay_result(output, "repo::fetch_raw") })
    }
}
