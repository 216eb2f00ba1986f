//! On-disk cassette layout.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CassetteError;
use crate::ports::repo::RepoRef;

/// Port name for the text-generation collaborator.
pub const LLM_PORT: &str = "llm";
/// Port name for the repository host.
pub const REPO_PORT: &str = "repo";

/// Recorded input of `repo::list_dir`.
#[derive(Debug, Serialize)]
pub struct ListDirInput<'a> {
    /// Repository owner.
    pub owner: &'a str,
    /// Repository name.
    pub name: &'a str,
    /// Directory path, empty for the root.
    pub path: &'a str,
}

impl<'a> ListDirInput<'a> {
    /// Input for listing `path` in `repo`.
    #[must_use]
    pub fn new(repo: &'a RepoRef, path: &'a str) -> Self {
        Self { owner: &repo.owner, name: &repo.name, path }
    }
}

/// Recorded input of `repo::fetch_raw`.
#[derive(Debug, Serialize)]
pub struct FetchRawInput<'a> {
    /// Download URL.
    pub url: &'a str,
}

/// One call made through a port, with what went in and what came back.
///
/// `output` is `{"ok": value}` or `{"err": message}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the whole recording, across ports.
    pub seq: u64,
    /// [`LLM_PORT`] or [`REPO_PORT`].
    pub port: String,
    /// Port method, e.g. `list_dir`.
    pub method: String,
    /// Call arguments.
    pub input: serde_json::Value,
    /// Call result.
    pub output: serde_json::Value,
}

/// Everything recorded while documenting one repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Session name, `<timestamp>-<port>` for recorded runs.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Repository URL the run was started with.
    pub repo_url: String,
    /// Calls in recording order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Read`] or [`CassetteError::Parse`].
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CassetteError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| CassetteError::Parse { path: path.to_path_buf(), source })
    }

    /// Whether this cassette was recorded for `repo_url`.
    ///
    /// URLs naming the same owner and repository match, so
    /// `https://github.com/o/r.git/` matches `o/r`. URLs that do not parse
    /// only match themselves.
    #[must_use]
    pub fn is_for_repo(&self, repo_url: &str) -> bool {
        match (RepoRef::parse(&self.repo_url), RepoRef::parse(repo_url)) {
            (Some(recorded), Some(requested)) => recorded == requested,
            (None, None) => self.repo_url.trim() == repo_url.trim(),
            _ => false,
        }
    }
}
