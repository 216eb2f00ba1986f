//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::LiveLlmClient;
use crate::adapters::live::repo::LiveRepoHost;
use crate::adapters::recording::{RecordingLlmClient, RecordingRepoHost};
use crate::adapters::replaying::{ReplayingLlmClient, ReplayingRepoHost};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::{CompletionFuture, CompletionRequest, LlmClient};
use crate::ports::repo::{RepoEntry, RepoFuture, RepoHost, RepoRef};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// LLM client for chat completions.
    pub llm: Box<dyn LlmClient>,
    /// Repository host for listings and raw downloads.
    pub repo: Box<dyn RepoHost>,
    /// Filesystem for persisting the generated document.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn from_parts(
        llm: Box<dyn LlmClient>,
        repo: Box<dyn RepoHost>,
        fs: Box<dyn FileSystem>,
    ) -> Self {
        Self { llm, repo, fs }
    }

    /// Creates a live context talking to the configured endpoints.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self {
            llm: Box::new(LiveLlmClient::new(settings.llm.clone())),
            repo: Box::new(LiveRepoHost::new(settings.github.clone())),
            fs: Box::new(LiveFileSystem),
        }
    }

    /// Creates a live context whose remote calls are recorded to per-port
    /// cassettes under `base_dir`.
    ///
    /// The returned session must be finished after this context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(
        base_dir: &Path,
        settings: &Settings,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(base_dir, &settings.repo_url)?;
        let ctx = Self {
            llm: Box::new(RecordingLlmClient::new(
                Box::new(LiveLlmClient::new(settings.llm.clone())),
                Arc::clone(&session.llm),
            )),
            repo: Box::new(RecordingRepoHost::new(
                Box::new(LiveRepoHost::new(settings.github.clone())),
                Arc::clone(&session.repo),
            )),
            fs: Box::new(LiveFileSystem),
        };
        Ok((ctx, session))
    }

    /// Creates a context that replays both remote ports from one cassette
    /// recorded for `repo_url`.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    /// The filesystem stays live.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed, or was
    /// recorded for another repository.
    pub fn replaying(path: &Path, repo_url: &str) -> Result<Self, String> {
        let cassette =
            CassetteConfig::load_cassette(path, repo_url).map_err(|e| e.to_string())?;
        Ok(Self {
            llm: Box::new(ReplayingLlmClient::new(CassetteReplayer::new(&cassette))),
            repo: Box::new(ReplayingRepoHost::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(LiveFileSystem),
        })
    }

    /// Creates a replaying context from per-port cassette files recorded for
    /// `repo_url`.
    ///
    /// Ports without a configured cassette panic with a clear message when
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be used for `repo_url`.
    pub fn replaying_from(config: &CassetteConfig, repo_url: &str) -> Result<Self, String> {
        let replayers = config.load_all(repo_url).map_err(|e| e.to_string())?;

        Ok(Self {
            llm: match replayers.llm {
                Some(r) => Box::new(ReplayingLlmClient::new(r)),
                None => Box::new(PanickingLlmClient),
            },
            repo: match replayers.repo {
                Some(r) => Box::new(ReplayingRepoHost::new(r)),
                None => Box::new(PanickingRepoHost),
            },
            fs: Box::new(LiveFileSystem),
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingLlmClient;
impl LlmClient for PanickingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        panic!("LlmClient port not configured in CassetteConfig: no cassette loaded for llm");
    }
}

struct PanickingRepoHost;
impl RepoHost for PanickingRepoHost {
    fn list_dir(&self, _repo: &RepoRef, _path: &str) -> RepoFuture<'_, Vec<RepoEntry>> {
        panic!("RepoHost port not configured in CassetteConfig: no cassette loaded for repo");
    }

    fn fetch_raw(&self, _download_url: &str) -> RepoFuture<'_, String> {
        panic!("RepoHost port not configured in CassetteConfig: no cassette loaded for repo");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            repo_url: "o/r".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn replaying_context_serves_both_ports() {
        let dir = std::env::temp_dir().join("docdraft_ctx_test_mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("full.cassette.yaml");

        write_cassette(
            &path,
            vec![
                Interaction {
                    seq: 0,
                    port: "repo".into(),
                    method: "list_dir".into(),
                    input: json!({}),
                    output: json!({"ok": []}),
                },
                Interaction {
                    seq: 1,
                    port: "llm".into(),
                    method: "complete".into(),
                    input: json!({}),
                    output: json!({"ok": {"text": "# Title"}}),
                },
            ],
        );

        let ctx = ServiceContext::replaying(&path, "https://github.com/o/r").unwrap();
        let repo = RepoRef { owner: "o".into(), name: "r".into() };
        assert!(ctx.repo.list_dir(&repo, "").await.unwrap().is_empty());
        let response = ctx.llm.complete(&CompletionRequest::single("m", "p")).await.unwrap();
        assert_eq!(response.text, "# Title");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn cassette_for_another_repository_is_refused() {
        let dir = std::env::temp_dir().join("docdraft_ctx_test_other_repo");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("widget.cassette.yaml");
        write_cassette(&path, Vec::new());

        let err = ServiceContext::replaying(&path, "https://github.com/someone/else").err().unwrap();
        assert!(err.contains("recorded for \"o/r\""));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified(), "o/r").unwrap();
        let _ = ctx.repo.fetch_raw("https://raw/a.py");
    }
}
