//! Which cassette serves which port during replay.

use std::path::{Path, PathBuf};

use super::error::CassetteError;
use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette paths. A port without a path panics on first use.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the text-generation collaborator.
    pub llm: Option<PathBuf>,
    /// Cassette for the repository host.
    pub repo: Option<PathBuf>,
}

/// Replayers built from a [`CassetteConfig`].
pub struct PortReplayers {
    /// Replayer for the text-generation collaborator.
    pub llm: Option<CassetteReplayer>,
    /// Replayer for the repository host.
    pub repo: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Loads the cassette at `path`, requiring it to be a recording of
    /// `repo_url`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or with
    /// [`CassetteError::RepoMismatch`] if it documents another repository.
    pub fn load_cassette(path: &Path, repo_url: &str) -> Result<Cassette, CassetteError> {
        let cassette = Cassette::load(path)?;
        if !cassette.is_for_repo(repo_url) {
            return Err(CassetteError::RepoMismatch {
                path: path.to_path_buf(),
                recorded: cassette.repo_url,
                requested: repo_url.to_string(),
            });
        }
        Ok(cassette)
    }

    /// Loads every configured cassette for a run over `repo_url`.
    ///
    /// # Errors
    ///
    /// Fails on the first cassette that [`load_cassette`](Self::load_cassette)
    /// rejects.
    pub fn load_all(&self, repo_url: &str) -> Result<PortReplayers, CassetteError> {
        let load = |path: &PathBuf| {
            Self::load_cassette(path, repo_url).map(|cassette| CassetteReplayer::new(&cassette))
        };
        Ok(PortReplayers {
            llm: self.llm.as_ref().map(&load).transpose()?,
            repo: self.repo.as_ref().map(&load).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn loads_only_the_configured_ports() {
        let dir = std::env::temp_dir().join("docdraft_config_test_ports");
        std::fs::create_dir_all(&dir).unwrap();
        let llm_path = dir.join("llm.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&llm_path, "llm", "https://github.com/o/r");
        recorder.record("llm", "complete", json!({}), json!({"ok": {"text": "summary"}}));
        recorder.finish().unwrap();

        let config = CassetteConfig { llm: Some(llm_path), ..CassetteConfig::default() };
        let mut replayers = config.load_all("o/r").unwrap();

        let llm = replayers.llm.as_mut().unwrap();
        let served = llm.next_interaction("llm", "complete", &json!({})).unwrap();
        assert_eq!(served.output["ok"]["text"], "summary");
        assert!(replayers.repo.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn cassette_for_another_repository_is_rejected() {
        let dir = std::env::temp_dir().join("docdraft_config_test_mismatch");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("repo.cassette.yaml");
        CassetteRecorder::new(&path, "repo", "https://github.com/acme/widget").finish().unwrap();

        let config = CassetteConfig { repo: Some(path), ..CassetteConfig::default() };
        let err = config.load_all("https://github.com/someone/else").err().unwrap();
        assert!(matches!(err, CassetteError::RepoMismatch { .. }));
        assert!(err.to_string().contains("someone/else"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_cassette_file_is_a_read_error() {
        let config = CassetteConfig {
            repo: Some(PathBuf::from("/nonexistent/docdraft/repo.cassette.yaml")),
            ..CassetteConfig::default()
        };
        let err = config.load_all("o/r").err().unwrap();
        assert!(matches!(err, CassetteError::Read { .. }));
    }

    #[test]
    fn load_all_with_no_cassettes() {
        let replayers = CassetteConfig::panic_on_unspecified().load_all("o/r").unwrap();
        assert!(replayers.llm.is_none());
        assert!(replayers.repo.is_none());
    }
}
