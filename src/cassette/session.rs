//! A live run recorded into one cassette per port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use super::format::{LLM_PORT, REPO_PORT};
use super::recorder::CassetteRecorder;

/// Recorders for every remote port, sharing one output directory.
///
/// Recording adapters hold clones of the `Arc`s; drop them before
/// [`finish`](Self::finish).
pub struct RecordingSession {
    /// Recorder for text-generation calls.
    pub llm: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for repository listings and downloads.
    pub repo: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Starts a session under `base_dir/<timestamp>/`.
    ///
    /// The timestamp has millisecond precision; a `-N` suffix is added when
    /// the directory is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new_in(base_dir: &Path, repo_url: &str) -> Result<Self, String> {
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let (label, output_dir) = (0..)
            .map(|n| if n == 0 { stamp.clone() } else { format!("{stamp}-{n}") })
            .map(|label| {
                let dir = base_dir.join(&label);
                (label, dir)
            })
            .find(|(_, dir)| !dir.exists())
            .ok_or_else(|| format!("no free cassette directory under {}", base_dir.display()))?;

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("failed to create cassette directory: {e}"))?;

        let recorder = |port: &str| {
            Arc::new(Mutex::new(CassetteRecorder::new(
                output_dir.join(format!("{port}.cassette.yaml")),
                format!("{label}-{port}"),
                repo_url,
            )))
        };
        Ok(Self { llm: recorder(LLM_PORT), repo: recorder(REPO_PORT), output_dir })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette and returns the session directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a cassette
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(shared: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(shared)
                .map_err(|_| format!("recording adapter for {port} still has references"))?
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner);
            if recorder.is_empty() {
                warn!(port, "no calls recorded");
            }
            let calls = recorder.len();
            let path = recorder.finish().map_err(|e| e.to_string())?;
            info!(port, calls, path = %path.display(), "cassette written");
            Ok(())
        }

        finish_one(self.llm, LLM_PORT)?;
        finish_one(self.repo, REPO_PORT)?;
        Ok(self.output_dir)
    }
}
