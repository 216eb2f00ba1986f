//! Recording adapter for the `RepoHost` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::format::{FetchRawInput, ListDirInput, REPO_PORT};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::repo::{RepoEntry, RepoFuture, RepoHost, RepoRef};

/// Records repository host interactions while delegating to an inner implementation.
pub struct RecordingRepoHost {
    inner: Box<dyn RepoHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingRepoHost {
    /// Creates a new recording host wrapping the given implementation.
    #[must_use]
    pub fn new(inner: Box<dyn RepoHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl RepoHost for RecordingRepoHost {
    fn list_dir(&self, repo: &RepoRef, path: &str) -> RepoFuture<'_, Vec<RepoEntry>> {
        let repo = repo.clone();
        let path = path.to_string();

        Box::pin(async move {
            let result = self.inner.list_dir(&repo, &path).await;
            let input = ListDirInput::new(&repo, &path);
            record_result(&self.recorder, REPO_PORT, "list_dir", &input, &result);
            result
        })
    }

    fn fetch_raw(&self, download_url: &str) -> RepoFuture<'_, String> {
        let url = download_url.to_string();

        Box::pin(async move {
            let result = self.inner.fetch_raw(&url).await;
            record_result(&self.recorder, REPO_PORT, "fetch_raw", &FetchRawInput { url: &url }, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use crate::ports::BoxError;

    struct Missing;

    impl RepoHost for Missing {
        fn list_dir(&self, _repo: &RepoRef, _path: &str) -> RepoFuture<'_, Vec<RepoEntry>> {
            Box::pin(async { Err::<Vec<RepoEntry>, BoxError>("listing returned HTTP 404".into()) })
        }

        fn fetch_raw(&self, _download_url: &str) -> RepoFuture<'_, String> {
            Box::pin(async { Ok("print('hi')".to_string()) })
        }
    }

    #[tokio::test]
    async fn records_errors_and_successes() {
        let dir = std::env::temp_dir().join("docdraft_rec_repo_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("repo.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "o/r")));

        {
            let host = RecordingRepoHost::new(Box::new(Missing), Arc::clone(&recorder));
            let repo = RepoRef { owner: "o".into(), name: "r".into() };
            assert!(host.list_dir(&repo, "src").await.is_err());
            assert_eq!(host.fetch_raw("https://raw/a.py").await.unwrap(), "print('hi')");
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.interactions[0].input["path"], "src");
        assert_eq!(cassette.interactions[0].output["err"], "listing returned HTTP 404");
        assert_eq!(cassette.interactions[1].output["ok"], "print('hi')");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
