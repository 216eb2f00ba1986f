//! Live adapter for the `RepoHost` port using the GitHub contents API.

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder};

use crate::config::GithubEndpoint;
use crate::ports::repo::{RepoEntry, RepoFuture, RepoHost, RepoRef};
use crate::ports::BoxError;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const AGENT: &str = concat!("docdraft/", env!("CARGO_PKG_VERSION"));

/// Live repository host backed by `GET /repos/{owner}/{repo}/contents/{path}`.
pub struct LiveRepoHost {
    client: Client,
    endpoint: GithubEndpoint,
}

impl LiveRepoHost {
    /// Creates a new live repository host for the given endpoint.
    #[must_use]
    pub fn new(endpoint: GithubEndpoint) -> Self {
        Self { client: Client::new(), endpoint }
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.endpoint.api_url.trim_end_matches('/'),
            repo.owner,
            repo.name,
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(USER_AGENT, AGENT);
        match &self.endpoint.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl RepoHost for LiveRepoHost {
    fn list_dir(&self, repo: &RepoRef, path: &str) -> RepoFuture<'_, Vec<RepoEntry>> {
        let url = self.contents_url(repo, path);

        Box::pin(async move {
            let response = self
                .authorized(self.client.get(&url).header(ACCEPT, GITHUB_ACCEPT))
                .send()
                .await
                .map_err(|e| -> BoxError { format!("listing request failed: {e}").into() })?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("listing returned HTTP {}", status.as_u16()).into());
            }

            response
                .json::<Vec<RepoEntry>>()
                .await
                .map_err(|e| -> BoxError { format!("failed to parse listing: {e}").into() })
        })
    }

    fn fetch_raw(&self, download_url: &str) -> RepoFuture<'_, String> {
        let url = download_url.to_string();

        Box::pin(async move {
            let response = self
                .authorized(self.client.get(&url))
                .send()
                .await
                .map_err(|e| -> BoxError { format!("download failed: {e}").into() })?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("download returned HTTP {}", status.as_u16()).into());
            }

            response
                .text()
                .await
                .map_err(|e| -> BoxError { format!("failed to read download body: {e}").into() })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(api_url: &str) -> LiveRepoHost {
        LiveRepoHost::new(GithubEndpoint { api_url: api_url.into(), token: None })
    }

    #[test]
    fn contents_url_for_root_and_subpath() {
        let host = host("https://api.github.com/");
        let repo = RepoRef { owner: "o".into(), name: "r".into() };
        assert_eq!(host.contents_url(&repo, ""), "https://api.github.com/repos/o/r/contents/");
        assert_eq!(
            host.contents_url(&repo, "src/lib"),
            "https://api.github.com/repos/o/r/contents/src/lib"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let host = host("http://127.0.0.1:9");
        let repo = RepoRef { owner: "o".into(), name: "r".into() };
        assert!(host.list_dir(&repo, "").await.is_err());
        assert!(host.fetch_raw("http://127.0.0.1:9/raw/a.py").await.is_err());
    }
}
