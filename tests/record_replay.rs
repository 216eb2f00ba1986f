//! Record-replay round-trip integration test.
//!
//! Records a full pipeline run against in-memory collaborators, then replays
//! the cassettes twice and checks that every run writes the same README.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use docdraft::adapters::live::filesystem::LiveFileSystem;
use docdraft::adapters::recording::{RecordingLlmClient, RecordingRepoHost};
use docdraft::cassette::config::CassetteConfig;
use docdraft::cassette::session::RecordingSession;
use docdraft::config::SummaryStrategy;
use docdraft::context::ServiceContext;
use docdraft::pipeline::{Pipeline, PipelineOptions, RunReport};
use docdraft::ports::{
    CompletionFuture, CompletionRequest, CompletionResponse, EntryKind, LlmClient, RepoEntry,
    RepoFuture, RepoHost, RepoRef,
};

const REPO_URL: &str = "https://github.com/acme/widget";

struct TreeHost {
    listings: HashMap<&'static str, Vec<RepoEntry>>,
}

fn entry(path: &str, kind: EntryKind, size: u64) -> RepoEntry {
    RepoEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        kind,
        size,
        download_url: (kind == EntryKind::File).then(|| format!("https://raw.example/{path}")),
    }
}

impl TreeHost {
    fn new() -> Self {
        let mut listings = HashMap::new();
        listings.insert(
            "",
            vec![
                entry("app.py", EntryKind::File, 64),
                entry("src", EntryKind::Dir, 0),
                entry("logo.png", EntryKind::File, 512),
                entry("node_modules", EntryKind::Dir, 0),
            ],
        );
        listings.insert("src", vec![entry("src/lib.rs", EntryKind::File, 20)]);
        Self { listings }
    }
}

impl RepoHost for TreeHost {
    fn list_dir(&self, _repo: &RepoRef, path: &str) -> RepoFuture<'_, Vec<RepoEntry>> {
        let listing = self.listings.get(path).cloned().ok_or_else(|| format!("no listing for {path}"));
        Box::pin(async move { listing.map_err(Into::into) })
    }

    fn fetch_raw(&self, url: &str) -> RepoFuture<'_, String> {
        let text = if url.ends_with("app.py") {
            "import os\n\ndef main():\n    \"\"\"Entry.\"\"\"\n".to_string()
        } else {
            "pub fn answer() -> u32 { 42 }\n".to_string()
        };
        Box::pin(async move { Ok(text) })
    }
}

/// Answers with a prefix of the prompt so every response depends on its input.
struct PrefixLlm;

impl LlmClient for PrefixLlm {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let prompt = &request.messages[0].content;
        let text = format!("[{}] {}", prompt.len(), prompt.chars().rev().take(24).collect::<String>());
        Box::pin(async move { Ok(CompletionResponse { text, prompt_tokens: 0, completion_tokens: 0 }) })
    }
}

fn options(output: &Path) -> PipelineOptions {
    PipelineOptions {
        model: "test-model".into(),
        max_tokens: Some(512),
        strategy: SummaryStrategy::WholeFile,
        output: output.to_path_buf(),
    }
}

fn run_pipeline(ctx: &ServiceContext, output: &Path) -> RunReport {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    runtime.block_on(Pipeline::new(ctx, options(output)).run(REPO_URL)).unwrap()
}

#[test]
fn record_then_replay_produces_identical_documents() {
    let dir = std::env::temp_dir().join("docdraft_record_replay_test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    // --- Phase 1: record a run against the in-memory collaborators ---
    let session = RecordingSession::new_in(&dir.join("cassettes"), REPO_URL).unwrap();
    let ctx = ServiceContext::from_parts(
        Box::new(RecordingLlmClient::new(Box::new(PrefixLlm), Arc::clone(&session.llm))),
        Box::new(RecordingRepoHost::new(Box::new(TreeHost::new()), Arc::clone(&session.repo))),
        Box::new(LiveFileSystem),
    );
    let recorded_path = dir.join("recorded.md");
    let recorded = run_pipeline(&ctx, &recorded_path);
    drop(ctx);
    let cassette_dir = session.finish().unwrap();

    assert_eq!(recorded.file_count, 2);
    assert_eq!(recorded.skipped, 0);

    let config = CassetteConfig {
        llm: Some(cassette_dir.join("llm.cassette.yaml")),
        repo: Some(cassette_dir.join("repo.cassette.yaml")),
    };

    // 2 listings + 2 downloads, then 2 summaries + 1 synthesis.
    let repo_cassette = CassetteConfig::load_cassette(config.repo.as_deref().unwrap(), REPO_URL).unwrap();
    assert_eq!(repo_cassette.interactions.len(), 4);
    let llm_cassette = CassetteConfig::load_cassette(config.llm.as_deref().unwrap(), REPO_URL).unwrap();
    assert_eq!(llm_cassette.interactions.len(), 3);

    // --- Phase 2: replay twice ---
    let first_path = dir.join("first.md");
    let first = run_pipeline(&ServiceContext::replaying_from(&config, REPO_URL).unwrap(), &first_path);
    let second_path = dir.join("second.md");
    let second = run_pipeline(&ServiceContext::replaying_from(&config, REPO_URL).unwrap(), &second_path);

    let recorded_bytes = std::fs::read(&recorded_path).unwrap();
    assert_eq!(std::fs::read(&first_path).unwrap(), recorded_bytes);
    assert_eq!(std::fs::read(&second_path).unwrap(), recorded_bytes);
    assert_eq!(first.document, recorded.document);
    assert_eq!(second.file_count, recorded.file_count);

    // The same cassettes cannot stand in for another repository.
    let err = ServiceContext::replaying_from(&config, "https://github.com/someone/else")
        .err()
        .unwrap();
    assert!(err.contains("someone/else"));

    let _ = std::fs::remove_dir_all(&dir);
}
