//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Provider;

/// Top-level CLI parser for `docdraft`.
#[derive(Debug, Parser)]
#[command(name = "docdraft", version, about = "Draft a README for a remote repository")]
pub struct Cli {
    /// Repository URL, e.g. `https://github.com/owner/repo`.
    pub repo_url: String,

    /// Where to write the generated document (overwritten if present).
    #[arg(long, env = "DOCDRAFT_OUTPUT", default_value = "GENERATED_README.md")]
    pub output: PathBuf,

    /// Text-generation provider.
    #[arg(long, value_enum, env = "DOCDRAFT_PROVIDER", default_value_t = Provider::OpenRouter)]
    pub provider: Provider,

    /// Model identifier; defaults to the provider's model.
    #[arg(long, env = "DOCDRAFT_MODEL")]
    pub model: Option<String>,

    /// Override the provider's chat-completions base URL.
    #[arg(long, env = "DOCDRAFT_LLM_BASE_URL")]
    pub llm_base_url: Option<String>,

    /// Repository contents API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// Summarize files in windows of this many characters (2000 if given bare).
    #[arg(
        long,
        env = "DOCDRAFT_CHUNK_SIZE",
        num_args = 0..=1,
        default_missing_value = "2000",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub chunk_size: Option<u32>,

    /// Cap on tokens generated per completion.
    #[arg(long, env = "DOCDRAFT_MAX_TOKENS")]
    pub max_tokens: Option<u32>,
}
