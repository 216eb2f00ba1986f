//! Run settings resolved from CLI flags and the environment.
//!
//! Credentials are read as-is and never validated here: a missing token
//! surfaces later as an authentication failure from the remote call.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::Cli;

/// Deployment variant of the text-generation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// `OpenRouter` chat-completions API.
    #[value(name = "openrouter")]
    OpenRouter,
    /// Hugging Face inference router.
    #[value(name = "huggingface")]
    HuggingFace,
}

impl Provider {
    /// Chat-completions base URL.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::HuggingFace => "https://router.huggingface.co/v1",
        }
    }

    /// Environment variable holding the API key.
    #[must_use]
    pub fn key_var(self) -> &'static str {
        match self {
            Self::OpenRouter => "OPEN_AI_KEY",
            Self::HuggingFace => "HF_TOKEN",
        }
    }

    /// Model used when none is configured.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenRouter => "minimax/minimax-m2:free",
            Self::HuggingFace => "deepseek-ai/DeepSeek-V3.2-Exp:novita",
        }
    }
}

/// Where and how to reach the text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmEndpoint {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Bearer key, if configured.
    pub api_key: Option<String>,
    /// Optional `HTTP-Referer` attribution header.
    pub app_url: Option<String>,
    /// Optional `X-Title` attribution header.
    pub app_title: Option<String>,
}

/// Where and how to reach the repository contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubEndpoint {
    /// API base URL.
    pub api_url: String,
    /// Bearer token, if configured.
    pub token: Option<String>,
}

/// How each file is turned into a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStrategy {
    /// One request per file with the whole content.
    WholeFile,
    /// One request per fixed-size character window, joined with newlines.
    Chunked {
        /// Window size in characters.
        max_chars: usize,
    },
}

/// Fully resolved settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Repository URL to document.
    pub repo_url: String,
    /// Text-generation endpoint.
    pub llm: LlmEndpoint,
    /// Repository contents endpoint.
    pub github: GithubEndpoint,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Token cap per completion.
    pub max_tokens: Option<u32>,
    /// Summarization strategy.
    pub strategy: SummaryStrategy,
    /// Output document path.
    pub output: PathBuf,
}

impl Settings {
    /// Resolves settings from parsed CLI flags and the process environment.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    /// Resolves settings using `lookup` for credential variables.
    #[must_use]
    pub fn resolve(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let llm = LlmEndpoint {
            base_url: cli
                .llm_base_url
                .clone()
                .unwrap_or_else(|| cli.provider.base_url().to_string()),
            api_key: non_empty(cli.provider.key_var()),
            app_url: non_empty("DOCDRAFT_APP_URL"),
            app_title: non_empty("DOCDRAFT_APP_TITLE"),
        };
        let github =
            GithubEndpoint { api_url: cli.github_api_url.clone(), token: non_empty("GITHUB_TOKEN") };
        let strategy = match cli.chunk_size {
            Some(n) => SummaryStrategy::Chunked { max_chars: n as usize },
            None => SummaryStrategy::WholeFile,
        };

        Self {
            repo_url: cli.repo_url.clone(),
            llm,
            github,
            model: cli.model.clone().unwrap_or_else(|| cli.provider.default_model().to_string()),
            max_tokens: cli.max_tokens,
            strategy,
            output: cli.output.clone(),
        }
    }
}
