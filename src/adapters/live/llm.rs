//! Live adapter for the `LlmClient` port using an OpenAI-compatible
//! chat-completions endpoint (OpenRouter, Hugging Face router, ...).

use reqwest::Client;
use serde::Deserialize;

use crate::config::LlmEndpoint;
use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
use crate::ports::BoxError;

/// Live LLM client that posts to `{base_url}/chat/completions`.
pub struct LiveLlmClient {
    client: Client,
    endpoint: LlmEndpoint,
}

impl LiveLlmClient {
    /// Creates a new live LLM client for the given endpoint.
    #[must_use]
    pub fn new(endpoint: LlmEndpoint) -> Self {
        Self { client: Client::new(), endpoint }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.base_url.trim_end_matches('/'))
    }
}

/// Top-level response from a chat-completions endpoint.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token usage; many providers omit it.
#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Error body returned by OpenAI-compatible endpoints.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let mut builder = self.client.post(self.completions_url()).json(&request);
            if let Some(key) = &self.endpoint.api_key {
                builder = builder.bearer_auth(key);
            }
            if let Some(url) = &self.endpoint.app_url {
                builder = builder.header("HTTP-Referer", url);
            }
            if let Some(title) = &self.endpoint.app_title {
                builder = builder.header("X-Title", title);
            }

            let response = builder.send().await.map_err(|e| -> BoxError {
                format!("chat completion request failed: {e}").into()
            })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| -> BoxError {
                format!("failed to read chat completion response: {e}").into()
            })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(format!("chat completion error ({}): {msg}", status.as_u16()).into());
            }

            let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| -> BoxError {
                format!("failed to parse chat completion response: {e}").into()
            })?;

            let choice = parsed
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| -> BoxError { "chat completion returned no choices".into() })?;
            let usage = parsed.usage.unwrap_or(Usage { prompt_tokens: 0, completion_tokens: 0 });

            Ok(CompletionResponse {
                text: choice.message.content.unwrap_or_default(),
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            })
        })
    }
}
