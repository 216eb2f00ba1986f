//! Per-file summarization through the text-generation collaborator.

use tracing::debug;

use super::error::PipelineError;
use super::walker::FileRecord;
use crate::config::SummaryStrategy;
use crate::ports::llm::{CompletionRequest, LlmClient};

/// Instruction sent ahead of every file.
pub const SUMMARY_PROMPT: &str = r#"
Summarize the code for README generation.

Return JSON only:
{
  "file_name": "",
  "purpose": "",
  "key_components": [],
  "dependencies": [],
  "inputs_outputs": "",
  "important_logic": "",
  "connections": "",
  "configurations": "",
  "entry_point": ""
}

Guidelines:
- purpose: main role of the file
- key_components: main functions/classes (1-line each)
- dependencies: imports
- inputs_outputs: main I/O
- important_logic: key algorithms/flows
- connections: links to other modules/APIs
- configurations: constants/env vars
- entry_point: how execution starts if any

File:

"#;

/// Full user message for one file: instruction, then path and content in a
/// code fence.
#[must_use]
pub fn build_prompt(record: &FileRecord) -> String {
    format!("{SUMMARY_PROMPT} \n```File name: {}\n\n{}```", record.path, record.content)
}

/// Splits `text` into consecutive windows of at most `max_chars` characters.
///
/// Windows never split a character; an empty text yields no windows.
#[must_use]
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Produces one summary string per file.
pub struct SummarizationStep<'a> {
    llm: &'a dyn LlmClient,
    model: &'a str,
    max_tokens: Option<u32>,
    strategy: SummaryStrategy,
}

impl<'a> SummarizationStep<'a> {
    /// Creates a step that sends requests for `model` through `llm`.
    #[must_use]
    pub fn new(
        llm: &'a dyn LlmClient,
        model: &'a str,
        max_tokens: Option<u32>,
        strategy: SummaryStrategy,
    ) -> Self {
        Self { llm, model, max_tokens, strategy }
    }

    /// Summarizes `record`, returning the model's text unmodified (chunk
    /// summaries joined with `\n` under the chunked strategy).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Generation`] on the first failed request.
    pub async fn summarize(&self, record: &FileRecord) -> Result<String, PipelineError> {
        match self.strategy {
            SummaryStrategy::Chunked { max_chars } => {
                let chunks = chunk_text(&record.content, max_chars);
                if chunks.is_empty() {
                    return self.request(build_prompt(record), &record.path).await;
                }
                let mut parts = Vec::with_capacity(chunks.len());
                for (i, chunk) in chunks.iter().enumerate() {
                    debug!(path = %record.path, chunk = i + 1, of = chunks.len(), "summarizing chunk");
                    let prompt =
                        format!("{SUMMARY_PROMPT}\nFile name: {}\n\n{chunk}", record.path);
                    parts.push(self.request(prompt, &record.path).await?);
                }
                Ok(parts.join("\n"))
            }
            SummaryStrategy::WholeFile => self.request(build_prompt(record), &record.path).await,
        }
    }

    async fn request(&self, prompt: String, path: &str) -> Result<String, PipelineError> {
        let request =
            CompletionRequest::single(self.model, prompt).with_max_tokens(self.max_tokens);
        let response = self.llm.complete(&request).await.map_err(|source| {
            PipelineError::Generation { stage: format!("summarizing {path}"), source }
        })?;
        debug!(
            path,
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "summary received"
        );
        Ok(response.text)
    }
}
