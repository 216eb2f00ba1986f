//! Final README synthesis from the accumulated summaries.

use std::path::Path;

use tracing::info;

use super::error::PipelineError;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::{CompletionRequest, LlmClient};

/// Separator placed between summaries in the synthesis prompt.
pub const SUMMARY_SEPARATOR: &str = "\n\n";

const TEMPLATE_HEAD: &str = r"
You are a documentation generator. Use the provided file summaries to produce a clean, structured, and professional README.md.

Requirements:
- Output **only the README.md content**, with no explanations or meta-comments.
- Do not include phrases like 'based on the information provided' or 'this README includes'.
- Write in a concise, clear, and professional tone.

The README must include:
1. **Project Title & Overview**
2. **Key Features**
3. **Tech Stack**
4. **Project Structure**
5. **Setup Instructions**
6. **Usage**
7. **Contributing** (optional)
8. **License** (optional)

Insert code blocks where relevant.

File summaries:
";

const TEMPLATE_TAIL: &str = "

Generate the README now.
";

/// Embeds the blank-line-joined summaries into the documentation template.
#[must_use]
pub fn build_prompt(summaries: &[String]) -> String {
    format!("{TEMPLATE_HEAD}{}{TEMPLATE_TAIL}", summaries.join(SUMMARY_SEPARATOR))
}

/// Turns summaries into the final document and persists it.
pub struct ReportSynthesizer<'a> {
    llm: &'a dyn LlmClient,
    fs: &'a dyn FileSystem,
    model: &'a str,
    max_tokens: Option<u32>,
}

impl<'a> ReportSynthesizer<'a> {
    /// Creates a synthesizer calling `llm` with `model` and writing through `fs`.
    #[must_use]
    pub fn new(
        llm: &'a dyn LlmClient,
        fs: &'a dyn FileSystem,
        model: &'a str,
        max_tokens: Option<u32>,
    ) -> Self {
        Self { llm, fs, model, max_tokens }
    }

    /// Requests the document once and writes the raw response to `output`,
    /// replacing any previous content. Nothing is written if the request fails.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Generation`] if the collaborator fails and
    /// [`PipelineError::Persist`] if the write fails.
    pub async fn synthesize(
        &self,
        summaries: &[String],
        output: &Path,
    ) -> Result<String, PipelineError> {
        let request = CompletionRequest::single(self.model, build_prompt(summaries))
            .with_max_tokens(self.max_tokens);
        let response = self.llm.complete(&request).await.map_err(|source| {
            PipelineError::Generation { stage: "generating the README".into(), source }
        })?;

        self.fs
            .write(output, &response.text)
            .map_err(|source| PipelineError::Persist { path: output.to_path_buf(), source })?;
        info!(path = %output.display(), bytes = response.text.len(), "document written");

        Ok(response.text)
    }
}
