//! Drives one pipeline run through its state machine.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::error::PipelineError;
use super::state::{Decision, PipelineState};
use super::summarize::SummarizationStep;
use super::summary::Summary;
use super::synthesize::ReportSynthesizer;
use super::walker::RepositoryWalker;
use crate::config::{Settings, SummaryStrategy};
use crate::context::ServiceContext;
use crate::ports::repo::RepoRef;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Where the document was written.
    pub output: PathBuf,
    /// Files summarized.
    pub file_count: usize,
    /// Listings and downloads that failed during the walk.
    pub skipped: usize,
    /// Summaries that parsed as the requested JSON shape.
    pub structured_summaries: usize,
    /// The generated document.
    pub document: String,
}

/// Knobs for a run, independent of where the collaborators live.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Model identifier for every completion.
    pub model: String,
    /// Token cap per completion.
    pub max_tokens: Option<u32>,
    /// Per-file summarization strategy.
    pub strategy: SummaryStrategy,
    /// Output document path.
    pub output: PathBuf,
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            strategy: settings.strategy,
            output: settings.output.clone(),
        }
    }
}

/// Runs walk, per-file summarization and synthesis over a [`ServiceContext`].
pub struct Pipeline<'a> {
    ctx: &'a ServiceContext,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over `ctx`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, options: PipelineOptions) -> Self {
        Self { ctx, options }
    }

    /// Runs the whole pipeline for `repo_url`.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable URL, on the first text-generation failure, or
    /// when the document cannot be written. Walk failures are logged and
    /// skipped.
    pub async fn run(&self, repo_url: &str) -> Result<RunReport, PipelineError> {
        let (mut state, skipped) = self.initialize(PipelineState::new(repo_url)).await?;

        while state.decision() == Decision::Loop {
            state = self.summarize_next(state).await?;
        }
        let state = state.finished()?;

        let synthesizer = ReportSynthesizer::new(
            self.ctx.llm.as_ref(),
            self.ctx.fs.as_ref(),
            &self.options.model,
            self.options.max_tokens,
        );
        let document = synthesizer.synthesize(state.summaries(), &self.options.output).await?;

        Ok(RunReport {
            output: self.options.output.clone(),
            file_count: state.file_count(),
            skipped,
            structured_summaries: state
                .summaries()
                .iter()
                .filter(|s| Summary::classify(s).is_structured())
                .count(),
            document,
        })
    }

    /// `Init -> Summarizing`: walks the repository and installs its files.
    ///
    /// Returns the new state and the number of walk failures, each of which
    /// is logged as a warning and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable URL or when `state` is not in `Init`.
    pub async fn initialize(
        &self,
        state: PipelineState,
    ) -> Result<(PipelineState, usize), PipelineError> {
        let repo = RepoRef::parse(state.repo_url())
            .ok_or_else(|| PipelineError::InvalidRepoUrl(state.repo_url().to_string()))?;
        info!(repo = %repo, "fetching repository tree");

        let outcome = RepositoryWalker::new(self.ctx.repo.as_ref()).walk(&repo).await;
        for failure in &outcome.failures {
            warn!("{failure}; skipping");
        }
        info!(files = outcome.files.len(), skipped = outcome.failures.len(), "repository fetched");

        let skipped = outcome.failures.len();
        Ok((state.initialized(outcome.files)?, skipped))
    }

    /// `Summarizing -> Summarizing`: summarizes the file under the cursor.
    ///
    /// # Errors
    ///
    /// Fails if the collaborator fails or no file is left to summarize.
    pub async fn summarize_next(
        &self,
        state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        let file = state.current_file()?.clone();
        info!(path = %file.path, "summarizing file {}/{}", state.cursor() + 1, state.file_count());

        let step = SummarizationStep::new(
            self.ctx.llm.as_ref(),
            &self.options.model,
            self.options.max_tokens,
            self.options.strategy,
        );
        let summary = step.summarize(&file).await?;
        debug!(path = %file.path, %summary, "file summarized");

        Ok(state.with_summary(summary)?)
    }
}
