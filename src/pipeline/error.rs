//! Failures that abort a pipeline run.

use std::path::PathBuf;

use thiserror::Error;

use super::state::TransitionError;
use crate::ports::BoxError;

/// A fatal pipeline error. File-level problems during the walk are not
/// errors; see [`super::walker::WalkFailure`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The repository URL has fewer than two path segments.
    #[error("invalid repository url {0:?}: expected .../<owner>/<repo>")]
    InvalidRepoUrl(String),

    /// The text-generation collaborator failed.
    #[error("text generation failed while {stage}: {source}")]
    Generation {
        /// What the pipeline was doing (e.g. `summarizing src/app.py`).
        stage: String,
        /// Error reported by the LLM port.
        #[source]
        source: BoxError,
    },

    /// The generated document could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        /// Output path.
        path: PathBuf,
        /// Error reported by the filesystem port.
        #[source]
        source: BoxError,
    },

    /// The state machine was driven out of order.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
