//! Repository-to-README pipeline.
//!
//! `walker` (with `filter` and `compress`) turns a hosted repository into an
//! ordered list of files, `state` and `controller` drive the per-file
//! summarization loop, and `synthesize` writes the final document.

pub mod compress;
pub mod controller;
pub mod error;
pub mod filter;
pub mod state;
pub mod summarize;
pub mod summary;
pub mod synthesize;
pub mod walker;

pub use controller::{Pipeline, PipelineOptions, RunReport};
pub use error::PipelineError;
pub use state::{Decision, Phase, PipelineState, TransitionError};
pub use walker::{FileRecord, RepositoryWalker, WalkFailure, WalkOutcome};
