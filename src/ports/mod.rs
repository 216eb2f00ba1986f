//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline core and an
//! external system (language model, repository host, local disk).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod llm;
pub mod repo;

pub use filesystem::FileSystem;
pub use llm::{ChatMessage, CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use repo::{EntryKind, RepoEntry, RepoFuture, RepoHost, RepoRef};

/// Error type shared by every port.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
