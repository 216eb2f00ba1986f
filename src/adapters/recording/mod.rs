//! Recording adapters that capture interactions to cassettes.

pub mod llm;
pub mod repo;

use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

pub use llm::RecordingLlmClient;
pub use repo::RecordingRepoHost;

/// Appends one call to the shared recorder.
///
/// A call that cannot be encoded is logged and left out; the live result is
/// still returned to the pipeline.
pub(crate) fn record_result<I, T, E>(
    recorder: &Mutex<CassetteRecorder>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: Display,
{
    let mut recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = recorder.record_call(port, method, input, result) {
        warn!(port, method, "call not recorded: {e}");
    }
}
