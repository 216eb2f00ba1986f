//! Replaying adapters that serve recorded interactions.

pub mod llm;
pub mod repo;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::BoxError;

pub use llm::ReplayingLlmClient;
pub use repo::ReplayingRepoHost;

/// Takes the next recorded output for `port::method`, checked against
/// `input`.
///
/// # Panics
///
/// Panics when the cassette cannot answer the call: nothing left to serve,
/// or the recorded input differs.
pub(crate) fn next_output<I: Serialize>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    input: &I,
) -> serde_json::Value {
    let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let mut replayer = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    match replayer.next_interaction(port, method, &input) {
        Ok(interaction) => interaction.output,
        Err(e) => panic!("{e}"),
    }
}

/// Turn a recorded output back into a `Result`.
///
/// Expects `{"ok": <value>}` or `{"err": "message"}`; a bare value is
/// treated as `ok`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, BoxError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("ok") => {
            map.remove("ok").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
