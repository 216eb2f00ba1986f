//! Accumulates port calls and writes them out as one cassette.

use std::fmt::Display;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::error::CassetteError;
use super::format::{Cassette, Interaction};

/// Builds a [`Cassette`] in memory and writes it on [`finish`](Self::finish).
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty cassette for `repo_url` that will be written to `path`.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        repo_url: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            cassette: Cassette {
                name: name.into(),
                recorded_at: Utc::now(),
                repo_url: repo_url.into(),
                interactions: Vec::new(),
            },
        }
    }

    /// Appends a call with an already-encoded output.
    pub fn record(&mut self, port: &str, method: &str, input: Value, output: Value) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Appends a call and its result as `{"ok": value}` or `{"err": message}`.
    ///
    /// # Errors
    ///
    /// Fails if `input` or the ok value cannot be encoded as JSON; nothing is
    /// recorded then.
    pub fn record_call<I, T, E>(
        &mut self,
        port: &str,
        method: &str,
        input: &I,
        result: &Result<T, E>,
    ) -> Result<(), serde_json::Error>
    where
        I: Serialize,
        T: Serialize,
        E: Display,
    {
        let input = serde_json::to_value(input)?;
        let output = match result {
            Ok(value) => json!({ "ok": serde_json::to_value(value)? }),
            Err(e) => json!({ "err": e.to_string() }),
        };
        self.record(port, method, input, output);
        Ok(())
    }

    /// Number of calls recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cassette.interactions.len()
    }

    /// `true` until the first call is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cassette.interactions.is_empty()
    }

    /// Stamps the recording time and writes the cassette, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Write`] if the file cannot be written.
    pub fn finish(mut self) -> Result<PathBuf, CassetteError> {
        self.cassette.recorded_at = Utc::now();
        let write_err = |source| CassetteError::Write { path: self.path.clone(), source };

        let yaml = serde_yaml::to_string(&self.cassette)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, yaml).map_err(write_err)?;
        Ok(self.path)
    }
}
