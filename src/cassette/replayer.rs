//! Serves recorded calls back in order, checking each against its recording.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;
use thiserror::Error;

use super::format::{Cassette, Interaction};

/// A replayed call that the cassette cannot answer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReplayError {
    /// Nothing was ever recorded for this port method.
    #[error("no interactions recorded for {port}::{method}; cassette has [{available}]")]
    Unrecorded {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Recorded `port::method` pairs, sorted.
        available: String,
    },

    /// Every recorded call for this port method was already served.
    #[error("cassette exhausted: all {served} {port}::{method} interactions were consumed")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Calls served before this one.
        served: usize,
    },

    /// The run asked for something other than what was recorded next.
    #[error("replay diverged at seq {seq} ({port}::{method}): recorded {recorded}, called with {actual}")]
    Diverged {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Sequence number of the recorded call.
        seq: u64,
        /// Recorded input.
        recorded: Value,
        /// Input of the replayed call.
        actual: Value,
    },
}

#[derive(Debug, Default)]
struct Queue {
    pending: VecDeque<Interaction>,
    served: usize,
}

/// Per `port::method` queues over one cassette.
///
/// Calls on different methods may interleave freely; calls on the same
/// method must come in recording order with matching inputs.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), Queue>,
}

impl CassetteReplayer {
    /// Indexes the interactions of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), Queue> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .pending
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Takes the next recorded call for `port::method`.
    ///
    /// The call is checked against the recorded input: every field present
    /// in the recording must equal the same field of `input`. Fields the
    /// recording leaves out are not compared, so `{}` accepts any input.
    ///
    /// # Errors
    ///
    /// Fails when nothing is left to serve or the inputs differ. A diverging
    /// call is not consumed.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &Value,
    ) -> Result<Interaction, ReplayError> {
        let Some(queue) = self.queues.get_mut(&(port.to_string(), method.to_string())) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(ReplayError::Unrecorded {
                port: port.to_string(),
                method: method.to_string(),
                available: available.join(", "),
            });
        };

        let next = queue.pending.front().ok_or_else(|| ReplayError::Exhausted {
            port: port.to_string(),
            method: method.to_string(),
            served: queue.served,
        })?;
        if !covers(&next.input, input) {
            return Err(ReplayError::Diverged {
                port: port.to_string(),
                method: method.to_string(),
                seq: next.seq,
                recorded: next.input.clone(),
                actual: input.clone(),
            });
        }

        queue.served += 1;
        queue.pending.pop_front().ok_or_else(|| ReplayError::Exhausted {
            port: port.to_string(),
            method: method.to_string(),
            served: queue.served,
        })
    }
}

/// Whether `actual` agrees with every field `recorded` specifies.
fn covers(recorded: &Value, actual: &Value) -> bool {
    match (recorded, actual) {
        (Value::Object(want), Value::Object(got)) => {
            want.iter().all(|(key, value)| got.get(key).is_some_and(|g| covers(value, g)))
        }
        _ => recorded == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn cassette(interactions: Vec<(&str, &str, Value)>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            repo_url: "o/r".into(),
            interactions: interactions
                .into_iter()
                .enumerate()
                .map(|(seq, (port, method, input))| Interaction {
                    seq: seq as u64,
                    port: port.into(),
                    method: method.into(),
                    input,
                    output: json!({"ok": seq}),
                })
                .collect(),
        }
    }

    #[test]
    fn methods_interleave_but_keep_their_own_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            ("repo", "list_dir", json!({"path": ""})),
            ("repo", "fetch_raw", json!({"url": "a"})),
            ("repo", "list_dir", json!({"path": "src"})),
            ("llm", "complete", json!({})),
        ]));

        assert_eq!(replayer.next_interaction("llm", "complete", &json!({"model": "m"})).unwrap().seq, 3);
        assert_eq!(replayer.next_interaction("repo", "list_dir", &json!({"path": ""})).unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("repo", "fetch_raw", &json!({"url": "a"})).unwrap().seq, 1);
        assert_eq!(replayer.next_interaction("repo", "list_dir", &json!({"path": "src"})).unwrap().seq, 2);
    }

    #[test]
    fn different_input_is_rejected_and_not_consumed() {
        let recorded = json!({"owner": "acme", "name": "widget", "path": ""});
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![("repo", "list_dir", recorded.clone())]));

        let other = json!({"owner": "someone", "name": "else", "path": ""});
        let err = replayer.next_interaction("repo", "list_dir", &other).unwrap_err();
        assert!(matches!(err, ReplayError::Diverged { seq: 0, .. }));
        assert!(err.to_string().contains("someone"));

        assert!(replayer.next_interaction("repo", "list_dir", &recorded).is_ok());
    }

    #[test]
    fn recorded_fields_must_match_nested_values() {
        let recorded = json!({"model": "m", "messages": [{"role": "user", "content": "p"}]});
        let mut replayer = CassetteReplayer::new(&cassette(vec![("llm", "complete", recorded)]));

        let changed = json!({"model": "m", "messages": [{"role": "user", "content": "q"}]});
        assert!(replayer.next_interaction("llm", "complete", &changed).is_err());
    }

    #[test]
    fn exhausted_method_reports_how_many_were_served() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![("llm", "complete", json!({}))]));
        replayer.next_interaction("llm", "complete", &json!({})).unwrap();

        let err = replayer.next_interaction("llm", "complete", &json!({})).unwrap_err();
        assert_eq!(
            err,
            ReplayError::Exhausted { port: "llm".into(), method: "complete".into(), served: 1 }
        );
    }

    #[test]
    fn unrecorded_method_lists_what_exists() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![
            ("repo", "fetch_raw", json!({})),
            ("llm", "complete", json!({})),
        ]));
        let err = replayer.next_interaction("repo", "list_dir", &json!({})).unwrap_err();
        assert!(err.to_string().contains("[llm::complete, repo::fetch_raw]"));
    }
}
