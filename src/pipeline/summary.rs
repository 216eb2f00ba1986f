//! Best-effort classification of per-file summaries.
//!
//! The summarization prompt asks for a nine-field JSON object, but models
//! do not always comply. Classification never changes what is synthesized:
//! the verbatim text always goes into the final prompt.

use serde::{Deserialize, Serialize};

/// The JSON shape requested from the model for each file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileSummary {
    /// File the summary describes.
    pub file_name: String,
    /// Main role of the file.
    pub purpose: String,
    /// Main functions and classes.
    pub key_components: Vec<String>,
    /// Imports.
    pub dependencies: Vec<String>,
    /// Main inputs and outputs.
    pub inputs_outputs: String,
    /// Key algorithms and flows.
    pub important_logic: String,
    /// Links to other modules or APIs.
    pub connections: String,
    /// Constants and environment variables.
    pub configurations: String,
    /// How execution starts, if it does.
    pub entry_point: String,
}

/// A summary as returned by the model, tagged by whether it parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Text parsed as a [`FileSummary`].
    Structured(FileSummary),
    /// Anything else.
    Raw(String),
}

impl Summary {
    /// Classifies `text`, accepting a bare JSON object or one wrapped in a
    /// fenced code block.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let body = strip_fence(text.trim());
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value @ serde_json::Value::Object(_)) => match serde_json::from_value(value) {
                Ok(summary) => Self::Structured(summary),
                Err(_) => Self::Raw(text.to_string()),
            },
            _ => Self::Raw(text.to_string()),
        }
    }

    /// Returns `true` for [`Summary::Structured`].
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
