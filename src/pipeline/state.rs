//! Pipeline state machine: `Init -> Summarizing (loop) -> Done`.
//!
//! [`PipelineState`] is an immutable value. Every transition consumes the
//! current state and returns the next one, so a run is a sequence of
//! states that tests can inspect one by one.

use std::fmt;

use thiserror::Error;

use super::walker::FileRecord;

/// Phase of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet.
    Init,
    /// Files fetched; summaries being produced one by one.
    Summarizing,
    /// Every file summarized; ready for synthesis.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Routing decision taken after each summarization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// `cursor < file_count`: summarize the next file.
    Loop,
    /// `cursor == file_count`: move on to synthesis.
    Exit,
}

/// Illegal transition attempts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The transition is not defined for the current phase.
    #[error("cannot {action} in phase {actual} (expected {expected})")]
    WrongPhase {
        /// Attempted transition.
        action: &'static str,
        /// Phase the transition requires.
        expected: Phase,
        /// Phase the state was in.
        actual: Phase,
    },
    /// A summary was offered after every file was already summarized.
    #[error("all {0} files are already summarized")]
    Exhausted(usize),
    /// Exit was requested before every file was summarized.
    #[error("only {cursor} of {file_count} files are summarized")]
    Incomplete {
        /// Files summarized so far.
        cursor: usize,
        /// Files in the run.
        file_count: usize,
    },
}

/// Snapshot of one pipeline run.
///
/// Invariant once initialized: `summaries.len() == cursor <= files.len()`,
/// and `summaries[i]` was produced from `files[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    repo_url: String,
    phase: Phase,
    files: Vec<FileRecord>,
    cursor: usize,
    summaries: Vec<String>,
}

impl PipelineState {
    /// Fresh state in [`Phase::Init`].
    #[must_use]
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            phase: Phase::Init,
            files: Vec::new(),
            cursor: 0,
            summaries: Vec::new(),
        }
    }

    /// `Init -> Summarizing`: installs the fetched files and resets the cursor.
    ///
    /// # Errors
    ///
    /// Fails unless the state is in [`Phase::Init`].
    pub fn initialized(self, files: Vec<FileRecord>) -> Result<Self, TransitionError> {
        self.expect_phase("initialize", Phase::Init)?;
        Ok(Self { phase: Phase::Summarizing, files, cursor: 0, summaries: Vec::new(), ..self })
    }

    /// Loop-or-exit routing for the summarizing phase.
    #[must_use]
    pub fn decision(&self) -> Decision {
        if self.cursor < self.files.len() {
            Decision::Loop
        } else {
            Decision::Exit
        }
    }

    /// File the next summary must be produced from.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Summarizing`] or when every file is summarized.
    pub fn current_file(&self) -> Result<&FileRecord, TransitionError> {
        self.expect_phase("summarize", Phase::Summarizing)?;
        self.files.get(self.cursor).ok_or(TransitionError::Exhausted(self.files.len()))
    }

    /// `Summarizing -> Summarizing`: appends the summary of the current file
    /// and advances the cursor.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Summarizing`] or when every file is summarized.
    pub fn with_summary(self, summary: String) -> Result<Self, TransitionError> {
        self.current_file()?;
        let mut summaries = self.summaries;
        summaries.push(summary);
        Ok(Self { cursor: self.cursor + 1, summaries, ..self })
    }

    /// `Summarizing -> Done`.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Summarizing`] or while files remain.
    pub fn finished(self) -> Result<Self, TransitionError> {
        self.expect_phase("finish", Phase::Summarizing)?;
        if self.decision() == Decision::Loop {
            return Err(TransitionError::Incomplete {
                cursor: self.cursor,
                file_count: self.files.len(),
            });
        }
        Ok(Self { phase: Phase::Done, ..self })
    }

    fn expect_phase(&self, action: &'static str, expected: Phase) -> Result<(), TransitionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongPhase { action, expected, actual: self.phase })
        }
    }

    /// Repository URL this run documents.
    #[must_use]
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fetched files, in walk order.
    #[must_use]
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Number of fetched files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Index of the next file to summarize.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Summaries produced so far, aligned with [`Self::files`].
    #[must_use]
    pub fn summaries(&self) -> &[String] {
        &self.summaries
    }
}
