//! Command dispatch.

pub mod generate;

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::Cli;
use crate::config::Settings;
use crate::context::ServiceContext;

/// Env var naming a directory to record remote interactions into.
pub const RECORD_VAR: &str = "DOCDRAFT_RECORD";
/// Env var naming a cassette to replay remote interactions from.
pub const REPLAY_VAR: &str = "DOCDRAFT_REPLAY";

/// Build the service context for `settings` and run the pipeline.
///
/// When `DOCDRAFT_REPLAY` is set, the LLM and repository ports are served
/// from that cassette. Otherwise, when `DOCDRAFT_RECORD` is set to a
/// directory, live interactions are recorded to per-port cassettes there.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the run fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let settings = Settings::from_cli(cli);

    if let Ok(path) = env::var(REPLAY_VAR) {
        let ctx = ServiceContext::replaying(&PathBuf::from(path), &settings.repo_url)?;
        return generate::run(&ctx, &settings);
    }

    let (ctx, session) = if let Ok(dir) = env::var(RECORD_VAR) {
        let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(dir), &settings)?;
        info!(dir = %session.output_dir().display(), "recording remote calls");
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&settings), None)
    };

    let result = generate::run(&ctx, &settings);

    // Finish recording after the run completes, even on error.
    if let Some(session) = session {
        // Drop context first to release Arc references.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
