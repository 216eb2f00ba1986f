//! `docdraft <REPO_URL>`: generate a README for a remote repository.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::pipeline::{Pipeline, PipelineOptions};

/// Execute one pipeline run on a single-threaded runtime.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the pipeline fails.
pub fn run(ctx: &ServiceContext, settings: &Settings) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;

    let pipeline = Pipeline::new(ctx, PipelineOptions::from(settings));
    let report =
        runtime.block_on(pipeline.run(&settings.repo_url)).map_err(|e| e.to_string())?;

    println!(
        "README generated from {} files ({} skipped) and written to {}",
        report.file_count,
        report.skipped,
        report.output.display()
    );
    Ok(())
}
