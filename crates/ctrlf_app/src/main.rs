mod app;
mod cli;
mod effects;
mod render;

use std::process::ExitCode;

use clap::Parser;
use ctrlf_logging::{ctrlf_debug, ctrlf_info, ctrlf_warn};

fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = cli::Cli::parse();
    ctrlf_logging::initialize(cli.log.into(), cli.log_level());
    ctrlf_debug!("Starting with {:?}", cli);

    let backend = cli.backend_settings()?;
    let summary = app::run(cli.files.clone(), cli.uploader_settings(), backend)?;

    ctrlf_info!(
        "{} upload(s) processed, {} failed",
        summary.succeeded.len() + summary.failed.len(),
        summary.failed.len()
    );
    if summary.failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        ctrlf_warn!("{} upload(s) failed: {}", summary.failed.len(), summary.failed.join(", "));
        Ok(ExitCode::FAILURE)
    }
}
