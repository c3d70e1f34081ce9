//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ctrlf_core::UploaderSettings;
use ctrlf_engine::{BackendError, BackendSettings};
use ctrlf_logging::LogDestination;
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ctrlf-upload",
    version,
    about = "Upload documents to a Ctrl+F++ backend and follow their ingestion"
)]
pub struct Cli {
    /// Backend base address, e.g. http://localhost:8000
    #[arg(long, env = "CTRLF_BACKEND_URL")]
    pub backend_url: String,

    /// Status polling interval in milliseconds.
    #[arg(
        long,
        env = "CTRLF_POLL_MS",
        default_value_t = 1_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_ms: u64,

    /// Accepted file extension.
    #[arg(long, env = "CTRLF_ACCEPT", default_value = "pdf")]
    pub accept: String,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Files to upload, one after another.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn uploader_settings(&self) -> UploaderSettings {
        UploaderSettings {
            poll_interval: Duration::from_millis(self.poll_ms),
            accepted_extension: self.accept.trim_start_matches('.').to_ascii_lowercase(),
        }
    }

    pub fn backend_settings(&self) -> Result<BackendSettings, BackendError> {
        BackendSettings::new(&self.backend_url)
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
