use thiserror::Error;

/// Reasons a file never became a backend job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Upload failed: file is empty")]
    EmptyFile,
    #[error("Upload failed: only .{expected} files are accepted")]
    UnsupportedType { file_name: String, expected: String },
    /// The backend answered with an explanation.
    #[error("Upload failed: {detail}")]
    Rejected { detail: String },
    /// Network, status or decoding failure without a server explanation.
    #[error("Upload failed")]
    Transport { detail: String },
}

/// Every failure the uploader surfaces. `Display` is the user-visible status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("Status check failed")]
    PollTransport { detail: String },
    /// Backend-reported job failure, shown verbatim.
    #[error("{0}")]
    Job(String),
}

impl UploadError {
    /// True when repeating the same upload could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            UploadError::Submission(SubmissionError::Transport { .. }) => true,
            UploadError::Submission(_) => false,
            UploadError::PollTransport { .. } => true,
            UploadError::Job(_) => false,
        }
    }
}
