use crate::{JobId, JobStatus, SessionId, SubmissionError};

/// A document picked by the user, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a file to upload.
    FileSelected(FileUpload),
    /// Backend accepted the upload and created a job.
    SubmitSucceeded {
        session: SessionId,
        job_id: JobId,
        message: String,
    },
    /// Upload request failed; no job exists.
    SubmitFailed {
        session: SessionId,
        error: SubmissionError,
    },
    /// Poll timer fired for a session.
    PollTick { session: SessionId },
    /// A status fetch resolved. `Err` carries the transport failure text.
    StatusFetched {
        session: SessionId,
        result: Result<JobStatus, String>,
    },
    /// Owning view is going away; nothing may run afterwards.
    Unmounted,
}
